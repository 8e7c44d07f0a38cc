use crate::models::{Area, ScoreMap};

/// Select the top-scoring catalog areas from an untrusted score map.
///
/// Score keys are intersected with the catalog first, so names the model
/// invented are dropped without error. Ties break by catalog id ascending to
/// keep the ordering deterministic regardless of map iteration order. An
/// empty intersection is a valid empty result, not a failure.
pub fn select_top_areas(scores: &ScoreMap, catalog: &[Area], limit: usize) -> Vec<String> {
    let mut ranked: Vec<&Area> = catalog
        .iter()
        .filter(|area| scores.contains_key(&area.name))
        .collect();

    ranked.sort_by(|a, b| {
        scores[&b.name]
            .partial_cmp(&scores[&a.name])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    ranked.truncate(limit);

    ranked.into_iter().map(|area| area.name.clone()).collect()
}
