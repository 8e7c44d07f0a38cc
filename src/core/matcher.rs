use crate::core::parser::{parse_score_map, ScoreMapError};
use crate::core::prompt::{build_system_prompt, build_user_prompt};
use crate::core::ranking::select_top_areas;
use crate::models::{Area, AreaMatch, Expert, MatchIdentity, MatchedArea, ScoreMap};
use crate::services::catalog::CatalogError;
use crate::services::classifier::ClassifierError;
use async_trait::async_trait;
use thiserror::Error;

/// Terminal errors of the matching pipeline
///
/// Each variant is caller-visible on its own: "service unreachable" points at
/// an infrastructure incident, the output errors point at prompt or model
/// drift. Empty selections and contact-less areas are normal results and
/// never appear here.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("classifier returned an empty completion")]
    ClassifierEmptyResponse,

    #[error(transparent)]
    ScoreMap(#[from] ScoreMapError),

    #[error("directory lookup failed: {0}")]
    Directory(#[from] CatalogError),
}

impl From<ClassifierError> for MatchError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::Unavailable(msg) => MatchError::ClassifierUnavailable(msg),
            ClassifierError::EmptyResponse => MatchError::ClassifierEmptyResponse,
        }
    }
}

/// Seam for the external text-completion service
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, ClassifierError>;
}

/// Seam for area and expert lookups during fan-out
///
/// The catalog is externally mutable reference data; lookups read live state
/// that may differ from the snapshot used to build the vocabulary.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    async fn find_area_by_name(&self, name: &str) -> Result<Option<Area>, CatalogError>;
    async fn find_experts_by_area(&self, area_id: i32) -> Result<Vec<Expert>, CatalogError>;
}

/// Matching pipeline orchestrator
///
/// # Pipeline stages
/// 1. Prompt construction from the per-request catalog snapshot
/// 2. Single classifier round-trip
/// 3. Output normalization and decoding
/// 4. Catalog-validated ranking, truncated to `top_k`
/// 5. Contact fan-out per selected area
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    top_k: usize,
}

impl Matcher {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Run the full matching pipeline for one request.
    ///
    /// `catalog` is the snapshot read at prompt-build time; fan-out re-reads
    /// the directory, so an area deleted in between is skipped rather than
    /// failing the request.
    pub async fn run_match(
        &self,
        identity: &MatchIdentity,
        catalog: &[Area],
        classifier: &dyn Classifier,
        directory: &dyn ContactDirectory,
    ) -> Result<Vec<AreaMatch>, MatchError> {
        let system_prompt = build_system_prompt(catalog);
        let user_prompt = build_user_prompt(identity);

        let raw = classifier.classify(&system_prompt, &user_prompt).await?;

        tracing::debug!("Classifier returned {} bytes", raw.len());

        let scores = parse_score_map(&raw)?;
        let selection = select_top_areas(&scores, catalog, self.top_k);

        tracing::debug!(
            "Selected {} of {} scored areas (top_k: {})",
            selection.len(),
            scores.len(),
            self.top_k
        );

        self.assemble(&selection, &scores, directory).await
    }

    /// Join each selected area against the contact directory, preserving
    /// ranking order.
    ///
    /// An area missing from the directory (stale snapshot) is skipped; an
    /// area with no linked experts is kept with an empty contact list.
    pub async fn assemble(
        &self,
        selection: &[String],
        scores: &ScoreMap,
        directory: &dyn ContactDirectory,
    ) -> Result<Vec<AreaMatch>, MatchError> {
        let mut results = Vec::with_capacity(selection.len());

        for name in selection {
            // Selection is derived from the score map; an unscored name can
            // only come from a caller bug, so treat it like a miss.
            let rating = match scores.get(name) {
                Some(rating) => *rating,
                None => continue,
            };

            let area = match directory.find_area_by_name(name).await? {
                Some(area) => area,
                None => {
                    tracing::warn!("Area '{}' vanished between ranking and assembly", name);
                    continue;
                }
            };

            let contacts = directory
                .find_experts_by_area(area.id)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();

            results.push(AreaMatch {
                area: MatchedArea {
                    name: area.name,
                    rating,
                    contacts,
                },
            });
        }

        Ok(results)
    }
}
