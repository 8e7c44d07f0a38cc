use crate::models::ScoreMap;
use serde_json::Value;
use thiserror::Error;

/// Errors from decoding the classifier's raw output
///
/// The two variants are deliberately distinct: a parse error means the model
/// ignored the formatting instructions entirely, a shape error means it
/// returned valid JSON of the wrong kind (array, scalar). Both carry the
/// normalized text so prompt drift can be diagnosed without re-querying.
#[derive(Debug, Error)]
pub enum ScoreMapError {
    #[error("classifier output is not valid JSON: {source} (text: {text})")]
    Parse {
        text: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("classifier output is not a JSON object (text: {text})")]
    Shape { text: String },
}

/// Normalize raw classifier output before JSON decoding.
///
/// The model wraps its JSON in a free-text envelope often enough that a fixed,
/// ordered list of transformations is applied: trim surrounding whitespace,
/// remove literal `\n` escape sequences, remove code-fence delimiters, remove
/// the bare `json` language tag. Nothing else is stripped.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .replace("\\n", "")
        .replace("```", "")
        .replace("json", "")
}

/// Decode normalized classifier text into a score map.
///
/// Unknown area names are kept; the ranking stage drops anything outside the
/// catalog. Entries whose value is not a JSON number are dropped here, the
/// same silent policy applied to unknown keys.
pub fn parse_score_map(raw: &str) -> Result<ScoreMap, ScoreMapError> {
    let text = normalize(raw);

    let value: Value = serde_json::from_str(&text).map_err(|source| ScoreMapError::Parse {
        text: text.clone(),
        source,
    })?;

    let object = value
        .as_object()
        .ok_or_else(|| ScoreMapError::Shape { text: text.clone() })?;

    Ok(object
        .iter()
        .filter_map(|(name, score)| score.as_f64().map(|s| (name.clone(), s)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_code_fence_and_tag() {
        let raw = "```json\n{\"Robotics\": 80}\n```";
        assert_eq!(normalize(raw), "\n{\"Robotics\": 80}\n");
    }

    #[test]
    fn test_normalize_removes_literal_newline_escapes() {
        assert_eq!(normalize("{\\n\"Robotics\": 80\\n}"), "{\"Robotics\": 80}");
    }

    #[test]
    fn test_parse_fenced_object() {
        let scores = parse_score_map("```json\n{\"Robotics\": 80}\n```").unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores["Robotics"], 80.0);
    }

    #[test]
    fn test_parse_plain_object() {
        let scores =
            parse_score_map("{\"Robotics\": 70, \"Sustainability\": 95, \"Marketing\": 60}")
                .unwrap();
        assert_eq!(scores.len(), 3);
        assert_eq!(scores["Sustainability"], 95.0);
    }

    #[test]
    fn test_syntax_rejection() {
        let err = parse_score_map("{not json").unwrap_err();
        assert!(matches!(err, ScoreMapError::Parse { .. }));
    }

    #[test]
    fn test_shape_rejection_array() {
        let err = parse_score_map("[1,2,3]").unwrap_err();
        assert!(matches!(err, ScoreMapError::Shape { .. }));
    }

    #[test]
    fn test_shape_rejection_scalar() {
        let err = parse_score_map("42").unwrap_err();
        assert!(matches!(err, ScoreMapError::Shape { .. }));
    }

    #[test]
    fn test_non_numeric_values_dropped() {
        let scores = parse_score_map("{\"Robotics\": 80, \"Marketing\": \"high\"}").unwrap();
        assert_eq!(scores.len(), 1);
        assert!(scores.contains_key("Robotics"));
    }

    #[test]
    fn test_shape_error_carries_normalized_text() {
        let err = parse_score_map("```json\n[1,2,3]\n```").unwrap_err();
        match err {
            ScoreMapError::Shape { text } => assert!(text.contains("[1,2,3]")),
            other => panic!("expected shape error, got {:?}", other),
        }
    }
}
