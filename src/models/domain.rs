use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Innovation focus area from the catalog
///
/// The name doubles as the classifier's vocabulary key, so it must stay
/// unique across the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: i32,
    pub name: String,
}

/// Domain expert linked to one or more areas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expert {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Untrusted area-name -> fitness-score mapping decoded from classifier output
///
/// Keys are claimed names (not guaranteed to exist in the catalog) and
/// scores pass through verbatim without range validation.
pub type ScoreMap = HashMap<String, f64>;

/// Identity attached to the inbound request
///
/// Already authenticated and validated upstream; this service only embeds
/// the fields into the classifier prompts.
#[derive(Debug, Clone)]
pub struct MatchIdentity {
    pub username: String,
    pub company: String,
    pub problem: String,
}

/// Contact subset exposed per matched area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub description: Option<String>,
    pub institution: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

impl From<Expert> for ContactInfo {
    fn from(expert: Expert) -> Self {
        Self {
            name: expert.name,
            description: expert.description,
            institution: expert.institution,
            email: expert.email,
            website: expert.website,
        }
    }
}

/// One ranked area with its rating and complete contact set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedArea {
    pub name: String,
    pub rating: f64,
    pub contacts: Vec<ContactInfo>,
}

/// Wrapper matching the external result shape: `{"area": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaMatch {
    pub area: MatchedArea,
}
