//! Inno Match - Innovation focus-area matching service
//!
//! This library matches a company representative's stated problem to a ranked
//! set of innovation focus areas via an external text-completion classifier,
//! then surfaces the domain experts linked to each selected area.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{parse_score_map, select_top_areas, MatchError, Matcher, ScoreMapError};
pub use crate::models::{Area, AreaMatch, ContactInfo, Expert, MatchIdentity, MatchedArea, ScoreMap};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let scores = parse_score_map("{\"Robotics\": 80}").unwrap();
        assert_eq!(scores["Robotics"], 80.0);
    }
}
