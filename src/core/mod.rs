// Core pipeline exports
pub mod matcher;
pub mod parser;
pub mod prompt;
pub mod ranking;

pub use matcher::{Classifier, ContactDirectory, MatchError, Matcher};
pub use parser::{normalize, parse_score_map, ScoreMapError};
pub use prompt::{build_system_prompt, build_user_prompt};
pub use ranking::select_top_areas;
