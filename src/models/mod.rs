// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Area, AreaMatch, ContactInfo, Expert, MatchIdentity, MatchedArea, ScoreMap};
pub use requests::InitMatchRequest;
pub use responses::{ErrorResponse, HealthResponse};
