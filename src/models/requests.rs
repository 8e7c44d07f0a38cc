use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to start the matching process
///
/// Identity fields arrive pre-authenticated from the upstream auth layer;
/// validation here only guards against empty strings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InitMatchRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub company: String,
    #[validate(length(min = 1))]
    pub problem: String,
}
