//! API request and response data models.

pub mod animals;
pub mod uploads;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned whenever an action does not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Rejection {
    /// Always `false`
    pub success: bool,
    pub error: String,
}

impl Rejection {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
