// src/models/common.rs
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned with every 4xx/5xx from the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorMessage {
    pub success: bool,
    pub error: String,
}

impl ErrorMessage {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
