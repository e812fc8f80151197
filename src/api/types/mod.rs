//! Request and response types shared by the handlers
//!
//! Error bodies use the `{"detail": ..., "type": ...}` shape the web client expects.

pub mod error;
pub mod form;
pub mod json;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use form::Form;
pub use json::Json;

use serde::Serialize;

/// `{"message": ...}` body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
