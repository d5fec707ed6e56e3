use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::FlashKind;

/// A command factory rejected its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("operation name must not be empty")]
    EmptyOperation,
    #[error("act command '{0}' does not take a selector")]
    UnexpectedSelector(String),
    #[error("invalid html insertion mode '{0}', expected html, prepend or append")]
    InvalidHtmlMode(String),
    #[error("{field} must be a non-empty token without whitespace, got '{value}'")]
    InvalidToken { field: &'static str, value: String },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

/// A single flash message could not be turned into alert markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("flash message of kind {kind:?} has no text")]
    EmptyText { kind: FlashKind },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
