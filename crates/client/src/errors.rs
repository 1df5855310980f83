use thiserror::Error;

/// A single form field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("product not found")]
    NotFound,
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid form: {}", .0.iter().map(|e| e.field).collect::<Vec<_>>().join(", "))]
    Validation(Vec<FieldError>),
}
