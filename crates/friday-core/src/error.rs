// crates/friday-core/src/error.rs
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FridayError>;

/// A single inline validation message, keyed by the form field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error)]
pub enum FridayError {
    #[error("Validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[cfg(feature = "runtime")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Business error reported by the upstream API, kept verbatim.
    #[error("{0}")]
    Upstream(String),

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// How a failure is presented to the person using the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Shown inline next to the offending field; fixed by editing the form.
    Validation,
    /// Never shown.
    Cancellation,
    /// Dismissible message; the user re-triggers the action.
    Transient,
    /// Upstream business error, shown verbatim; terminal for the attempt.
    Upstream,
    Internal,
}

impl FridayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FridayError::Validation(_) => ErrorKind::Validation,
            FridayError::Cancelled => ErrorKind::Cancellation,
            FridayError::Timeout(_) | FridayError::MalformedPayload(_) => ErrorKind::Transient,
            #[cfg(feature = "runtime")]
            FridayError::Http(_) => ErrorKind::Transient,
            FridayError::Upstream(_) | FridayError::SubmissionInFlight => ErrorKind::Upstream,
            FridayError::Storage(_)
            | FridayError::Config(_)
            | FridayError::Io(_)
            | FridayError::Json(_) => ErrorKind::Internal,
        }
    }

    pub fn is_user_visible(&self) -> bool {
        self.kind() != ErrorKind::Cancellation
    }

    /// Field errors for inline display; empty for every other variant.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            FridayError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
