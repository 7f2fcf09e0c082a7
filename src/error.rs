//! Error taxonomy for the engine
//!
//! Validation errors are plain data attached to fields and never raised.
//! Configuration errors indicate a mismatched form or scorecard definition
//! and fail fast at construction or lookup time. Save rejections carry the
//! payload of a failed save operation for user-facing message extraction.

use thiserror::Error;

/// A form or scorecard definition that cannot be used as declared.
///
/// These are programmer errors: they are returned synchronously at the
/// point of misuse rather than degrading into user-facing validation
/// messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("duplicate field name '{0}' in form definition")]
    DuplicateField(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("validator on field '{field}' references unknown sibling '{sibling}'")]
    UnknownSibling { field: String, sibling: String },

    #[error("cross-field validator on '{field}' is missing its sibling field name")]
    MissingSiblingName { field: String },

    #[error("field '{field}' declares unknown dependent field '{dependent}'")]
    UnknownDependent { field: String, dependent: String },

    #[error("question id '{id}' is not unique after normalization")]
    DuplicateQuestionId { id: String },
}

/// Rejection payload from a failed save operation.
///
/// `content` is a structured message nested in the server response when
/// the backend provided one; `message` is the exception's own message.
#[derive(Debug, Clone, Default, Error)]
#[error("{}", .content.as_deref().or(.message.as_deref()).unwrap_or("Save failed"))]
pub struct SaveRejection {
    pub content: Option<String>,
    pub message: Option<String>,
}

impl SaveRejection {
    /// A rejection with only an exception-level message.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            content: None,
            message: Some(message.into()),
        }
    }

    /// A rejection carrying a structured server-side message.
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            message: None,
        }
    }

    /// The message shown to the user: server content wins over the
    /// exception message.
    pub fn user_message(&self) -> String {
        self.content
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "Save failed".to_string())
    }
}

/// Extract the user-facing message from a failed save.
///
/// Fallback order: structured server content, then the rejection's own
/// message, then the stringified error.
pub fn save_error_message(err: &anyhow::Error) -> String {
    if let Some(rejection) = err.downcast_ref::<SaveRejection>() {
        if let Some(content) = &rejection.content {
            return content.clone();
        }
        if let Some(message) = &rejection.message {
            return message.clone();
        }
    }
    err.to_string()
}
