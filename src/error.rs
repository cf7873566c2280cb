//! Error types for menu reconstruction
//!
//! Only the normalizer and configuration validation can fail. Grouping itself
//! is total over well-formed fragments: an empty input yields an empty item
//! list, never an error.

use thiserror::Error;

/// Errors surfaced by the library
#[derive(Error, Debug)]
pub enum MenuLensError {
    /// Provider payload is missing required fields or carries impossible values
    #[error("malformed OCR payload: {reason}")]
    MalformedInput { reason: String },

    /// Provider reported an error instead of annotations
    #[error("OCR provider error: {message}")]
    Provider { message: String },

    /// A configuration value is out of range
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Payload text could not be parsed as JSON
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl MenuLensError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, MenuLensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message() {
        let err = MenuLensError::malformed("annotation 3 has no text");
        assert_eq!(
            err.to_string(),
            "malformed OCR payload: annotation 3 has no text"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: MenuLensError = parse.unwrap_err().into();
        assert!(matches!(err, MenuLensError::Json(_)));
    }
}
