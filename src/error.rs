//! Error types for the Gmail tools
//!
//! `ToolError` is the taxonomy every tool call is reduced to before it crosses
//! a host adapter boundary. `GmailToolsError` covers process-level concerns
//! (configuration, stdio, runtime setup).

use thiserror::Error;

/// Main error type for process-level operations
#[derive(Error, Debug)]
pub enum GmailToolsError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors produced while executing a single tool call
#[derive(Error, Debug)]
pub enum ToolError {
    /// Bad or missing arguments, detected before any network call
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Non-200 response or unparseable body from the Gmail API
    #[error("{message}")]
    Upstream { message: String },

    /// Tool id outside the catalog
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    /// Anything else (transport failures, panics, serialization)
    #[error("{message}")]
    Internal { message: String },
}

impl ToolError {
    pub fn upstream(message: impl Into<String>) -> Self {
        ToolError::Upstream {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ToolError::Internal {
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Validation(_) => "validation",
            ToolError::Upstream { .. } => "upstream",
            ToolError::UnknownTool { .. } => "unknown_tool",
            ToolError::Internal { .. } => "internal",
        }
    }
}

/// Argument validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("{field} parameter is required")]
    EmptyField { field: String },

    #[error("Invalid parameter: {name} - {message}")]
    InvalidParameter { name: String, message: String },

    #[error("Invalid JSON input")]
    InvalidJson,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to start runtime: {message}")]
    Runtime { message: String },
}

/// Result type alias for process-level operations
pub type Result<T> = std::result::Result<T, GmailToolsError>;

/// Transport failures are not upstream responses; they fall in the catch-all bucket.
impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        ToolError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_display() {
        let err = ToolError::UnknownTool {
            name: "delete_email".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown tool: delete_email");
        assert_eq!(err.kind(), "unknown_tool");
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: ToolError = ValidationError::EmptyField {
            field: "query".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "query parameter is required");
        assert!(matches!(err, ToolError::Validation(_)));
    }

    #[test]
    fn test_error_conversion() {
        let config_err = ConfigError::InvalidConfig {
            message: "bad url".to_string(),
        };
        let err: GmailToolsError = config_err.into();
        assert!(matches!(err, GmailToolsError::Config(_)));
        assert!(err.to_string().contains("bad url"));
    }
}
