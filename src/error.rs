//! Error types for snippet capture, encoding and storage.

use thiserror::Error;

/// Primary error type for snippet operations.
#[derive(Error, Debug)]
pub enum SnipError {
    // Capture errors
    #[error("Unsupported payload: {reason}")]
    UnsupportedPayload { reason: String },

    #[error("No content available to capture")]
    NoContentAvailable,

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    // Content errors
    #[error("Snippet data is unavailable (released or never populated)")]
    DataUnavailable,

    #[error("No text preview available for {kind} content")]
    NoPreviewAvailable { kind: String },

    #[error("Restoring {kind} content needs an output file")]
    OutputRequired { kind: String },

    // Record errors
    #[error("Truncated record: expected {expected} more bytes of {field}")]
    TruncatedRecord { field: &'static str, expected: u64 },

    #[error("Malformed record: {reason}")]
    MalformedRecord { reason: String },

    #[error("Record not found: {path}")]
    RecordNotFound { path: String },

    // Store errors
    #[error("Snippet store has been disposed")]
    StoreDisposed,

    #[error("Invalid snippet name '{name}': {reason}")]
    InvalidSnippetName { name: String, reason: String },

    #[error("Snippet not found: {name}")]
    SnippetNotFound { name: String },

    // Image errors
    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    // Configuration errors
    #[error("Config file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl SnipError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoContentAvailable
                | Self::InputNotFound { .. }
                | Self::OutputRequired { .. }
                | Self::UnsupportedPayload { .. }
                | Self::NoPreviewAvailable { .. }
                | Self::InvalidSnippetName { .. }
                | Self::SnippetNotFound { .. }
                | Self::ConfigNotFound { .. }
                | Self::ConfigParse(_)
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NoContentAvailable => {
                Some("Pass one of --text, --stdin, --files, --image or --audio")
            }
            Self::InputNotFound { .. } => Some("Check the path and try again"),
            Self::NoPreviewAvailable { .. } | Self::OutputRequired { .. } => {
                Some("Use: snip restore <NAME> --output <FILE>")
            }
            Self::InvalidSnippetName { .. } => {
                Some("Use a non-empty name without path separators or < > : \" | ? *")
            }
            Self::SnippetNotFound { .. } => Some("Run: snip list"),
            Self::ConfigNotFound { .. } => Some("Run: snip config --path"),
            Self::ConfigParse(_) => Some("Check the TOML syntax of your config file"),
            _ => None,
        }
    }

    /// Build a malformed-record error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }

    /// Build an unsupported-payload error.
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedPayload {
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results using SnipError.
pub type Result<T> = std::result::Result<T, SnipError>;
