use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for peony-admin operations
pub type Result<T> = std::result::Result<T, PeonyAdminError>;

/// Comprehensive error types for admin API operations
#[derive(Debug, Error)]
pub enum PeonyAdminError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The task's outcome was suppressed by its owner. Always recovered
    /// locally; never surfaced to the user.
    #[error("Task canceled before its outcome was observed")]
    Canceled,

    #[error("Login succeeded but the response carried no auth token header")]
    TokenNotIssued,

    #[error("A key named '{key}' already exists in metadata")]
    DuplicateMetadataKey { key: String },

    #[error("Handle '{handle}' is not a valid slug")]
    InvalidHandle { handle: String },

    #[error("Session store error: {message}")]
    SessionStore { message: String },

    #[error("General error: {message}")]
    General { message: String },
}

impl PeonyAdminError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new session store error
    pub fn session_store<S: Into<String>>(message: S) -> Self {
        Self::SessionStore {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Check whether this error is the distinguished cancellation error
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}
