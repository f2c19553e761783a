//! Error types shared across Facepilot crates.

use std::path::PathBuf;

/// Top-level error type for Facepilot operations.
#[derive(Debug, thiserror::Error)]
pub enum FacepilotError {
    #[error("Binding error: {message}")]
    Binding { message: String },

    #[error("Input injection error: {message}")]
    Injection { message: String },

    #[error("Platform error: {message}")]
    Platform { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Keybinder not started: {message}")]
    NotStarted { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FacepilotError.
pub type FacepilotResult<T> = Result<T, FacepilotError>;

impl FacepilotError {
    pub fn binding(msg: impl Into<String>) -> Self {
        Self::Binding {
            message: msg.into(),
        }
    }

    pub fn injection(msg: impl Into<String>) -> Self {
        Self::Injection {
            message: msg.into(),
        }
    }

    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn not_started(msg: impl Into<String>) -> Self {
        Self::NotStarted {
            message: msg.into(),
        }
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}
