//! Unified error types for MedTrack.

use thiserror::Error;

/// Result type alias using MedTrackError.
pub type Result<T> = std::result::Result<T, MedTrackError>;

#[derive(Error, Debug)]
pub enum MedTrackError {
    // Record errors
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    // Collaborator errors
    #[error("Store error: {0}")]
    Store(String),

    #[error("Notification error: {0}")]
    Notify(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(String),

    #[error("{0}")]
    Other(String),
}

impl MedTrackError {
    pub fn drug_not_found(id: i64) -> Self {
        Self::NotFound { kind: "Drug", id }
    }

    pub fn vacation_not_found(id: i64) -> Self {
        Self::NotFound { kind: "Doctor vacation", id }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn notify(msg: impl Into<String>) -> Self {
        Self::Notify(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<toml::de::Error> for MedTrackError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e.to_string())
    }
}

impl From<toml::ser::Error> for MedTrackError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Toml(e.to_string())
    }
}
