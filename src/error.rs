//! Error handling for ascent.
//!
//! [`AscentError`] covers every failure surfaced across the crate boundary.
//! Course validation findings are NOT errors: they are accumulated in
//! [`crate::course::ValidationResult`] so a single pass can report all of
//! them. Only operations that cannot produce a value return `Err`.

use std::io;

use thiserror::Error;

/// Main error type for ascent operations.
#[derive(Error, Debug)]
pub enum AscentError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid skill level: '{0}'")]
    InvalidLevel(String),

    #[error("Unsupported unlock requirement kind '{kind}' on node '{node_id}'")]
    UnsupportedRequirement { node_id: String, kind: String },

    #[error("Course validation failed with {errors} error(s)")]
    CourseInvalid { errors: usize },

    #[error("Invalid progress snapshot: {0}")]
    InvalidProgress(String),
}

/// Convenience result type for ascent operations.
pub type Result<T> = std::result::Result<T, AscentError>;
