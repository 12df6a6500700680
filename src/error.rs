//! Unified error type for snipdex.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnipdexError {
    #[error("SQLite error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("no stored unit with id {0}")]
    UnitNotFound(i64),

    #[error("invalid exclude pattern: {0}")]
    InvalidGlob(String),
}

pub type Result<T> = std::result::Result<T, SnipdexError>;
