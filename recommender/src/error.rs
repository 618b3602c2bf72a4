//! Recommender error types

use shared::ProblemId;
use thiserror::Error;

/// Result type for recommender operations
pub type RecommendResult<T> = Result<T, RecommendError>;

/// Recommender error types
///
/// Upstream catalog failures are deliberately absent: they are absorbed by the
/// pipeline and show up as stage diagnostics instead.
#[derive(Error, Debug)]
pub enum RecommendError {
    #[error("Unknown handle: {handle}")]
    UserNotFound { handle: String },

    #[error("Handle must not be empty")]
    InvalidHandle,

    #[error("Invalid page number: {page} (pages start at 1)")]
    InvalidPage { page: u32 },

    #[error("Invalid recommendation count: {count}")]
    InvalidCount { count: usize },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Slate consistency check failed: problem {id} appears twice")]
    DuplicateProblem { id: ProblemId },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl RecommendError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError { message: message.into() }
    }
}
