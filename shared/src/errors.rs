//! Shared error types for the recommendation workspace

use thiserror::Error;

/// Failure of a single catalog call
///
/// Catalog failures are values, not panics: the recommendation pipeline turns
/// them into "zero results" for the stage that issued the call while still
/// recording which kind of failure happened.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogFailure {
    /// The requested user, tag or problem does not exist
    #[error("not found")]
    NotFound,

    /// Upstream asked us to slow down (HTTP 429)
    #[error("rate limit exceeded")]
    RateLimited,

    /// Call exceeded its time allowance
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx status other than 404/429
    #[error("server returned status {0}")]
    Server(u16),

    /// 2xx response whose body could not be understood
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl CatalogFailure {
    /// Whether retrying the same call may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogFailure::RateLimited | CatalogFailure::Timeout | CatalogFailure::Network(_) => true,
            CatalogFailure::Server(status) => *status >= 500,
            CatalogFailure::NotFound | CatalogFailure::InvalidPayload(_) => false,
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogFailure>;
