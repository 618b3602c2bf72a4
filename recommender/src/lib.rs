//! Recommender library for competitive programming practice
//!
//! This library analyses a user's solved problems on an online judge catalog,
//! derives a practice tier and builds a slate of unsolved problems through a
//! staged fallback search.

pub mod config;
pub mod core;
pub mod error;
pub mod recommender;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use config::{CatalogConfig, RecommenderConfig};
pub use error::{RecommendError, RecommendResult};
pub use recommender::Recommender;
pub use services::{RetryPolicy, SolvedAcClient};
pub use traits::*;
pub use types::*;
