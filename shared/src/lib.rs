//! Shared types for the problem recommendation workspace
//!
//! Contains the catalog domain values (tiers, problems, user profiles),
//! the catalog failure taxonomy, and request-scoped logging helpers.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use logging::RequestId;
pub use types::*;
