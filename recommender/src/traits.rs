//! Trait definitions for dependency injection

use async_trait::async_trait;

use shared::{CatalogResult, Problem, ProblemId, TagId, TierRange, UserProfile};

/// Capability for querying the external problem catalog
///
/// Every call reports its failure as a [`shared::CatalogFailure`] value so
/// callers can tell "upstream had nothing" (`Ok(vec![])`) apart from
/// "upstream is down" (`Err(..)`).
#[mockall::automock]
#[async_trait]
pub trait ProblemCatalog: Send + Sync {
    /// Fetch the user's profile; `CatalogFailure::NotFound` for unknown handles
    async fn user_profile(&self, handle: &str) -> CatalogResult<UserProfile>;

    /// Ids of every problem the user solved, paginated internally up to a page cap
    async fn solved_problem_ids(&self, handle: &str) -> CatalogResult<Vec<ProblemId>>;

    /// Full problem records for the given ids, batched internally
    async fn problem_details(&self, ids: &[ProblemId]) -> CatalogResult<Vec<Problem>>;

    /// Problems carrying `tag` within `range`, ascending by level
    async fn search_by_tag(&self, tag: &TagId, range: TierRange, page: u32) -> CatalogResult<Vec<Problem>>;

    /// Solvable problems within `range`, most-solved first
    async fn search_by_popularity(&self, range: TierRange, page: u32) -> CatalogResult<Vec<Problem>>;

    /// Solvable problems within `range` in random order, single page
    async fn search_random(&self, range: TierRange) -> CatalogResult<Vec<Problem>>;

    /// Resolve a tag display name to the catalog's internal tag id
    async fn resolve_tag(&self, display_name: &str) -> CatalogResult<TagId>;
}
