//! In-memory problem catalog with failure injection

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use recommender::ProblemCatalog;
use shared::{CatalogFailure, CatalogResult, Problem, ProblemId, TagId, Tier, TierRange, UserProfile};

/// Results returned per search page
pub const FIXTURE_PAGE_SIZE: usize = 20;

/// Catalog operations, used for failure injection and call recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    UserProfile,
    SolvedIds,
    ProblemDetails,
    SearchByTag,
    SearchByPopularity,
    SearchRandom,
    ResolveTag,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::UserProfile,
        Operation::SolvedIds,
        Operation::ProblemDetails,
        Operation::SearchByTag,
        Operation::SearchByPopularity,
        Operation::SearchRandom,
        Operation::ResolveTag,
    ];
}

/// One recorded catalog call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: Operation,
    pub detail: String,
}

/// Catalog backed by a fixed problem list
pub struct FixtureCatalog {
    users: HashMap<String, UserProfile>,
    solved: HashMap<String, Vec<ProblemId>>,
    problems: Vec<Problem>,
    failing: HashSet<Operation>,
    seed: u64,
    calls: Mutex<Vec<RecordedCall>>,
}

#[allow(dead_code)]
impl FixtureCatalog {
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            solved: HashMap::new(),
            problems: Vec::new(),
            failing: HashSet::new(),
            seed: 7,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_user(mut self, handle: &str, tier: u8) -> Self {
        self.users.insert(
            handle.to_string(),
            UserProfile {
                handle: handle.to_string(),
                tier: Tier::from(tier),
                rating: tier as i64 * 100,
            },
        );
        self.solved.entry(handle.to_string()).or_default();
        self
    }

    /// Register problems as solved by `handle`, adding them to the catalog
    pub fn with_solved(mut self, handle: &str, history: Vec<Problem>) -> Self {
        let ids = self.solved.entry(handle.to_string()).or_default();
        ids.extend(history.iter().map(|p| p.id.clone()));
        self.add_problems(history);
        self
    }

    /// Mark already-known problem ids as solved by `handle`
    pub fn with_solved_ids(mut self, handle: &str, ids: &[u64]) -> Self {
        self.solved
            .entry(handle.to_string())
            .or_default()
            .extend(ids.iter().map(|id| ProblemId::from(*id)));
        self
    }

    pub fn with_problems(mut self, problems: Vec<Problem>) -> Self {
        self.add_problems(problems);
        self
    }

    pub fn failing(mut self, operation: Operation) -> Self {
        self.failing.insert(operation);
        self
    }

    pub fn failing_all(mut self) -> Self {
        self.failing.extend(Operation::ALL);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, operation: Operation) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.operation == operation)
            .collect()
    }

    fn add_problems(&mut self, problems: Vec<Problem>) {
        for problem in problems {
            if !self.problems.iter().any(|p| p.id == problem.id) {
                self.problems.push(problem);
            }
        }
    }

    fn record(&self, operation: Operation, detail: String) -> CatalogResult<()> {
        self.calls.lock().unwrap().push(RecordedCall { operation, detail });
        if self.failing.contains(&operation) {
            Err(CatalogFailure::Server(503))
        } else {
            Ok(())
        }
    }

    fn in_range(&self, range: TierRange) -> Vec<Problem> {
        self.problems
            .iter()
            .filter(|p| range.contains(p.level))
            .cloned()
            .collect()
    }
}

fn page_of(problems: Vec<Problem>, page: u32) -> Vec<Problem> {
    let start = (page.max(1) as usize - 1) * FIXTURE_PAGE_SIZE;
    problems.into_iter().skip(start).take(FIXTURE_PAGE_SIZE).collect()
}

#[async_trait]
impl ProblemCatalog for FixtureCatalog {
    async fn user_profile(&self, handle: &str) -> CatalogResult<UserProfile> {
        self.record(Operation::UserProfile, handle.to_string())?;
        self.users.get(handle).cloned().ok_or(CatalogFailure::NotFound)
    }

    async fn solved_problem_ids(&self, handle: &str) -> CatalogResult<Vec<ProblemId>> {
        self.record(Operation::SolvedIds, handle.to_string())?;
        Ok(self.solved.get(handle).cloned().unwrap_or_default())
    }

    async fn problem_details(&self, ids: &[ProblemId]) -> CatalogResult<Vec<Problem>> {
        self.record(Operation::ProblemDetails, ids.len().to_string())?;
        Ok(ids
            .iter()
            .filter_map(|id| self.problems.iter().find(|p| &p.id == id).cloned())
            .collect())
    }

    async fn search_by_tag(&self, tag: &TagId, range: TierRange, page: u32) -> CatalogResult<Vec<Problem>> {
        self.record(Operation::SearchByTag, format!("{tag} {range} {page}"))?;
        let mut matching: Vec<Problem> = self
            .in_range(range)
            .into_iter()
            .filter(|p| p.tags.iter().any(|t| t == tag.as_str()))
            .collect();
        matching.sort_by_key(|p| p.level);
        Ok(page_of(matching, page))
    }

    async fn search_by_popularity(&self, range: TierRange, page: u32) -> CatalogResult<Vec<Problem>> {
        self.record(Operation::SearchByPopularity, format!("{range} {page}"))?;
        let mut matching = self.in_range(range);
        matching.sort_by(|a, b| b.accepted_user_count.cmp(&a.accepted_user_count));
        Ok(page_of(matching, page))
    }

    async fn search_random(&self, range: TierRange) -> CatalogResult<Vec<Problem>> {
        self.record(Operation::SearchRandom, range.to_string())?;
        let mut matching = self.in_range(range);
        let seed = self.seed ^ ((range.min.value() as u64) << 8 | range.max.value() as u64);
        matching.shuffle(&mut StdRng::seed_from_u64(seed));
        Ok(page_of(matching, 1))
    }

    async fn resolve_tag(&self, display_name: &str) -> CatalogResult<TagId> {
        self.record(Operation::ResolveTag, display_name.to_string())?;
        let known = self
            .problems
            .iter()
            .any(|p| p.tags.iter().any(|t| t == display_name));
        if known {
            Ok(TagId::new(display_name))
        } else {
            Err(CatalogFailure::NotFound)
        }
    }
}
