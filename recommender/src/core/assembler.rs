//! Final slate assembly

use std::collections::{BTreeMap, HashSet};

use crate::error::{RecommendError, RecommendResult};
use crate::types::{RecommendedProblem, Strategy};

/// Ordered problems plus per-strategy counts
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledSlate {
    pub problems: Vec<RecommendedProblem>,
    pub contributions: BTreeMap<Strategy, usize>,
}

/// Check ids are unique, then stable-sort by ascending level
///
/// Input is expected to be already filtered through the exclusion set; a
/// repeated id here means the pipeline broke its own bookkeeping.
pub fn assemble(mut arrivals: Vec<RecommendedProblem>) -> RecommendResult<AssembledSlate> {
    let mut seen = HashSet::with_capacity(arrivals.len());
    for entry in &arrivals {
        if !seen.insert(&entry.problem.id) {
            return Err(RecommendError::DuplicateProblem {
                id: entry.problem.id.clone(),
            });
        }
    }

    let mut contributions = BTreeMap::new();
    for entry in &arrivals {
        *contributions.entry(entry.source).or_insert(0) += 1;
    }

    arrivals.sort_by_key(|entry| entry.problem.level);

    Ok(AssembledSlate {
        problems: arrivals,
        contributions,
    })
}
