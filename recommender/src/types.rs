//! Recommender-specific data types

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use shared::{CatalogFailure, Problem, Tier};

/// Default number of problems in a slate
pub const DEFAULT_SLATE_SIZE: usize = 5;

/// Pipeline stage that produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    TagBased,
    Popularity,
    WidenedPopularity,
    Randomized,
    FixedDefault,
}

impl Strategy {
    pub fn is_network_backed(self) -> bool {
        !matches!(self, Strategy::FixedDefault)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::TagBased => write!(f, "tag"),
            Strategy::Popularity => write!(f, "popularity"),
            Strategy::WidenedPopularity => write!(f, "widened_popularity"),
            Strategy::Randomized => write!(f, "random"),
            Strategy::FixedDefault => write!(f, "fixed_default"),
        }
    }
}

/// What a single stage attempt produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageOutcome {
    /// Upstream returned problems; `accepted` survived exclusion and caps
    Candidates { returned: usize, accepted: usize },
    /// Upstream answered successfully with no problems
    Exhausted,
    /// Upstream failed; treated as zero results
    Unavailable {
        #[serde(serialize_with = "serialize_failure")]
        failure: CatalogFailure,
    },
    /// Stage was not attempted (no tags, nothing needed, budget spent)
    Skipped { reason: String },
}

fn serialize_failure<S: serde::Serializer>(failure: &CatalogFailure, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&failure.to_string())
}

impl StageOutcome {
    pub fn accepted(&self) -> usize {
        match self {
            StageOutcome::Candidates { accepted, .. } => *accepted,
            _ => 0,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, StageOutcome::Unavailable { .. })
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        StageOutcome::Skipped { reason: reason.into() }
    }
}

/// Diagnostic record of one stage attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub strategy: Strategy,
    /// Result page queried, if the stage is paged
    pub page: Option<u32>,
    pub outcome: StageOutcome,
}

/// A recommended problem with the stage that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedProblem {
    #[serde(flatten)]
    pub problem: Problem,
    pub source: Strategy,
}

/// Final, level-ordered recommendation list for one request
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationSlate {
    pub handle: String,
    pub page: u32,
    pub requested: usize,
    pub target_tier: Tier,
    pub problems: Vec<RecommendedProblem>,
    /// Number of problems contributed by each strategy
    pub contributions: BTreeMap<Strategy, usize>,
    pub stages: Vec<StageReport>,
}

impl RecommendationSlate {
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// True when every stage ran dry before the requested count was reached
    pub fn is_short(&self) -> bool {
        self.problems.len() < self.requested
    }

    pub fn contributed_by(&self, strategy: Strategy) -> usize {
        self.contributions.get(&strategy).copied().unwrap_or(0)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.problems.iter().map(|p| p.problem.id.as_str()).collect()
    }
}
