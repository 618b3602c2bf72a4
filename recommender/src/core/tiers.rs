//! Per-tag proficiency tiers and the aggregate tag tier
//!
//! Every (problem, tag) pair is one contribution: a problem with three tags
//! adds its level three times to the aggregate numerator and three to the
//! denominator. `AggregateMode::PerProblem` counts each tagged problem once.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared::{Problem, Tier};

/// Mapping from tag name to the user's rounded average level on that tag
pub type TagTierMap = HashMap<String, Tier>;

/// How the aggregate tag tier weights problems
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregateMode {
    /// Sum over (problem, tag) pairs
    #[default]
    TagWeighted,
    /// Plain average over problems that carry at least one tag
    PerProblem,
}

impl FromStr for AggregateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tag-weighted" | "tag_weighted" | "tag" => Ok(AggregateMode::TagWeighted),
            "per-problem" | "per_problem" | "problem" => Ok(AggregateMode::PerProblem),
            other => Err(format!("Unknown aggregate mode '{other}'. Valid options: tag-weighted, per-problem")),
        }
    }
}

/// Result of analysing a solved list
#[derive(Debug, Clone, PartialEq)]
pub struct TierSummary {
    pub per_tag: TagTierMap,
    /// 0 when no solved problem carries a tag
    pub aggregate: Tier,
    /// Number of problems that contributed (tagged problems)
    pub analysed: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    count: u64,
    level_sum: u64,
}

impl Accumulator {
    fn add(&mut self, level: Tier) {
        self.count += 1;
        self.level_sum += level.value() as u64;
    }

    fn mean(&self) -> Tier {
        if self.count == 0 {
            return Tier::UNRATED;
        }
        Tier::from_ratio(self.level_sum, self.count)
    }
}

/// Computes tag tiers from a user's solved problems
#[derive(Debug, Clone, Copy, Default)]
pub struct TierCalculator {
    mode: AggregateMode,
}

impl TierCalculator {
    pub fn new(mode: AggregateMode) -> Self {
        Self { mode }
    }

    /// Analyse solved problems; untagged problems are skipped entirely
    pub fn calculate(&self, solved: &[Problem]) -> TierSummary {
        let mut per_tag: HashMap<&str, Accumulator> = HashMap::new();
        let mut per_problem = Accumulator::default();
        let mut analysed = 0;

        for problem in solved.iter().filter(|p| !p.tags.is_empty()) {
            analysed += 1;
            per_problem.add(problem.level);
            for tag in &problem.tags {
                per_tag.entry(tag.as_str()).or_default().add(problem.level);
            }
        }

        let aggregate = match self.mode {
            AggregateMode::TagWeighted => {
                let pairs = per_tag.values().fold(Accumulator::default(), |acc, tag| Accumulator {
                    count: acc.count + tag.count,
                    level_sum: acc.level_sum + tag.level_sum,
                });
                pairs.mean()
            }
            AggregateMode::PerProblem => per_problem.mean(),
        };

        TierSummary {
            per_tag: per_tag.into_iter().map(|(tag, acc)| (tag.to_string(), acc.mean())).collect(),
            aggregate,
            analysed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(id: &str, level: u8, tags: &[&str]) -> Problem {
        Problem::new(id, format!("Problem {id}"), Tier::from(level)).with_tags(tags.iter().copied())
    }

    #[test]
    fn test_single_tag_average() {
        let solved = vec![problem("1", 10, &["dp"]), problem("2", 20, &["dp"])];

        let summary = TierCalculator::default().calculate(&solved);

        assert_eq!(summary.per_tag.get("dp"), Some(&Tier::new(15)));
        assert_eq!(summary.aggregate, Tier::new(15));
        assert_eq!(summary.analysed, 2);
    }

    #[test]
    fn test_multi_tag_problems_count_once_per_tag() {
        // dp: (10 + 13) / 2 = 11.5 -> 12
        let solved = vec![
            problem("1", 10, &["dp"]),
            problem("2", 13, &["dp", "greedy"]),
            problem("3", 4, &["math"]),
        ];

        let weighted = TierCalculator::new(AggregateMode::TagWeighted).calculate(&solved);
        // (10 + 13 + 13 + 4) / 4 = 10
        assert_eq!(weighted.aggregate, Tier::new(10));
        assert_eq!(weighted.per_tag.get("dp"), Some(&Tier::new(12)));
        assert_eq!(weighted.per_tag.get("greedy"), Some(&Tier::new(13)));
        assert_eq!(weighted.per_tag.get("math"), Some(&Tier::new(4)));

        let per_problem = TierCalculator::new(AggregateMode::PerProblem).calculate(&solved);
        // (10 + 13 + 4) / 3 = 9
        assert_eq!(per_problem.aggregate, Tier::new(9));
        assert_eq!(per_problem.per_tag, weighted.per_tag);
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        let solved = vec![problem("1", 1, &["io"]), problem("2", 2, &["io"])];

        let summary = TierCalculator::default().calculate(&solved);

        assert_eq!(summary.per_tag.get("io"), Some(&Tier::new(2)));
    }

    #[test]
    fn test_untagged_problems_are_skipped() {
        let solved = vec![problem("1", 30, &[]), problem("2", 6, &["graphs"])];

        let summary = TierCalculator::default().calculate(&solved);

        assert_eq!(summary.aggregate, Tier::new(6));
        assert_eq!(summary.analysed, 1);
        assert_eq!(summary.per_tag.len(), 1);
    }

    #[test]
    fn test_no_tags_yields_zero_aggregate() {
        let solved = vec![problem("1", 12, &[])];

        let summary = TierCalculator::default().calculate(&solved);

        assert!(summary.per_tag.is_empty());
        assert_eq!(summary.aggregate, Tier::UNRATED);
        assert_eq!(summary.analysed, 0);
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let solved = vec![
            problem("1", 7, &["dp", "math"]),
            problem("2", 11, &["graphs"]),
            problem("3", 16, &["dp", "graphs", "bfs"]),
        ];
        let calculator = TierCalculator::default();

        let first = calculator.calculate(&solved);
        for _ in 0..10 {
            assert_eq!(calculator.calculate(&solved), first);
        }
    }

    #[test]
    fn test_aggregate_mode_parsing() {
        assert_eq!("tag-weighted".parse::<AggregateMode>(), Ok(AggregateMode::TagWeighted));
        assert_eq!("PER-PROBLEM".parse::<AggregateMode>(), Ok(AggregateMode::PerProblem));
        assert!("median".parse::<AggregateMode>().is_err());
    }
}
