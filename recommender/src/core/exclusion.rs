//! Request-scoped exclusion tracking
//!
//! Holds the user's solved ids plus every id already chosen in the current
//! pipeline run. It only grows, and it is dropped with the request.

use std::collections::HashSet;

use shared::{Problem, ProblemId};

/// Ids that must never appear in the output
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    solved: HashSet<ProblemId>,
    chosen: HashSet<ProblemId>,
    stats: ExclusionStats,
}

/// Counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExclusionStats {
    pub candidates_seen: u64,
    pub rejected_solved: u64,
    pub rejected_chosen: u64,
    pub accepted: u64,
}

impl ExclusionSet {
    pub fn new<I>(solved: I) -> Self
    where
        I: IntoIterator<Item = ProblemId>,
    {
        Self {
            solved: solved.into_iter().collect(),
            chosen: HashSet::new(),
            stats: ExclusionStats::default(),
        }
    }

    pub fn contains(&self, id: &ProblemId) -> bool {
        self.solved.contains(id) || self.chosen.contains(id)
    }

    pub fn solved_count(&self) -> usize {
        self.solved.len()
    }

    pub fn chosen_count(&self) -> usize {
        self.chosen.len()
    }

    /// Accept up to `limit` candidates that are neither solved nor already chosen
    ///
    /// Accepted ids are recorded immediately, so a batch containing the same
    /// problem twice yields it once.
    pub fn take_new(&mut self, candidates: Vec<Problem>, limit: usize) -> Vec<Problem> {
        let mut accepted = Vec::new();

        for problem in candidates {
            if accepted.len() >= limit {
                break;
            }
            self.stats.candidates_seen += 1;

            if self.solved.contains(&problem.id) {
                self.stats.rejected_solved += 1;
                continue;
            }
            if !self.chosen.insert(problem.id.clone()) {
                self.stats.rejected_chosen += 1;
                continue;
            }

            self.stats.accepted += 1;
            accepted.push(problem);
        }

        accepted
    }

    pub fn stats(&self) -> ExclusionStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Tier;

    fn problems(ids: &[&str]) -> Vec<Problem> {
        ids.iter().map(|id| Problem::new(*id, *id, Tier::new(8))).collect()
    }

    #[test]
    fn test_filters_solved_and_chosen() {
        let mut exclusion = ExclusionSet::new(vec![ProblemId::from("1"), ProblemId::from("2")]);

        let first = exclusion.take_new(problems(&["1", "3", "4"]), 10);
        assert_eq!(first.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["3", "4"]);

        let second = exclusion.take_new(problems(&["2", "3", "5"]), 10);
        assert_eq!(second.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["5"]);

        assert_eq!(exclusion.chosen_count(), 3);
        assert!(exclusion.contains(&ProblemId::from("1")));
        assert!(exclusion.contains(&ProblemId::from("5")));
        assert!(!exclusion.contains(&ProblemId::from("6")));
    }

    #[test]
    fn test_respects_limit() {
        let mut exclusion = ExclusionSet::default();

        let accepted = exclusion.take_new(problems(&["1", "2", "3", "4"]), 2);

        assert_eq!(accepted.len(), 2);
        assert_eq!(exclusion.chosen_count(), 2);
        // Unaccepted candidates stay available for later stages
        assert_eq!(exclusion.take_new(problems(&["3"]), 1).len(), 1);
    }

    #[test]
    fn test_duplicates_within_batch_accepted_once() {
        let mut exclusion = ExclusionSet::default();

        let accepted = exclusion.take_new(problems(&["7", "7", "8"]), 5);

        assert_eq!(accepted.len(), 2);
        assert_eq!(exclusion.stats().rejected_chosen, 1);
    }

    #[test]
    fn test_stats_track_rejections() {
        let mut exclusion = ExclusionSet::new(vec![ProblemId::from("1")]);
        exclusion.take_new(problems(&["1", "2"]), 5);
        exclusion.take_new(problems(&["2"]), 5);

        let stats = exclusion.stats();
        assert_eq!(stats.candidates_seen, 3);
        assert_eq!(stats.rejected_solved, 1);
        assert_eq!(stats.rejected_chosen, 1);
        assert_eq!(stats.accepted, 1);
    }
}
