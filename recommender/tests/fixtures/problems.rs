//! Problem and history builders for integration tests

use shared::{Problem, Tier};

/// Tag keys used by the generated catalog
pub const TAGS: [&str; 8] = [
    "dp",
    "greedy",
    "math",
    "graphs",
    "implementation",
    "bruteforcing",
    "strings",
    "data_structures",
];

/// Build a problem with the given tags and a solver count
pub fn problem(id: u64, level: u8, tags: &[&str], solvers: u64) -> Problem {
    Problem::new(id, format!("Problem {id}"), Tier::from(level))
        .with_tags(tags.iter().copied())
        .with_stats(solvers, 2.0)
}

/// A deterministic catalog of `size` problems starting at id 10000
///
/// Levels cycle through 1..=30, each problem carries two tags and solver
/// counts decrease with the id so popularity order is stable.
#[allow(dead_code)]
pub fn generated_universe(size: u64) -> Vec<Problem> {
    (0..size)
        .map(|i| {
            let level = (i % 30) as u8 + 1;
            let first = TAGS[(i % 8) as usize];
            let second = TAGS[((i / 8) % 8) as usize];
            problem(10_000 + i, level, &[first, second], 100_000 - i * 13)
        })
        .collect()
}

/// Solved history whose tag ranking is exactly `ranking`, most solved first
///
/// The tag at position `k` is carried by `ranking.len() - k` problems, all at
/// `level`. Ids start at `first_id`.
#[allow(dead_code)]
pub fn ranked_history(first_id: u64, level: u8, ranking: &[&str]) -> Vec<Problem> {
    let mut history = Vec::new();
    let mut next_id = first_id;
    for (position, tag) in ranking.iter().enumerate() {
        for _ in 0..(ranking.len() - position) {
            history.push(problem(next_id, level, &[tag], 500));
            next_id += 1;
        }
    }
    history
}
