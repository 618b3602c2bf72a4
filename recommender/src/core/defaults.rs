//! Built-in fallback problems used when the catalog cannot fill a slate

use shared::{Problem, Tier};

/// (id, title, level, tags)
const DEFAULT_PROBLEMS: &[(&str, &str, u8, &[&str])] = &[
    ("1000", "A+B", 1, &["math", "implementation", "arithmetic"]),
    ("1920", "수 찾기", 7, &["data_structures", "sorting", "binary_search"]),
    ("1003", "피보나치 함수", 8, &["dp"]),
    ("9095", "1, 2, 3 더하기", 8, &["dp"]),
    ("1260", "DFS와 BFS", 9, &["graphs", "graph_traversal", "bfs", "dfs"]),
    ("1931", "회의실 배정", 10, &["greedy", "sorting"]),
    ("2178", "미로 탐색", 10, &["graphs", "graph_traversal", "bfs", "grid_graph"]),
    ("11053", "가장 긴 증가하는 부분 수열", 9, &["dp"]),
];

/// Well-known problems spanning common tags, in preference order
pub fn default_problems() -> Vec<Problem> {
    DEFAULT_PROBLEMS
        .iter()
        .map(|(id, title, level, tags)| Problem::new(*id, *title, Tier::from(*level)).with_tags(tags.iter().copied()))
        .collect()
}
