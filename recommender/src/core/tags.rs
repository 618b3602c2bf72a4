//! Tag ranking for the tag-based strategy

use std::collections::HashMap;

use shared::Problem;

/// Number of tags the tag-based strategy cycles through
pub const TOP_TAG_LIMIT: usize = 5;

/// Rank tags by how many solved problems carry them, most first
///
/// Ties keep the order in which tags were first seen.
pub fn rank_top_tags(solved: &[Problem], limit: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for tag in solved.iter().flat_map(|p| p.tags.iter()) {
        let count = counts.entry(tag.as_str()).or_insert(0);
        if *count == 0 {
            first_seen.push(tag.as_str());
        }
        *count += 1;
    }

    // Stable sort keeps first-seen order among equal counts
    first_seen.sort_by(|a, b| counts[b].cmp(&counts[a]));
    first_seen.into_iter().take(limit).map(str::to_string).collect()
}

/// Tag chosen for a request page; pages are 1-based and cycle through the list
pub fn select_tag(top_tags: &[String], page: u32) -> Option<&String> {
    if top_tags.is_empty() {
        return None;
    }
    let index = (page.max(1) as usize - 1) % top_tags.len();
    top_tags.get(index)
}
