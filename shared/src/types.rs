//! Core shared types and identifiers for the problem catalog domain

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL used to link a problem to its statement page
pub const PROBLEM_LINK_BASE: &str = "https://boj.kr";

/// Difficulty/rating tier on the shared 0..=30 scale
///
/// Tier 0 is unrated. Tiers 1..=30 span six colours with five sub-levels each,
/// from Bronze V (1) to Ruby I (30). Users and problems share this scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tier(u8);

impl Tier {
    pub const UNRATED: Tier = Tier(0);
    pub const MIN_RATED: Tier = Tier(1);
    pub const MAX: Tier = Tier(30);

    const COLOURS: [&'static str; 6] = ["Bronze", "Silver", "Gold", "Platinum", "Diamond", "Ruby"];
    const LEVELS: [&'static str; 5] = ["V", "IV", "III", "II", "I"];
    const SHORT_COLOURS: [char; 6] = ['b', 's', 'g', 'p', 'd', 'r'];

    /// Build a tier, clamping into 0..=30
    pub fn new(value: i64) -> Self {
        Tier(value.clamp(0, Self::MAX.0 as i64) as u8)
    }

    /// Round `numerator / denominator` half away from zero and clamp it into range
    ///
    /// Integer arithmetic keeps exact halves such as 75/10 from drifting
    /// below .5. A zero denominator gives unrated.
    pub fn from_ratio(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            return Tier::UNRATED;
        }
        let rounded = (2 * numerator + denominator) / (2 * denominator);
        Self::new(rounded.min(Self::MAX.0 as u64) as i64)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_rated(self) -> bool {
        self.0 > 0
    }

    /// Human readable tier name, e.g. "Gold III"
    pub fn name(self) -> String {
        match self.0 {
            0 => "Unrated".to_string(),
            n => {
                let colour = Self::COLOURS[((n - 1) / 5) as usize];
                let level = Self::LEVELS[((n - 1) % 5) as usize];
                format!("{colour} {level}")
            }
        }
    }

    /// Compact code used by the catalog query language, e.g. "g3"
    ///
    /// Unrated has no code of its own and is rendered as the lowest rated tier.
    pub fn short_code(self) -> String {
        let n = self.0.max(1);
        let colour = Self::SHORT_COLOURS[((n - 1) / 5) as usize];
        let level = 5 - (n - 1) % 5;
        format!("{colour}{level}")
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for Tier {
    fn from(value: u8) -> Self {
        Tier::new(value as i64)
    }
}

/// Inclusive tier range sent to the catalog, always inside [1, 30]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TierRange {
    pub min: Tier,
    pub max: Tier,
}

impl TierRange {
    /// Range of `target ± spread`, clamped into [1, 30]
    pub fn around(target: Tier, spread: u8) -> Self {
        let centre = target.value() as i64;
        let spread = spread as i64;
        let lo = (centre - spread).clamp(Tier::MIN_RATED.0 as i64, Tier::MAX.0 as i64);
        let hi = (centre + spread).clamp(Tier::MIN_RATED.0 as i64, Tier::MAX.0 as i64);
        Self {
            min: Tier::new(lo),
            max: Tier::new(hi.max(lo)),
        }
    }

    pub fn contains(&self, tier: Tier) -> bool {
        self.min <= tier && tier <= self.max
    }

    /// Catalog query fragment, e.g. "*s5..g1"
    pub fn query_fragment(&self) -> String {
        format!("*{}..{}", self.min.short_code(), self.max.short_code())
    }
}

impl fmt::Display for TierRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Canonical problem identity in the catalog
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemId(String);

impl ProblemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProblemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for ProblemId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Catalog-internal tag identifier, resolved from a tag display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(String);

impl TagId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of a user fetched once per recommendation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub handle: String,
    pub tier: Tier,
    pub rating: i64,
}

impl UserProfile {
    /// Profile used when the catalog could not be reached for the real one
    pub fn unrated(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            tier: Tier::UNRATED,
            rating: 0,
        }
    }
}

/// A catalog problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: ProblemId,
    pub title: String,
    pub level: Tier,
    /// Ordered, duplicate-free tag names
    pub tags: Vec<String>,
    pub accepted_user_count: u64,
    pub average_tries: f64,
}

impl Problem {
    pub fn new(id: impl Into<ProblemId>, title: impl Into<String>, level: Tier) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            level,
            tags: Vec::new(),
            accepted_user_count: 0,
            average_tries: 0.0,
        }
    }

    /// Attach tags, keeping first occurrence order and dropping repeats
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            let tag = tag.into();
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self
    }

    pub fn with_stats(mut self, accepted_user_count: u64, average_tries: f64) -> Self {
        self.accepted_user_count = accepted_user_count;
        self.average_tries = average_tries.max(0.0);
        self
    }

    pub fn url(&self) -> String {
        format!("{}/{}", PROBLEM_LINK_BASE, self.id)
    }
}
