//! Recommender configuration
//!
//! Values are read from environment variables, after loading a `.env` file
//! from the current directory or its parents if one exists:
//!
//! - `CATALOG_BASE_URL`: catalog API root (default `https://solved.ac/api/v3`)
//! - `CATALOG_TIMEOUT_MS`: per-call timeout (default 5000)
//! - `CATALOG_MAX_RETRIES`: retries for transient failures (default 2)
//! - `CATALOG_SOLVED_PAGE_CAP`: max pages walked when listing solved ids (default 10)
//! - `PIPELINE_BUDGET_MS`: wall-clock budget for one request's network stages,
//!   0 disables it (default 20000)
//! - `ANALYSIS_LIMIT`: max solved problems analysed for tiers, taken from the end of the solved list (default 200)
//! - `AGGREGATE_MODE`: `tag-weighted` or `per-problem` (default `tag-weighted`)

use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::core::{AggregateMode, PipelineConfig};
use crate::error::{RecommendError, RecommendResult};

pub const DEFAULT_CATALOG_URL: &str = "https://solved.ac/api/v3";

/// Maximum ids per problem lookup call
pub const LOOKUP_BATCH_SIZE: usize = 50;

/// Catalog adapter settings
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub solved_page_cap: u32,
    pub lookup_batch_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_CATALOG_URL).expect("default catalog URL is valid"),
            timeout: Duration::from_millis(5000),
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
            solved_page_cap: 10,
            lookup_batch_size: LOOKUP_BATCH_SIZE,
        }
    }
}

impl CatalogConfig {
    /// Config pointing at an arbitrary base URL, e.g. a local mock server
    pub fn with_base_url(base_url: &str) -> RecommendResult<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            ..Self::default()
        })
    }
}

/// Full recommender configuration
#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    pub catalog: CatalogConfig,
    pub pipeline: PipelineConfig,
    /// Tier analysis uses the last `analysis_limit` solved ids
    pub analysis_limit: usize,
    pub aggregate_mode: AggregateMode,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            pipeline: PipelineConfig::default(),
            analysis_limit: 200,
            aggregate_mode: AggregateMode::default(),
        }
    }
}

impl RecommenderConfig {
    /// Load configuration from `.env` and the process environment
    pub fn from_env() -> RecommendResult<Self> {
        // A missing .env file is fine
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> RecommendResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("CATALOG_BASE_URL") {
            config.catalog.base_url = parse_base_url(&url)?;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "CATALOG_TIMEOUT_MS")? {
            if ms == 0 {
                return Err(RecommendError::config("CATALOG_TIMEOUT_MS must be greater than 0"));
            }
            config.catalog.timeout = Duration::from_millis(ms);
        }
        if let Some(retries) = parse_var::<u32>(&lookup, "CATALOG_MAX_RETRIES")? {
            config.catalog.max_retries = retries;
        }
        if let Some(cap) = parse_var::<u32>(&lookup, "CATALOG_SOLVED_PAGE_CAP")? {
            if cap == 0 {
                return Err(RecommendError::config("CATALOG_SOLVED_PAGE_CAP must be at least 1"));
            }
            config.catalog.solved_page_cap = cap;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "PIPELINE_BUDGET_MS")? {
            config.pipeline.budget = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(limit) = parse_var::<usize>(&lookup, "ANALYSIS_LIMIT")? {
            config.analysis_limit = limit;
        }
        if let Some(mode) = lookup("AGGREGATE_MODE") {
            config.aggregate_mode = mode.parse().map_err(RecommendError::config)?;
        }

        Ok(config)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> RecommendResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| RecommendError::config(format!("Invalid {key} '{raw}': {e}"))),
    }
}

fn parse_base_url(raw: &str) -> RecommendResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| RecommendError::config(format!("Invalid catalog URL '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(RecommendError::config(format!("Catalog URL must be http(s): {raw}")));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = RecommenderConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.catalog.base_url.as_str(), "https://solved.ac/api/v3");
        assert_eq!(config.catalog.timeout, Duration::from_millis(5000));
        assert_eq!(config.catalog.max_retries, 2);
        assert_eq!(config.catalog.lookup_batch_size, 50);
        assert_eq!(config.pipeline.budget, Some(Duration::from_secs(20)));
        assert_eq!(config.aggregate_mode, AggregateMode::TagWeighted);
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = RecommenderConfig::from_lookup(lookup_from(&[
            ("CATALOG_BASE_URL", "http://127.0.0.1:9000/api"),
            ("CATALOG_TIMEOUT_MS", "750"),
            ("CATALOG_MAX_RETRIES", "0"),
            ("CATALOG_SOLVED_PAGE_CAP", "3"),
            ("PIPELINE_BUDGET_MS", "0"),
            ("ANALYSIS_LIMIT", "25"),
            ("AGGREGATE_MODE", "per-problem"),
        ]))
        .unwrap();

        assert_eq!(config.catalog.base_url.as_str(), "http://127.0.0.1:9000/api");
        assert_eq!(config.catalog.timeout, Duration::from_millis(750));
        assert_eq!(config.catalog.max_retries, 0);
        assert_eq!(config.catalog.solved_page_cap, 3);
        assert_eq!(config.pipeline.budget, None);
        assert_eq!(config.analysis_limit, 25);
        assert_eq!(config.aggregate_mode, AggregateMode::PerProblem);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        for pairs in [
            [("CATALOG_TIMEOUT_MS", "soon")],
            [("CATALOG_TIMEOUT_MS", "0")],
            [("CATALOG_BASE_URL", "ftp://example.com")],
            [("AGGREGATE_MODE", "median")],
            [("CATALOG_SOLVED_PAGE_CAP", "0")],
        ] {
            let result = RecommenderConfig::from_lookup(lookup_from(&pairs));
            assert!(matches!(result, Err(RecommendError::ConfigError { .. })), "{pairs:?}");
        }
    }
}
