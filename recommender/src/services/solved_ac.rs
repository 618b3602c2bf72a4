//! solved.ac v3 catalog adapter

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use shared::{CatalogFailure, CatalogResult, Problem, ProblemId, TagId, Tier, TierRange, UserProfile};

use crate::config::CatalogConfig;
use crate::error::RecommendResult;
use crate::services::retry::{with_retry, RetryPolicy};
use crate::traits::ProblemCatalog;

const USER_AGENT: &str = concat!("recommender/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    handle: String,
    #[serde(default)]
    tier: i64,
    #[serde(default)]
    rating: i64,
}

#[derive(Debug, Deserialize)]
struct SearchPage<T> {
    #[serde(default)]
    count: u64,
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagDto {
    key: String,
    #[serde(default)]
    display_names: Vec<DisplayNameDto>,
}

#[derive(Debug, Deserialize)]
struct DisplayNameDto {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProblemDto {
    problem_id: u64,
    #[serde(default)]
    title_ko: String,
    #[serde(default)]
    level: i64,
    #[serde(default)]
    tags: Vec<TagDto>,
    #[serde(default)]
    accepted_user_count: u64,
    #[serde(default)]
    average_tries: f64,
}

impl From<ProblemDto> for Problem {
    fn from(dto: ProblemDto) -> Self {
        Problem::new(dto.problem_id, dto.title_ko, Tier::new(dto.level))
            .with_tags(dto.tags.into_iter().map(|tag| tag.key))
            .with_stats(dto.accepted_user_count, dto.average_tries)
    }
}

/// Sort orders understood by the problem search endpoint
#[derive(Debug, Clone, Copy)]
enum SearchOrder {
    LevelAscending,
    SolvedDescending,
    Random,
}

impl SearchOrder {
    fn params(self) -> (&'static str, &'static str) {
        match self {
            SearchOrder::LevelAscending => ("level", "asc"),
            SearchOrder::SolvedDescending => ("solved", "desc"),
            SearchOrder::Random => ("random", "asc"),
        }
    }
}

/// Catalog client backed by the solved.ac HTTP API
pub struct SolvedAcClient {
    http: reqwest::Client,
    config: CatalogConfig,
    retry: RetryPolicy,
}

impl SolvedAcClient {
    pub fn new(config: CatalogConfig) -> RecommendResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        let retry = RetryPolicy {
            max_retries: config.max_retries,
            initial_backoff: config.initial_backoff,
            ..RetryPolicy::default()
        };
        Ok(Self { http, config, retry })
    }

    /// Override the retry policy (tests use a fast one)
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> CatalogResult<T> {
        with_retry(self.retry, || self.get_once(path, query)).await
    }

    async fn get_once<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> CatalogResult<T> {
        let url = self.endpoint(path);
        tracing::debug!(url = %url, query = ?query, "Catalog request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(transport_failure)?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(CatalogFailure::NotFound),
            StatusCode::TOO_MANY_REQUESTS => return Err(CatalogFailure::RateLimited),
            status => return Err(CatalogFailure::Server(status.as_u16())),
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogFailure::InvalidPayload(e.to_string()))
    }

    async fn search(&self, query: String, order: SearchOrder, page: u32) -> CatalogResult<Vec<Problem>> {
        let (sort, direction) = order.params();
        let params = [
            ("query", query),
            ("sort", sort.to_string()),
            ("direction", direction.to_string()),
            ("page", page.max(1).to_string()),
        ];
        let result: SearchPage<ProblemDto> = self.get_json("search/problem", &params).await?;
        Ok(result.items.into_iter().map(Problem::from).collect())
    }
}

fn transport_failure(error: reqwest::Error) -> CatalogFailure {
    if error.is_timeout() {
        CatalogFailure::Timeout
    } else if error.is_decode() {
        CatalogFailure::InvalidPayload(error.to_string())
    } else {
        CatalogFailure::Network(error.to_string())
    }
}

#[async_trait]
impl ProblemCatalog for SolvedAcClient {
    async fn user_profile(&self, handle: &str) -> CatalogResult<UserProfile> {
        let user: UserDto = self.get_json("user/show", &[("handle", handle.to_string())]).await?;
        Ok(UserProfile {
            handle: user.handle,
            tier: Tier::new(user.tier),
            rating: user.rating,
        })
    }

    async fn solved_problem_ids(&self, handle: &str) -> CatalogResult<Vec<ProblemId>> {
        let mut ids = Vec::new();

        for page in 1..=self.config.solved_page_cap {
            let params = [("query", format!("s@{handle}")), ("page", page.to_string())];
            let result: SearchPage<ProblemDto> = match self.get_json("search/problem", &params).await {
                Ok(result) => result,
                // Later pages failing still leaves a usable partial history
                Err(failure) if page > 1 => {
                    tracing::warn!("Solved list for {} truncated at page {}: {}", handle, page, failure);
                    break;
                }
                Err(failure) => return Err(failure),
            };

            if result.items.is_empty() {
                break;
            }
            ids.extend(result.items.into_iter().map(|item| ProblemId::from(item.problem_id)));
            if ids.len() as u64 >= result.count {
                break;
            }
        }

        Ok(ids)
    }

    async fn problem_details(&self, ids: &[ProblemId]) -> CatalogResult<Vec<Problem>> {
        let mut problems = Vec::with_capacity(ids.len());
        let mut first_failure = None;

        for batch in ids.chunks(self.config.lookup_batch_size.max(1)) {
            let joined = batch.iter().map(ProblemId::as_str).collect::<Vec<_>>().join(",");
            match self
                .get_json::<Vec<ProblemDto>>("problem/lookup", &[("problemIds", joined)])
                .await
            {
                Ok(batch_problems) => problems.extend(batch_problems.into_iter().map(Problem::from)),
                Err(failure) => {
                    tracing::warn!("Problem lookup batch of {} failed: {}", batch.len(), failure);
                    first_failure.get_or_insert(failure);
                }
            }
        }

        match first_failure {
            Some(failure) if problems.is_empty() => Err(failure),
            _ => Ok(problems),
        }
    }

    async fn search_by_tag(&self, tag: &TagId, range: TierRange, page: u32) -> CatalogResult<Vec<Problem>> {
        let query = format!("#{} {}", tag, range.query_fragment());
        self.search(query, SearchOrder::LevelAscending, page).await
    }

    async fn search_by_popularity(&self, range: TierRange, page: u32) -> CatalogResult<Vec<Problem>> {
        let query = format!("solvable:true {}", range.query_fragment());
        self.search(query, SearchOrder::SolvedDescending, page).await
    }

    async fn search_random(&self, range: TierRange) -> CatalogResult<Vec<Problem>> {
        let query = format!("solvable:true {}", range.query_fragment());
        self.search(query, SearchOrder::Random, 1).await
    }

    async fn resolve_tag(&self, display_name: &str) -> CatalogResult<TagId> {
        let result: SearchPage<TagDto> = self
            .get_json("search/tag", &[("query", display_name.to_string())])
            .await?;

        let wanted = display_name.trim().to_lowercase();
        let exact = result.items.iter().position(|tag| {
            tag.key.to_lowercase() == wanted || tag.display_names.iter().any(|d| d.name.to_lowercase() == wanted)
        });

        let mut items = result.items;
        match exact {
            Some(index) => Ok(TagId::new(items.swap_remove(index).key)),
            None if !items.is_empty() => Ok(TagId::new(items.swap_remove(0).key)),
            None => Err(CatalogFailure::NotFound),
        }
    }
}
