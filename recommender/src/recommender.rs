//! Request-level orchestration: profile lookup, tier analysis, pipeline run
//! and slate assembly.

use std::sync::Arc;

use shared::{request_debug, request_info, request_warn, CatalogFailure, Problem, ProblemId, RequestId, Tier, UserProfile};

use crate::config::RecommenderConfig;
use crate::core::{
    assemble, rank_top_tags, target_for, ExclusionSet, PipelineRequest, RecommendationPipeline, TierCalculator,
    TOP_TAG_LIMIT,
};
use crate::error::{RecommendError, RecommendResult};
use crate::traits::ProblemCatalog;
use crate::types::RecommendationSlate;

// ============================================================================
// Recommender
// ============================================================================

/// Entry point for recommendation requests
///
/// Holds no per-request state, so one instance can serve concurrent
/// requests; each call builds its own exclusion set and pipeline run.
pub struct Recommender<C>
where
    C: ProblemCatalog + 'static,
{
    catalog: Arc<C>,
    config: RecommenderConfig,
}

impl<C> Clone for Recommender<C>
where
    C: ProblemCatalog + 'static,
{
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            config: self.config.clone(),
        }
    }
}

/// What the tier analysis produced for one user
struct UserAnalysis {
    solved: Vec<ProblemId>,
    target: Tier,
    top_tags: Vec<String>,
}

impl<C> Recommender<C>
where
    C: ProblemCatalog + 'static,
{
    pub fn new(catalog: C, config: RecommenderConfig) -> Self {
        Self::with_shared_catalog(Arc::new(catalog), config)
    }

    pub fn with_shared_catalog(catalog: Arc<C>, config: RecommenderConfig) -> Self {
        Self { catalog, config }
    }

    /// Build a slate of up to `count` unsolved problems for `handle`
    ///
    /// Only an unknown handle or an invalid request is an error. Catalog
    /// outages degrade the slate and are reported through its stage list.
    pub async fn recommend(&self, handle: &str, page: u32, count: usize) -> RecommendResult<RecommendationSlate> {
        let handle = validate(handle, page, count)?;
        let request_id = RequestId::new();
        request_info!(request_id, handle = %handle, page, count, "Recommendation requested");

        let user = self.load_profile(request_id, handle).await?;
        let analysis = self.analyse(request_id, &user).await;
        request_info!(
            request_id,
            user_tier = %user.tier.name(),
            target = %analysis.target.name(),
            solved = analysis.solved.len(),
            "Target tier resolved"
        );

        let pipeline = RecommendationPipeline::new(self.catalog.as_ref(), self.config.pipeline.clone());
        let pipeline_request = PipelineRequest {
            request_id,
            target: analysis.target,
            top_tags: &analysis.top_tags,
            page,
            count,
        };
        let output = pipeline
            .run(&pipeline_request, ExclusionSet::new(analysis.solved))
            .await;
        request_debug!(request_id, "Exclusion stats: {:?}", output.exclusion);

        let assembled = assemble(output.arrivals)?;
        let slate = RecommendationSlate {
            handle: user.handle,
            page,
            requested: count,
            target_tier: analysis.target,
            problems: assembled.problems,
            contributions: assembled.contributions,
            stages: output.stages,
        };

        if slate.is_short() {
            request_warn!(request_id, "Slate short: {} of {} problems", slate.len(), count);
        } else {
            request_info!(request_id, "Slate complete with {} problems", slate.len());
        }
        Ok(slate)
    }

    async fn load_profile(&self, request_id: RequestId, handle: &str) -> RecommendResult<UserProfile> {
        match self.catalog.user_profile(handle).await {
            Ok(profile) => Ok(profile),
            Err(CatalogFailure::NotFound) => {
                request_info!(request_id, handle = %handle, "Handle not found in catalog");
                Err(RecommendError::UserNotFound {
                    handle: handle.to_string(),
                })
            }
            Err(failure) => {
                request_warn!(request_id, "Profile lookup failed, continuing as unrated: {}", failure);
                Ok(UserProfile::unrated(handle))
            }
        }
    }

    async fn analyse(&self, request_id: RequestId, user: &UserProfile) -> UserAnalysis {
        let solved = match self.catalog.solved_problem_ids(&user.handle).await {
            Ok(ids) => ids,
            Err(failure) => {
                request_warn!(request_id, "Solved list unavailable, treating as empty: {}", failure);
                Vec::new()
            }
        };

        let details = self.solved_details(request_id, &solved).await;
        if details.is_empty() {
            return UserAnalysis {
                solved,
                target: target_for(user.tier, None),
                top_tags: Vec::new(),
            };
        }

        let summary = TierCalculator::new(self.config.aggregate_mode).calculate(&details);
        request_debug!(
            request_id,
            "Analysed {} tagged problems across {} tags, aggregate {}",
            summary.analysed,
            summary.per_tag.len(),
            summary.aggregate.value()
        );

        UserAnalysis {
            target: target_for(user.tier, Some(summary.aggregate)),
            top_tags: rank_top_tags(&details, TOP_TAG_LIMIT),
            solved,
        }
    }

    async fn solved_details(&self, request_id: RequestId, solved: &[ProblemId]) -> Vec<Problem> {
        if solved.is_empty() {
            return Vec::new();
        }
        // Listing is ordered by id, so the tail holds the newest problems
        let sample = &solved[solved.len().saturating_sub(self.config.analysis_limit)..];
        match self.catalog.problem_details(sample).await {
            Ok(problems) => problems,
            Err(failure) => {
                request_warn!(request_id, "Problem details unavailable, skipping tier analysis: {}", failure);
                Vec::new()
            }
        }
    }
}

fn validate(handle: &str, page: u32, count: usize) -> RecommendResult<&str> {
    let handle = handle.trim();
    if handle.is_empty() {
        return Err(RecommendError::InvalidHandle);
    }
    if page < 1 {
        return Err(RecommendError::InvalidPage { page });
    }
    if count == 0 {
        return Err(RecommendError::InvalidCount { count });
    }
    Ok(handle)
}
