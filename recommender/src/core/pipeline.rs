//! Fallback state machine that fills a recommendation slate
//!
//! Stages run strictly in order because each one filters against the ids
//! chosen by the stages before it:
//!
//! 1. tag-based search around the target (at most `tag_cap` problems)
//! 2. popularity search on the request page
//! 3. widened popularity search over the following pages
//! 4. randomized search, once, when stage 3 hits a failed or empty page or
//!    finishes short
//! 5. the built-in default list
//!
//! A failing catalog call counts as zero results and moves on to the next
//! stage. The failure is kept in the stage reports.

use std::future::Future;
use std::time::Duration;

use shared::{request_debug, request_warn, CatalogFailure, CatalogResult, Problem, RequestId, Tier, TierRange};
use tokio::time::Instant;

use crate::core::defaults::default_problems;
use crate::core::exclusion::{ExclusionSet, ExclusionStats};
use crate::core::tags::select_tag;
use crate::traits::ProblemCatalog;
use crate::types::{RecommendedProblem, StageOutcome, StageReport, Strategy};

/// Tunables for the pipeline stages
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum problems the tag-based stage may contribute
    pub tag_cap: usize,
    pub tag_spread: u8,
    pub popularity_spread: u8,
    pub widened_spread: u8,
    /// Extra pages walked by the widened popularity stage
    pub widened_pages: u32,
    pub random_spread: u8,
    /// Wall-clock allowance for all network-backed stages
    pub budget: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tag_cap: 2,
            tag_spread: 2,
            popularity_spread: 3,
            widened_spread: 6,
            widened_pages: 5,
            random_spread: 8,
            budget: Some(Duration::from_secs(20)),
        }
    }
}

/// Inputs of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineRequest<'a> {
    pub request_id: RequestId,
    pub target: Tier,
    /// Most-solved tags, best first; empty when the user has no history
    pub top_tags: &'a [String],
    /// 1-based page, also used to vary results between requests
    pub page: u32,
    pub count: usize,
}

/// Stage outputs in arrival order, before the final sort
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub arrivals: Vec<RecommendedProblem>,
    pub stages: Vec<StageReport>,
    pub exclusion: ExclusionStats,
}

enum Call<T> {
    Done(CatalogResult<T>),
    OverBudget,
}

/// Mutable state of one run; dropped when the run finishes
struct PipelineRun {
    request_id: RequestId,
    count: usize,
    exclusion: ExclusionSet,
    arrivals: Vec<RecommendedProblem>,
    stages: Vec<StageReport>,
    deadline: Option<Instant>,
    random_attempted: bool,
}

impl PipelineRun {
    fn remaining(&self) -> usize {
        self.count.saturating_sub(self.arrivals.len())
    }

    fn skip(&mut self, strategy: Strategy, page: Option<u32>, reason: &str) {
        request_debug!(self.request_id, strategy = %strategy, "Skipping stage: {}", reason);
        self.stages.push(StageReport {
            strategy,
            page,
            outcome: StageOutcome::skipped(reason),
        });
    }

    /// Record a catalog result, moving accepted problems into the slate
    fn accept(
        &mut self,
        strategy: Strategy,
        page: Option<u32>,
        result: CatalogResult<Vec<Problem>>,
        limit: usize,
    ) -> StageOutcome {
        let outcome = match result {
            Ok(problems) if problems.is_empty() => StageOutcome::Exhausted,
            Ok(problems) => {
                let returned = problems.len();
                let accepted = self.exclusion.take_new(problems, limit);
                let accepted_count = accepted.len();
                self.arrivals
                    .extend(accepted.into_iter().map(|problem| RecommendedProblem { problem, source: strategy }));
                StageOutcome::Candidates {
                    returned,
                    accepted: accepted_count,
                }
            }
            Err(failure) => {
                request_warn!(
                    self.request_id,
                    strategy = %strategy,
                    page = ?page,
                    "Catalog call failed, treating as empty: {}",
                    failure
                );
                StageOutcome::Unavailable { failure }
            }
        };

        request_debug!(
            self.request_id,
            strategy = %strategy,
            page = ?page,
            "Stage outcome {:?}, {} still needed",
            outcome,
            self.remaining()
        );
        self.stages.push(StageReport {
            strategy,
            page,
            outcome: outcome.clone(),
        });
        outcome
    }
}

/// Runs the staged search against a catalog
pub struct RecommendationPipeline<'c, C: ProblemCatalog + ?Sized> {
    catalog: &'c C,
    config: PipelineConfig,
}

impl<'c, C: ProblemCatalog + ?Sized> RecommendationPipeline<'c, C> {
    pub fn new(catalog: &'c C, config: PipelineConfig) -> Self {
        Self { catalog, config }
    }

    /// Fill up to `request.count` problems, never repeating an excluded id
    pub async fn run(&self, request: &PipelineRequest<'_>, exclusion: ExclusionSet) -> PipelineOutput {
        request_debug!(
            request.request_id,
            target = %request.target.name(),
            "Running pipeline excluding {} solved problems",
            exclusion.solved_count()
        );
        let mut run = PipelineRun {
            request_id: request.request_id,
            count: request.count,
            exclusion,
            arrivals: Vec::with_capacity(request.count),
            stages: Vec::new(),
            deadline: self.config.budget.map(|budget| Instant::now() + budget),
            random_attempted: false,
        };

        self.tag_stage(request, &mut run).await;
        self.popularity_stage(request, &mut run).await;
        self.widened_stage(request, &mut run).await;
        if run.remaining() > 0 && !run.random_attempted {
            self.random_stage(request, &mut run).await;
        }
        self.default_stage(&mut run);

        PipelineOutput {
            exclusion: run.exclusion.stats(),
            arrivals: run.arrivals,
            stages: run.stages,
        }
    }

    /// Issue a catalog call unless the time budget is already spent
    async fn call<T, F, Fut>(&self, run: &PipelineRun, make_call: F) -> Call<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CatalogResult<T>>,
    {
        match run.deadline {
            None => Call::Done(make_call().await),
            Some(deadline) if Instant::now() >= deadline => Call::OverBudget,
            Some(deadline) => match tokio::time::timeout_at(deadline, make_call()).await {
                Ok(result) => Call::Done(result),
                Err(_) => Call::Done(Err(CatalogFailure::Timeout)),
            },
        }
    }

    async fn tag_stage(&self, request: &PipelineRequest<'_>, run: &mut PipelineRun) {
        let strategy = Strategy::TagBased;
        let page = Some(request.page);
        let limit = self.config.tag_cap.min(run.remaining());
        if limit == 0 {
            return run.skip(strategy, page, "no slots available");
        }

        let Some(tag_name) = select_tag(request.top_tags, request.page) else {
            return run.skip(strategy, page, "no solved tags");
        };
        request_debug!(run.request_id, tag = %tag_name, "Selected tag for page {}", request.page);

        let tag = match self.call(run, || self.catalog.resolve_tag(tag_name)).await {
            Call::OverBudget => return run.skip(strategy, page, "time budget exhausted"),
            Call::Done(Ok(tag)) => tag,
            Call::Done(Err(failure)) => {
                run.accept(strategy, page, Err(failure), 0);
                return;
            }
        };

        let range = TierRange::around(request.target, self.config.tag_spread);
        match self.call(run, || self.catalog.search_by_tag(&tag, range, request.page)).await {
            Call::OverBudget => run.skip(strategy, page, "time budget exhausted"),
            Call::Done(result) => {
                run.accept(strategy, page, result, limit);
            }
        }
    }

    async fn popularity_stage(&self, request: &PipelineRequest<'_>, run: &mut PipelineRun) {
        let strategy = Strategy::Popularity;
        let page = Some(request.page);
        let limit = run.remaining();
        if limit == 0 {
            return run.skip(strategy, page, "slate already full");
        }

        let range = TierRange::around(request.target, self.config.popularity_spread);
        match self.call(run, || self.catalog.search_by_popularity(range, request.page)).await {
            Call::OverBudget => run.skip(strategy, page, "time budget exhausted"),
            Call::Done(result) => {
                run.accept(strategy, page, result, limit);
            }
        }
    }

    async fn widened_stage(&self, request: &PipelineRequest<'_>, run: &mut PipelineRun) {
        let strategy = Strategy::WidenedPopularity;
        if run.remaining() == 0 {
            return run.skip(strategy, None, "slate already full");
        }

        let range = TierRange::around(request.target, self.config.widened_spread);
        for offset in 1..=self.config.widened_pages {
            let limit = run.remaining();
            if limit == 0 {
                break;
            }

            let page = request.page.saturating_add(offset);
            let result = match self.call(run, || self.catalog.search_by_popularity(range, page)).await {
                Call::OverBudget => return run.skip(strategy, Some(page), "time budget exhausted"),
                Call::Done(result) => result,
            };

            match run.accept(strategy, Some(page), result, limit) {
                StageOutcome::Candidates { accepted: 0, .. } => break,
                StageOutcome::Candidates { .. } => continue,
                StageOutcome::Exhausted | StageOutcome::Unavailable { .. } => {
                    self.random_stage(request, run).await;
                    break;
                }
                StageOutcome::Skipped { .. } => break,
            }
        }
    }

    async fn random_stage(&self, request: &PipelineRequest<'_>, run: &mut PipelineRun) {
        let strategy = Strategy::Randomized;
        run.random_attempted = true;
        let limit = run.remaining();
        if limit == 0 {
            return run.skip(strategy, None, "slate already full");
        }

        let range = TierRange::around(request.target, self.config.random_spread);
        match self.call(run, || self.catalog.search_random(range)).await {
            Call::OverBudget => run.skip(strategy, None, "time budget exhausted"),
            Call::Done(result) => {
                run.accept(strategy, None, result, limit);
            }
        }
    }

    fn default_stage(&self, run: &mut PipelineRun) {
        let limit = run.remaining();
        if limit == 0 {
            return;
        }
        request_debug!(run.request_id, "Padding {} slot(s) from the default list", limit);
        run.accept(Strategy::FixedDefault, None, Ok(default_problems()), limit);
    }
}
