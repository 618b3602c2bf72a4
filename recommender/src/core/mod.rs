//! Recommendation core business logic

pub mod assembler;
pub mod defaults;
pub mod exclusion;
pub mod pipeline;
pub mod tags;
pub mod target;
pub mod tiers;

pub use assembler::{assemble, AssembledSlate};
pub use defaults::default_problems;
pub use exclusion::{ExclusionSet, ExclusionStats};
pub use pipeline::{PipelineConfig, PipelineOutput, PipelineRequest, RecommendationPipeline};
pub use tags::{rank_top_tags, select_tag, TOP_TAG_LIMIT};
pub use target::{resolve_target, target_for};
pub use tiers::{AggregateMode, TagTierMap, TierCalculator, TierSummary};
