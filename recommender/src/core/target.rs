//! Target difficulty resolution

use shared::Tier;

/// Weight of the user's own tier in the blend, in tenths
pub const USER_TIER_WEIGHT: u64 = 7;
/// Weight of the aggregate tag tier in the blend, in tenths
pub const TAG_TIER_WEIGHT: u64 = 3;

/// Blend the user's tier with their aggregate tag tier
///
/// Rounds half away from zero; the result always lies in [0, 30].
pub fn resolve_target(user_tier: Tier, aggregate_tag_tier: Tier) -> Tier {
    let tenths = user_tier.value() as u64 * USER_TIER_WEIGHT + aggregate_tag_tier.value() as u64 * TAG_TIER_WEIGHT;
    Tier::from_ratio(tenths, USER_TIER_WEIGHT + TAG_TIER_WEIGHT)
}

/// Target tier for a request, skipping the blend when there is no solved history
pub fn target_for(user_tier: Tier, aggregate_tag_tier: Option<Tier>) -> Tier {
    match aggregate_tag_tier {
        Some(aggregate) => resolve_target(user_tier, aggregate),
        None => user_tier,
    }
}
