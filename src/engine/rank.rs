//! Rank score and tier resolution.
use crate::engine::types::{Player, RankTier};

/// Tier thresholds, lowest first.
const THRESHOLDS: [(u64, RankTier); 5] = [
    (200, RankTier::D),
    (400, RankTier::C),
    (600, RankTier::B),
    (800, RankTier::A),
    (1000, RankTier::S),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankStanding {
    pub score: u64,
    pub tier: RankTier,
    pub points_to_next: Option<u64>,
}

/// `level·10 + stat_total·2 + max_streak·5 + floor(total_experience/100)`
pub fn rank_score(level: u32, stat_total: u64, max_streak: u32, total_experience: u64) -> u64 {
    level as u64 * 10 + stat_total * 2 + max_streak as u64 * 5 + total_experience / 100
}

pub fn tier_for_score(score: u64) -> RankTier {
    THRESHOLDS
        .iter()
        .rev()
        .find(|(threshold, _)| score >= *threshold)
        .map(|(_, tier)| *tier)
        .unwrap_or(RankTier::E)
}

pub fn points_to_next(score: u64) -> Option<u64> {
    THRESHOLDS
        .iter()
        .find(|(threshold, _)| score < *threshold)
        .map(|(threshold, _)| threshold - score)
}

pub fn standing(player: &Player) -> RankStanding {
    let score = rank_score(
        player.level,
        player.stats.total(),
        player.max_streak,
        player.total_experience,
    );
    RankStanding {
        score,
        tier: tier_for_score(score),
        points_to_next: points_to_next(score),
    }
}

/// Recompute every rank field on the player from scratch.
pub fn refresh_rank(player: &mut Player) {
    let standing = standing(player);
    player.rank_score = standing.score;
    player.rank = standing.tier;
    player.rank_name = standing.tier.title().to_string();
    player.points_to_next_rank = standing.points_to_next;
}
