//! Reward application: the single path every XP grant goes through.
use log::info;
use serde::Serialize;

use crate::engine::achievement::evaluate_achievements;
use crate::engine::class::refresh_class_and_title;
use crate::engine::leveling::level_for_experience;
use crate::engine::rank::refresh_rank;
use crate::engine::types::{GameDocument, Reward};

pub const STAT_POINTS_PER_LEVEL: u32 = 2;
pub const COINS_PER_LEVEL: u64 = 50;

/// What a single reward payout changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewardOutcome {
    pub xp_gained: u64,
    pub coins_gained: u64,
    pub levels_gained: u32,
    pub level: u32,
    /// Names of achievements unlocked as a side effect of a level-up.
    pub unlocked: Vec<String>,
}

/// Add experience and apply level-up side effects.
///
/// For Δ levels gained the player receives `2·Δ` stat points and `50·Δ` coins, then the
/// class/title/rank pass and the achievement evaluator run. Without a level-up only the
/// rank is refreshed (the score includes total experience).
pub fn award_experience(doc: &mut GameDocument, amount: u64) -> RewardOutcome {
    let player = &mut doc.player;
    let previous_level = player.level;

    player.total_experience = player.total_experience.saturating_add(amount);
    let progress = level_for_experience(player.total_experience);
    player.level = progress.level;
    player.current_xp = progress.current_xp;
    player.xp_to_next_level = progress.xp_to_next;

    let levels_gained = progress.level.saturating_sub(previous_level);
    let mut outcome = RewardOutcome {
        xp_gained: amount,
        levels_gained,
        level: progress.level,
        ..RewardOutcome::default()
    };

    if levels_gained == 0 {
        refresh_rank(player);
        return outcome;
    }

    let bonus_coins = COINS_PER_LEVEL * levels_gained as u64;
    player.available_points = player
        .available_points
        .saturating_add(STAT_POINTS_PER_LEVEL * levels_gained);
    player.coins = player.coins.saturating_add(bonus_coins);
    outcome.coins_gained = bonus_coins;
    info!(
        "Level up: {} -> {} (+{} points, +{} coins)",
        previous_level,
        progress.level,
        STAT_POINTS_PER_LEVEL * levels_gained,
        bonus_coins
    );

    refresh_class_and_title(player);
    outcome.unlocked = evaluate_achievements(doc);
    outcome
}

/// Pay out coins and experience together.
pub fn apply_reward(doc: &mut GameDocument, reward: Reward) -> RewardOutcome {
    doc.player.coins = doc.player.coins.saturating_add(reward.coins);
    let mut outcome = award_experience(doc, reward.xp);
    outcome.coins_gained += reward.coins;
    outcome
}
