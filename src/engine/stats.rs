//! Stat point allocation, derived damage reduction, and the lifetime stats view.
use log::info;
use serde::Serialize;

use crate::engine::class::refresh_class_and_title;
use crate::engine::errors::EngineError;
use crate::engine::types::{GameDocument, Player, RankTier, StatKind, Stats};

/// physical = vitality / 2, magical = intelligence · 2 / 5
pub fn refresh_damage_reduction(player: &mut Player) {
    player.physical_damage_reduction = player.stats.vitality / 2;
    player.magical_damage_reduction = player.stats.intelligence.saturating_mul(2) / 5;
}

#[derive(Debug, Clone, Serialize)]
pub struct Allocation {
    pub stat: StatKind,
    pub value: u32,
    pub available_points: u32,
}

/// Spend one unspent point on `stat_name`, then refresh everything derived from stats.
pub fn allocate_stat(doc: &mut GameDocument, stat_name: &str) -> Result<Allocation, EngineError> {
    let stat = StatKind::parse(stat_name)
        .ok_or_else(|| EngineError::validation(format!("Unknown stat: {}", stat_name.trim())))?;
    let player = &mut doc.player;
    if player.available_points == 0 {
        return Err(EngineError::insufficient("No stat points available"));
    }

    player.available_points -= 1;
    player.stats.increment(stat);
    refresh_damage_reduction(player);
    refresh_class_and_title(player);
    info!(
        "Allocated 1 point to {} (now {}, {} left)",
        stat.abbrev(),
        player.stats.get(stat),
        player.available_points
    );

    Ok(Allocation {
        stat,
        value: player.stats.get(stat),
        available_points: player.available_points,
    })
}

/// Aggregated lifetime counters.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsSummary {
    pub level: u32,
    pub total_experience: u64,
    pub rank: RankTier,
    pub rank_score: u64,
    pub stats: Stats,
    pub stat_total: u64,
    pub tasks_completed: u64,
    pub tasks_completed_today: usize,
    pub fixed_quests_completed: usize,
    pub personal_quests_completed: usize,
    pub personal_quests_pending: u32,
    pub achievements_unlocked: usize,
    pub achievements_claimed: usize,
    pub streak: u32,
    pub max_streak: u32,
    pub coins: u64,
}

pub fn get_stats(doc: &GameDocument) -> StatsSummary {
    let player = &doc.player;
    StatsSummary {
        level: player.level,
        total_experience: player.total_experience,
        rank: player.rank,
        rank_score: player.rank_score,
        stats: player.stats,
        stat_total: player.stats.total(),
        tasks_completed: player.tasks_completed,
        tasks_completed_today: doc.daily_tasks.iter().filter(|t| t.completed).count(),
        fixed_quests_completed: doc.quests.completed_count(),
        personal_quests_completed: doc
            .personal_quest_list
            .iter()
            .filter(|q| q.completed)
            .count(),
        personal_quests_pending: doc.quests.personal_pending,
        achievements_unlocked: doc.achievements.iter().filter(|a| a.unlocked).count(),
        achievements_claimed: doc.achievements.iter().filter(|a| a.claimed).count(),
        streak: player.streak,
        max_streak: player.max_streak,
        coins: player.coins,
    }
}
