//! Class and title resolution. Runs as one pass together with the rank refresh.
use crate::engine::rank::refresh_rank;
use crate::engine::types::{Player, StatKind, Stats};

pub const TIER_TWO_LEVEL: u32 = 10;
pub const TIER_THREE_LEVEL: u32 = 20;

/// Highest stat; ties go to the first stat in canonical order.
pub fn dominant_stat(stats: &Stats) -> StatKind {
    let mut best = StatKind::Strength;
    for kind in StatKind::all() {
        if stats.get(kind) > stats.get(best) {
            best = kind;
        }
    }
    best
}

fn tier_two_class(stat: StatKind) -> &'static str {
    match stat {
        StatKind::Strength => "FIGHTER",
        StatKind::Agility => "ASSASSIN",
        StatKind::Vitality => "TANKER",
        StatKind::Intelligence => "MAGE",
        StatKind::Perception => "RANGER",
    }
}

fn tier_three_class(stat: StatKind) -> &'static str {
    match stat {
        StatKind::Strength => "BERSERKER",
        StatKind::Agility => "SHADOW ASSASSIN",
        StatKind::Vitality => "GUARDIAN",
        StatKind::Intelligence => "ARCHMAGE",
        StatKind::Perception => "SNIPER",
    }
}

/// Class for the given level and stats, or `None` when the level is below the first tier
/// (the current class is then kept; there is no downgrade path).
pub fn class_for(level: u32, stats: &Stats) -> Option<&'static str> {
    let stat = dominant_stat(stats);
    if level >= TIER_THREE_LEVEL {
        Some(tier_three_class(stat))
    } else if level >= TIER_TWO_LEVEL {
        Some(tier_two_class(stat))
    } else {
        None
    }
}

/// First matching title rule, or `None` to keep the current one.
pub fn title_for(level: u32, max_streak: u32) -> Option<&'static str> {
    if max_streak >= 30 {
        Some("UNSTOPPABLE")
    } else if max_streak >= 14 {
        Some("DEDICATED")
    } else if level >= 15 {
        Some("VETERAN")
    } else if level >= 5 {
        Some("RISING STAR")
    } else {
        None
    }
}

/// Update class and title, then the rank fields.
pub fn refresh_class_and_title(player: &mut Player) {
    if let Some(class) = class_for(player.level, &player.stats) {
        player.class = class.to_string();
    }
    if let Some(title) = title_for(player.level, player.max_streak) {
        player.title = title.to_string();
    }
    refresh_rank(player);
}
