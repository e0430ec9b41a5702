//! Leaderboard built from a fixed roster of hunters plus the live player.
use serde::Serialize;

use crate::engine::leveling::level_for_experience;
use crate::engine::rank::tier_for_score;
use crate::engine::types::{GameDocument, RankTier};

pub const LEADERBOARD_SIZE: usize = 10;

/// (name, total experience, rank score)
const ROSTER: [(&str, u64, u64); 12] = [
    ("SUNG JINWOO", 48_500, 1_240),
    ("CHA HAE-IN", 31_200, 905),
    ("GO GUNHEE", 27_800, 860),
    ("THOMAS ANDRE", 24_100, 812),
    ("CHOI JONG-IN", 15_600, 640),
    ("BAEK YOONHO", 12_300, 588),
    ("MIN BYUNG-GU", 7_450, 432),
    ("WOO JINCHUL", 4_900, 371),
    ("YOO JINHO", 1_850, 214),
    ("LEE JOOHEE", 1_200, 188),
    ("KIM CHUL", 640, 150),
    ("PARK HEEJIN", 310, 131),
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LeaderboardEntry {
    /// 1-based.
    pub position: usize,
    pub name: String,
    pub level: u32,
    pub rank: RankTier,
    pub total_experience: u64,
    pub is_player: bool,
}

/// Top entries by total experience, highest first. Ties keep roster order, player last.
pub fn get_leaderboard(doc: &GameDocument) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = ROSTER
        .iter()
        .map(|(name, total_experience, score)| LeaderboardEntry {
            position: 0,
            name: name.to_string(),
            level: level_for_experience(*total_experience).level,
            rank: tier_for_score(*score),
            total_experience: *total_experience,
            is_player: false,
        })
        .collect();

    let player = &doc.player;
    entries.push(LeaderboardEntry {
        position: 0,
        name: player.name.clone(),
        level: player.level,
        rank: player.rank,
        total_experience: player.total_experience,
        is_player: true,
    });

    entries.sort_by(|a, b| b.total_experience.cmp(&a.total_experience));
    entries.truncate(LEADERBOARD_SIZE);
    for (idx, entry) in entries.iter_mut().enumerate() {
        entry.position = idx + 1;
    }
    entries
}
