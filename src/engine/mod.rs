//! Progression and reward engine.
//!
//! Every operation takes the owned [`GameDocument`] explicitly and either mutates it
//! and returns a result, or returns an [`EngineError`] rejection. Callers that need
//! all-or-nothing behaviour apply operations to a copy and commit it on success.

pub mod achievement;
pub mod class;
pub mod daily;
pub mod errors;
pub mod leaderboard;
pub mod leveling;
pub mod quest;
pub mod rank;
pub mod reward;
pub mod shop;
pub mod state;
pub mod stats;
pub mod tasks;
pub mod types;

pub use achievement::{claim_achievement, evaluate_achievements};
pub use daily::{check_daily_reset, daily_view, update_timer, DailyView};
pub use errors::{EngineError, ErrorKind};
pub use leaderboard::{get_leaderboard, LeaderboardEntry};
pub use quest::{
    add_personal_quest, complete_personal_quest, complete_quest, delete_personal_quest,
    QuestCompletion,
};
pub use reward::{apply_reward, award_experience, RewardOutcome};
pub use shop::{buy_item, use_item, ItemUse, Purchase};
pub use state::{new_document, new_document_with_settings, refresh_derived};
pub use stats::{allocate_stat, get_stats, Allocation, StatsSummary};
pub use tasks::{complete_task, TaskCompletion};
pub use types::GameDocument;
