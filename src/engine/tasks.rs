//! Daily task completion.
use log::info;
use serde::Serialize;

use crate::engine::achievement::evaluate_achievements;
use crate::engine::class::refresh_class_and_title;
use crate::engine::daily::all_tasks_completed;
use crate::engine::errors::EngineError;
use crate::engine::quest::record_task_progress;
use crate::engine::reward::{apply_reward, RewardOutcome};
use crate::engine::types::{GameDocument, QuestCategory, Reward};

#[derive(Debug, Clone, Serialize)]
pub struct TaskCompletion {
    pub task: String,
    /// False when the task was already completed this cycle and nothing changed.
    pub applied: bool,
    pub reward: Option<RewardOutcome>,
    pub quest: Option<QuestCategory>,
    pub quest_progress: Option<u32>,
    pub streak: u32,
    pub unlocked: Vec<String>,
}

/// Mark the task at `index` complete, pay its reward, and feed its linked quest.
///
/// Completing an already-completed task is a successful no-op. The completion that
/// finishes the last open task of the cycle extends the streak.
pub fn complete_task(doc: &mut GameDocument, index: usize) -> Result<TaskCompletion, EngineError> {
    let count = doc.daily_tasks.len();
    let task = doc.daily_tasks.get_mut(index).ok_or_else(|| {
        EngineError::validation(format!(
            "Invalid task index {} (expected 0..{})",
            index, count
        ))
    })?;

    if task.completed {
        return Ok(TaskCompletion {
            task: task.name.clone(),
            applied: false,
            reward: None,
            quest: None,
            quest_progress: None,
            streak: doc.player.streak,
            unlocked: Vec::new(),
        });
    }

    task.mark_complete();
    let name = task.name.clone();
    let category = task.category;
    let reward = Reward {
        xp: task.xp_reward,
        coins: task.coin_reward,
    };
    doc.player.tasks_completed = doc.player.tasks_completed.saturating_add(1);
    info!("Task completed: {}", name);

    let outcome = apply_reward(doc, reward);
    let mut unlocked = outcome.unlocked.clone();
    let linked = record_task_progress(doc, category);

    if all_tasks_completed(doc) {
        let player = &mut doc.player;
        player.streak = player.streak.saturating_add(1);
        player.max_streak = player.max_streak.max(player.streak);
        info!("All daily tasks done, streak now {}", player.streak);
        refresh_class_and_title(player);
    }
    unlocked.extend(evaluate_achievements(doc));

    Ok(TaskCompletion {
        task: name,
        applied: true,
        reward: Some(outcome),
        quest: linked.map(|(quest, _)| quest),
        quest_progress: linked.map(|(_, progress)| progress),
        streak: doc.player.streak,
        unlocked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::new_document;
    use chrono::NaiveDate;

    fn doc() -> GameDocument {
        new_document("Tester", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    #[test]
    fn completing_a_task_pays_and_feeds_quest() {
        let mut doc = doc();
        let done = complete_task(&mut doc, 0).unwrap();
        assert!(done.applied);
        assert_eq!(done.task, "12 PUSHUPS");
        assert_eq!(done.quest, Some(QuestCategory::StrengthTraining));
        assert_eq!(done.quest_progress, Some(10));
        assert_eq!(done.unlocked, vec!["First Steps".to_string()]);
        assert_eq!(doc.player.total_experience, 25);
        assert_eq!(doc.player.coins, 10);
        assert_eq!(doc.daily_tasks[0].progress, 12);
        assert_eq!(doc.player.tasks_completed, 1);
    }

    #[test]
    fn second_completion_is_a_no_op() {
        let mut doc = doc();
        complete_task(&mut doc, 1).unwrap();
        let after_first = doc.clone();
        let again = complete_task(&mut doc, 1).unwrap();
        assert!(!again.applied);
        assert_eq!(doc, after_first);
    }

    #[test]
    fn bad_index_is_rejected() {
        let mut doc = doc();
        let before = doc.clone();
        let err = complete_task(&mut doc, 4).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(doc, before);
    }

    #[test]
    fn finishing_all_tasks_extends_streak_once() {
        let mut doc = doc();
        for idx in 0..3 {
            assert_eq!(complete_task(&mut doc, idx).unwrap().streak, 0);
        }
        let last = complete_task(&mut doc, 3).unwrap();
        assert_eq!(last.streak, 1);
        assert_eq!(doc.player.max_streak, 1);

        complete_task(&mut doc, 3).unwrap();
        assert_eq!(doc.player.streak, 1);
        // 25 + 25 + 40 + 30
        assert_eq!(doc.player.total_experience, 120);
        assert_eq!(doc.player.level, 2);
    }
}
