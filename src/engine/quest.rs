/// Quest progression for fixed category quests and player-authored personal quests.
///
/// Fixed quests accrue progress from daily task completions (and some shop items) and
/// pay their reward once when completed at full progress. Personal quests are created
/// by the player, completed by id, and may be deleted while still pending.
use chrono::NaiveDate;
use log::{debug, info};
use serde::Serialize;

use crate::engine::achievement::evaluate_achievements;
use crate::engine::errors::EngineError;
use crate::engine::reward::{apply_reward, RewardOutcome};
use crate::engine::types::{
    FixedQuest, GameDocument, PersonalQuest, QuestCategory, Reward, TaskCategory,
};
use crate::logutil::escape_log;
use crate::validation::{sanitize_description, validate_quest_name};

pub const PERSONAL_QUEST_XP: u64 = 100;
pub const PERSONAL_QUEST_COINS: u64 = 50;

/// Result of completing a fixed or personal quest.
#[derive(Debug, Clone, Serialize)]
pub struct QuestCompletion {
    pub quest: String,
    pub reward: RewardOutcome,
    /// Every achievement unlocked by this completion, including level-up side effects.
    pub unlocked: Vec<String>,
}

/// Recompute the pending personal quest counter from the list.
pub fn refresh_pending(doc: &mut GameDocument) {
    doc.quests.personal_pending = doc
        .personal_quest_list
        .iter()
        .filter(|q| !q.completed)
        .count() as u32;
}

/// Feed the quest linked to a completed task. Returns the quest and its new progress.
pub fn record_task_progress(
    doc: &mut GameDocument,
    task: TaskCategory,
) -> Option<(QuestCategory, u32)> {
    let (category, amount) = task.quest_link();
    add_quest_progress(doc, category, amount).map(|progress| (category, progress))
}

/// Add progress to a fixed quest, capped at its max. Returns the new progress.
pub fn add_quest_progress(
    doc: &mut GameDocument,
    category: QuestCategory,
    amount: u32,
) -> Option<u32> {
    let quest = doc.quests.fixed.get_mut(&category)?;
    quest.add_progress(amount);
    debug!(
        "Quest {} progress {}/{}",
        category.as_str(),
        quest.progress,
        quest.max
    );
    Some(quest.progress)
}

/// Resolve a quest by category key (`strength_training`) or display name (`Strength Training`).
pub fn find_fixed_quest(doc: &GameDocument, quest_name: &str) -> Option<QuestCategory> {
    let wanted = quest_name.trim();
    if let Some(category) = QuestCategory::parse(wanted) {
        if doc.quests.fixed.contains_key(&category) {
            return Some(category);
        }
    }
    doc.quests
        .fixed
        .iter()
        .find(|(_, quest)| quest.name.eq_ignore_ascii_case(wanted))
        .map(|(category, _)| *category)
}

/// Complete a fixed quest at full progress and pay its reward once.
pub fn complete_quest(
    doc: &mut GameDocument,
    quest_name: &str,
) -> Result<QuestCompletion, EngineError> {
    let category = find_fixed_quest(doc, quest_name)
        .ok_or_else(|| EngineError::validation(format!("Unknown quest: {}", quest_name.trim())))?;
    let quest: &mut FixedQuest = doc
        .quests
        .fixed
        .get_mut(&category)
        .ok_or_else(|| EngineError::validation("Unknown quest"))?;

    if quest.completed {
        return Err(EngineError::conflict("Quest already completed"));
    }
    if !quest.is_ready() {
        return Err(EngineError::conflict(format!(
            "Quest not ready ({}/{})",
            quest.progress, quest.max
        )));
    }

    quest.completed = true;
    let name = quest.name.clone();
    let reward = Reward {
        xp: quest.reward_xp,
        coins: quest.reward_coins,
    };
    info!("Quest completed: {} (+{} xp, +{} coins)", name, reward.xp, reward.coins);

    let outcome = apply_reward(doc, reward);
    let mut unlocked = outcome.unlocked.clone();
    unlocked.extend(evaluate_achievements(doc));
    Ok(QuestCompletion {
        quest: name,
        reward: outcome,
        unlocked,
    })
}

/// Create a personal quest. A rejected create does not consume an id.
pub fn add_personal_quest(
    doc: &mut GameDocument,
    name: &str,
    description: Option<&str>,
    today: NaiveDate,
) -> Result<PersonalQuest, EngineError> {
    let name = validate_quest_name(name).map_err(|e| EngineError::validation(e.to_string()))?;
    let description = sanitize_description(description.unwrap_or_default())
        .map_err(|e| EngineError::validation(e.to_string()))?;

    let id = doc.next_personal_quest_id;
    let next_id = id
        .checked_add(1)
        .ok_or_else(|| EngineError::conflict("Personal quest ids exhausted"))?;

    let quest = PersonalQuest {
        id,
        name,
        description,
        completed: false,
        created_on: today,
        completed_on: None,
        reward_xp: PERSONAL_QUEST_XP,
        reward_coins: PERSONAL_QUEST_COINS,
    };
    doc.personal_quest_list.push(quest.clone());
    doc.next_personal_quest_id = next_id;
    refresh_pending(doc);

    info!("Personal quest #{} created: {}", id, escape_log(&quest.name));
    Ok(quest)
}

/// Position of a personal quest, distinguishing ids that were deleted from ids never issued.
fn locate_personal_quest(doc: &GameDocument, id: u32) -> Result<usize, EngineError> {
    if let Some(pos) = doc.personal_quest_list.iter().position(|q| q.id == id) {
        return Ok(pos);
    }
    if id > 0 && id < doc.next_personal_quest_id {
        Err(EngineError::conflict(format!(
            "Personal quest {} was already deleted",
            id
        )))
    } else {
        Err(EngineError::validation(format!(
            "Personal quest {} not found",
            id
        )))
    }
}

pub fn complete_personal_quest(
    doc: &mut GameDocument,
    id: u32,
    today: NaiveDate,
) -> Result<QuestCompletion, EngineError> {
    let pos = locate_personal_quest(doc, id)?;
    let quest = &mut doc.personal_quest_list[pos];
    if quest.completed {
        return Err(EngineError::conflict("Quest already completed"));
    }

    quest.completed = true;
    quest.completed_on = Some(today);
    let name = quest.name.clone();
    let reward = Reward {
        xp: quest.reward_xp,
        coins: quest.reward_coins,
    };
    refresh_pending(doc);
    info!("Personal quest #{} completed: {}", id, escape_log(&name));

    let outcome = apply_reward(doc, reward);
    let mut unlocked = outcome.unlocked.clone();
    unlocked.extend(evaluate_achievements(doc));
    Ok(QuestCompletion {
        quest: name,
        reward: outcome,
        unlocked,
    })
}

/// Delete a pending personal quest. Completed quests stay on record.
pub fn delete_personal_quest(doc: &mut GameDocument, id: u32) -> Result<PersonalQuest, EngineError> {
    let pos = locate_personal_quest(doc, id)?;
    if doc.personal_quest_list[pos].completed {
        return Err(EngineError::conflict(
            "Completed quests cannot be deleted",
        ));
    }
    let removed = doc.personal_quest_list.remove(pos);
    refresh_pending(doc);
    info!("Personal quest #{} deleted: {}", id, escape_log(&removed.name));
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::new_document;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn doc() -> GameDocument {
        new_document("Tester", today())
    }

    #[test]
    fn task_progress_feeds_linked_quest() {
        let mut doc = doc();
        assert_eq!(
            record_task_progress(&mut doc, TaskCategory::Pushups),
            Some((QuestCategory::StrengthTraining, 10))
        );
        assert_eq!(
            record_task_progress(&mut doc, TaskCategory::Situps),
            Some((QuestCategory::StrengthTraining, 20))
        );
        assert_eq!(
            record_task_progress(&mut doc, TaskCategory::Meditation),
            Some((QuestCategory::SpiritualTraining, 15))
        );
        assert_eq!(
            record_task_progress(&mut doc, TaskCategory::OutdoorRun),
            Some((QuestCategory::Discipline, 20))
        );
    }

    #[test]
    fn progress_caps_at_max() {
        let mut doc = doc();
        for _ in 0..8 {
            record_task_progress(&mut doc, TaskCategory::OutdoorRun);
        }
        assert_eq!(doc.quests.fixed[&QuestCategory::Discipline].progress, 100);
    }

    #[test]
    fn fixed_quest_completes_exactly_once() {
        let mut doc = doc();
        let err = complete_quest(&mut doc, "discipline").unwrap_err();
        assert!(matches!(err, EngineError::StateConflict(_)));
        assert_eq!(doc.player.total_experience, 0);

        add_quest_progress(&mut doc, QuestCategory::Discipline, 100);
        let done = complete_quest(&mut doc, "Discipline").unwrap();
        assert_eq!(done.quest, "Discipline");
        assert_eq!(doc.player.total_experience, 200);
        // 120 quest coins + 50 for reaching level 2
        assert_eq!(doc.player.coins, 170);

        let err = complete_quest(&mut doc, "discipline").unwrap_err();
        assert_eq!(err.to_string(), "Quest already completed");
        assert_eq!(doc.player.total_experience, 200);
    }

    #[test]
    fn unknown_quest_is_validation_error() {
        let mut doc = doc();
        let err = complete_quest(&mut doc, "dragon_slaying").unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn empty_name_does_not_consume_id() {
        let mut doc = doc();
        let err = add_personal_quest(&mut doc, "   ", None, today()).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(doc.next_personal_quest_id, 1);
        assert!(doc.personal_quest_list.is_empty());

        let quest = add_personal_quest(&mut doc, " Read ", Some("two chapters"), today()).unwrap();
        assert_eq!(quest.id, 1);
        assert_eq!(quest.name, "Read");
        assert_eq!(doc.quests.personal_pending, 1);
    }

    #[test]
    fn personal_quest_lifecycle() {
        let mut doc = doc();
        let first = add_personal_quest(&mut doc, "Read", None, today()).unwrap();
        let second = add_personal_quest(&mut doc, "Cook", None, today()).unwrap();
        assert_eq!(second.id, first.id + 1);
        assert_eq!(doc.quests.personal_pending, 2);

        let done = complete_personal_quest(&mut doc, first.id, today()).unwrap();
        assert_eq!(done.reward.xp_gained, PERSONAL_QUEST_XP);
        assert_eq!(doc.quests.personal_pending, 1);
        assert_eq!(doc.personal_quest_list[0].completed_on, Some(today()));

        let err = complete_personal_quest(&mut doc, first.id, today()).unwrap_err();
        assert!(matches!(err, EngineError::StateConflict(_)));
        let err = delete_personal_quest(&mut doc, first.id).unwrap_err();
        assert!(matches!(err, EngineError::StateConflict(_)));

        delete_personal_quest(&mut doc, second.id).unwrap();
        assert_eq!(doc.quests.personal_pending, 0);
        let err = delete_personal_quest(&mut doc, second.id).unwrap_err();
        assert!(err.to_string().contains("already deleted"));
    }

    #[test]
    fn personal_quest_completion_checks_achievements_without_level_up() {
        let mut doc = doc();
        doc.player.total_experience = 100;
        doc.player.tasks_completed = 1;
        crate::engine::state::refresh_derived(&mut doc);
        assert_eq!(doc.player.level, 2);
        assert!(!doc.achievements[0].unlocked);

        let quest = add_personal_quest(&mut doc, "Stretch", None, today()).unwrap();
        let done = complete_personal_quest(&mut doc, quest.id, today()).unwrap();
        assert_eq!(done.reward.level, 2);
        assert_eq!(done.unlocked, vec!["First Steps".to_string()]);
        assert!(doc.achievements[0].unlocked);
    }

    #[test]
    fn never_issued_id_is_not_found() {
        let mut doc = doc();
        let err = complete_personal_quest(&mut doc, 42, today()).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        let err = delete_personal_quest(&mut doc, 0).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut doc = doc();
        let first = add_personal_quest(&mut doc, "Read", None, today()).unwrap();
        delete_personal_quest(&mut doc, first.id).unwrap();
        let next = add_personal_quest(&mut doc, "Write", None, today()).unwrap();
        assert_eq!(next.id, 2);
    }
}
