/// Achievement unlocking and claiming.
///
/// Unlocking is a stateless re-evaluation of every predicate against the current
/// document and pays nothing. Claiming is a separate player action that pays the
/// coin reward exactly once.
use log::info;

use crate::engine::errors::EngineError;
use crate::engine::types::{AchievementKind, GameDocument};

/// Whether the unlock condition for `kind` currently holds.
pub fn predicate_holds(kind: AchievementKind, doc: &GameDocument) -> bool {
    let player = &doc.player;
    match kind {
        // Lifetime counter, so a daily rollover never makes this look unearned.
        AchievementKind::FirstSteps => player.tasks_completed >= 1,
        AchievementKind::Dedication => player.streak >= 7,
        AchievementKind::LevelUp => player.level >= 5,
        AchievementKind::QuestMaster => doc.quests.completed_count() >= 5,
        AchievementKind::Unstoppable => player.streak >= 30,
    }
}

/// Unlock every achievement whose predicate now holds. Returns the names newly unlocked.
pub fn evaluate_achievements(doc: &mut GameDocument) -> Vec<String> {
    let ready: Vec<usize> = doc
        .achievements
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.unlocked && predicate_holds(a.kind, doc))
        .map(|(idx, _)| idx)
        .collect();

    let mut unlocked = Vec::with_capacity(ready.len());
    for idx in ready {
        let achievement = &mut doc.achievements[idx];
        achievement.unlocked = true;
        info!("Achievement unlocked: {}", achievement.name);
        unlocked.push(achievement.name.clone());
    }
    unlocked
}

/// Claim the reward of the achievement at `index`. Returns the coins paid.
pub fn claim_achievement(doc: &mut GameDocument, index: usize) -> Result<u64, EngineError> {
    let count = doc.achievements.len();
    let achievement = doc.achievements.get_mut(index).ok_or_else(|| {
        EngineError::validation(format!(
            "Invalid achievement index {} (expected 0..{})",
            index, count
        ))
    })?;

    if !achievement.unlocked {
        return Err(EngineError::conflict("Achievement not unlocked yet"));
    }
    if achievement.claimed {
        return Err(EngineError::conflict("Achievement already claimed"));
    }

    achievement.claimed = true;
    let reward = achievement.reward_coins;
    info!("Achievement claimed: {} (+{} coins)", achievement.name, reward);
    doc.player.coins = doc.player.coins.saturating_add(reward);
    Ok(reward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::new_document;
    use crate::engine::types::QuestCategory;
    use chrono::NaiveDate;

    fn doc() -> GameDocument {
        new_document("Tester", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    fn index_of(doc: &GameDocument, kind: AchievementKind) -> usize {
        doc.achievements.iter().position(|a| a.kind == kind).unwrap()
    }

    #[test]
    fn nothing_unlocks_on_fresh_document() {
        let mut doc = doc();
        assert!(evaluate_achievements(&mut doc).is_empty());
        assert!(doc.achievements.iter().all(|a| !a.unlocked && !a.claimed));
    }

    #[test]
    fn first_steps_uses_lifetime_counter() {
        let mut doc = doc();
        doc.player.tasks_completed = 1;
        let unlocked = evaluate_achievements(&mut doc);
        assert_eq!(unlocked, vec!["First Steps".to_string()]);

        // Re-evaluation does not report it again.
        assert!(evaluate_achievements(&mut doc).is_empty());
    }

    #[test]
    fn unlocking_pays_nothing() {
        let mut doc = doc();
        doc.player.streak = 30;
        doc.player.max_streak = 30;
        let unlocked = evaluate_achievements(&mut doc);
        assert!(unlocked.contains(&"Dedication".to_string()));
        assert!(unlocked.contains(&"Unstoppable".to_string()));
        assert_eq!(doc.player.coins, 0);
    }

    #[test]
    fn unlock_is_one_way() {
        let mut doc = doc();
        doc.player.streak = 7;
        evaluate_achievements(&mut doc);
        doc.player.streak = 0;
        evaluate_achievements(&mut doc);
        assert!(doc.achievements[index_of(&doc, AchievementKind::Dedication)].unlocked);
    }

    #[test]
    fn quest_master_counts_completed_fixed_quests() {
        let mut doc = doc();
        for category in QuestCategory::all().into_iter().take(4) {
            doc.quests.fixed.get_mut(&category).unwrap().completed = true;
        }
        evaluate_achievements(&mut doc);
        assert!(!doc.achievements[index_of(&doc, AchievementKind::QuestMaster)].unlocked);

        doc.quests
            .fixed
            .get_mut(&QuestCategory::SecretQuests)
            .unwrap()
            .completed = true;
        evaluate_achievements(&mut doc);
        assert!(doc.achievements[index_of(&doc, AchievementKind::QuestMaster)].unlocked);
    }

    #[test]
    fn claim_before_unlock_fails_without_coins() {
        let mut doc = doc();
        let idx = index_of(&doc, AchievementKind::FirstSteps);
        let err = claim_achievement(&mut doc, idx).unwrap_err();
        assert!(matches!(err, EngineError::StateConflict(_)));
        assert_eq!(doc.player.coins, 0);
        assert!(!doc.achievements[idx].claimed);
    }

    #[test]
    fn double_claim_pays_once() {
        let mut doc = doc();
        doc.player.tasks_completed = 3;
        evaluate_achievements(&mut doc);
        let idx = index_of(&doc, AchievementKind::FirstSteps);

        assert_eq!(claim_achievement(&mut doc, idx).unwrap(), 50);
        let err = claim_achievement(&mut doc, idx).unwrap_err();
        assert_eq!(err.to_string(), "Achievement already claimed");
        assert_eq!(doc.player.coins, 50);
    }

    #[test]
    fn claim_out_of_range_is_validation_error() {
        let mut doc = doc();
        let err = claim_achievement(&mut doc, 99).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
