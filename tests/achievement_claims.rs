/// Integration tests for achievement unlocking and claiming through the session host.
mod common;

use ascend::engine::achievement::claim_achievement;
use ascend::engine::errors::EngineError;
use ascend::engine::quest::complete_quest;
use ascend::engine::tasks::complete_task;
use ascend::engine::types::{AchievementKind, QuestCategory};
use common::{day, fresh_session, open_session};

#[tokio::test]
async fn claim_before_unlock_is_refused() {
    let (_dir, mut session) = fresh_session(day(1)).await;
    let err = session
        .mutate("claim_achievement", |doc, _| claim_achievement(doc, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::StateConflict(_)));
    assert_eq!(session.document().player.coins, 0);
}

#[tokio::test]
async fn first_task_unlocks_and_claim_pays_once() {
    let (dir, mut session) = fresh_session(day(1)).await;
    session
        .mutate("complete_task", |doc, _| complete_task(doc, 3))
        .await
        .unwrap();
    let coins_after_task = session.document().player.coins;
    assert!(session.document().achievements[0].unlocked);

    let paid = session
        .mutate("claim_achievement", |doc, _| claim_achievement(doc, 0))
        .await
        .unwrap();
    assert_eq!(paid, 50);
    let err = session
        .mutate("claim_achievement", |doc, _| claim_achievement(doc, 0))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Achievement already claimed");
    drop(session);

    let reopened = open_session(&dir, day(1)).await;
    assert_eq!(reopened.document().player.coins, coins_after_task + 50);
    assert!(reopened.document().achievements[0].claimed);
}

#[tokio::test]
async fn completing_five_quests_unlocks_quest_master() {
    let (_dir, mut session) = fresh_session(day(1)).await;
    session
        .mutate("seed", |doc, _| {
            for quest in doc.quests.fixed.values_mut() {
                quest.progress = quest.max;
            }
            Ok(())
        })
        .await
        .unwrap();

    for category in QuestCategory::all() {
        session
            .mutate("complete_quest", |doc, _| complete_quest(doc, category.as_str()))
            .await
            .unwrap();
    }

    let doc = session.document();
    let master = doc
        .achievements
        .iter()
        .find(|a| a.kind == AchievementKind::QuestMaster)
        .unwrap();
    assert!(master.unlocked);
    assert!(!master.claimed);
    // 150 + 150 + 200 + 150 + 500
    assert_eq!(doc.player.total_experience, 1_150);
    assert!(doc.achievements.iter().any(|a| a.kind == AchievementKind::LevelUp && a.unlocked));
}
