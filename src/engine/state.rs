//! Initial document construction and the starter catalogues seeded into it.
use chrono::NaiveDate;

use crate::engine::class::refresh_class_and_title;
use crate::engine::daily::scaled_target;
use crate::engine::leveling::level_for_experience;
use crate::engine::quest::refresh_pending;
use crate::engine::stats::refresh_damage_reduction;
use crate::engine::types::*;

/// Starter daily tasks in index order. Index is the task identity.
pub fn seed_daily_tasks(streak: u32) -> Vec<DailyTask> {
    let strength_target = scaled_target(streak);
    vec![
        DailyTask::new(TaskCategory::Pushups, strength_target, 25, 10),
        DailyTask::new(TaskCategory::Situps, strength_target, 25, 10),
        DailyTask::new(TaskCategory::OutdoorRun, 2, 40, 15),
        DailyTask::new(TaskCategory::Meditation, 15, 30, 10),
    ]
}

/// The five fixed quests, one per category.
pub fn seed_fixed_quests() -> QuestBook {
    let mut book = QuestBook::default();
    let entries = [
        (
            QuestCategory::StrengthTraining,
            "Strength Training",
            "Build raw power through pushups and situps",
            150,
            100,
        ),
        (
            QuestCategory::Intelligence,
            "Intelligence",
            "Sharpen the mind with study and reading",
            150,
            100,
        ),
        (
            QuestCategory::Discipline,
            "Discipline",
            "Show up for the outdoor run every day",
            200,
            120,
        ),
        (
            QuestCategory::SpiritualTraining,
            "Spiritual Training",
            "Find calm through daily meditation",
            150,
            100,
        ),
        (
            QuestCategory::SecretQuests,
            "Secret Quests",
            "Some doors only open for those who look",
            500,
            300,
        ),
    ];
    for (category, name, description, xp, coins) in entries {
        book.fixed
            .insert(category, FixedQuest::new(name, description, xp, coins));
    }
    book
}

pub fn seed_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new(
            AchievementKind::FirstSteps,
            "First Steps",
            "Complete your first daily task",
            50,
        ),
        Achievement::new(
            AchievementKind::Dedication,
            "Dedication",
            "Reach a 7 day streak",
            200,
        ),
        Achievement::new(AchievementKind::LevelUp, "Level Up", "Reach level 5", 100),
        Achievement::new(
            AchievementKind::QuestMaster,
            "Quest Master",
            "Complete 5 fixed quests",
            300,
        ),
        Achievement::new(
            AchievementKind::Unstoppable,
            "Unstoppable",
            "Reach a 30 day streak",
            1000,
        ),
    ]
}

pub fn seed_shop() -> Vec<ShopItem> {
    vec![
        ShopItem {
            name: "ENERGY POTION".to_string(),
            description: "Restores 50 energy".to_string(),
            price: 50,
            effect: ItemEffect::RestoreEnergy { amount: 50 },
        },
        ShopItem {
            name: "XP BOOST".to_string(),
            description: "Grants 100 experience".to_string(),
            price: 100,
            effect: ItemEffect::GrantExperience { amount: 100 },
        },
        ShopItem {
            name: "SKILL BOOK".to_string(),
            description: "Advances the Intelligence quest by 25".to_string(),
            price: 75,
            effect: ItemEffect::QuestProgress {
                quest: QuestCategory::Intelligence,
                amount: 25,
            },
        },
        ShopItem {
            name: "MYSTERIOUS KEY".to_string(),
            description: "Advances the Secret Quests by 50".to_string(),
            price: 200,
            effect: ItemEffect::QuestProgress {
                quest: QuestCategory::SecretQuests,
                amount: 50,
            },
        },
        ShopItem {
            name: "STAT ELIXIR".to_string(),
            description: "Grants 1 stat point".to_string(),
            price: 150,
            effect: ItemEffect::GrantStatPoints { amount: 1 },
        },
    ]
}

/// Fresh document for a new player, with default settings.
pub fn new_document(player_name: &str, today: NaiveDate) -> GameDocument {
    new_document_with_settings(player_name, today, Settings::default())
}

pub fn new_document_with_settings(
    player_name: &str,
    today: NaiveDate,
    settings: Settings,
) -> GameDocument {
    let mut doc = GameDocument {
        schema_version: DOCUMENT_SCHEMA_VERSION,
        player: Player::new(player_name),
        daily_tasks: seed_daily_tasks(0),
        timer: Timer::from_secs(settings.timer_duration_secs),
        last_reset: today,
        inventory: Vec::new(),
        quests: seed_fixed_quests(),
        personal_quest_list: Vec::new(),
        next_personal_quest_id: 1,
        achievements: seed_achievements(),
        shop: seed_shop(),
        settings,
    };
    refresh_derived(&mut doc);
    doc
}

/// Recompute every derived field from the stored primary values.
///
/// Run after loading so a hand-edited or older document cannot carry stale
/// level, rank, or counter values.
pub fn refresh_derived(doc: &mut GameDocument) {
    let player = &mut doc.player;
    let progress = level_for_experience(player.total_experience);
    player.level = progress.level;
    player.current_xp = progress.current_xp;
    player.xp_to_next_level = progress.xp_to_next;
    player.max_streak = player.max_streak.max(player.streak);
    player.energy = player.energy.min(player.max_energy);
    refresh_damage_reduction(player);
    refresh_class_and_title(player);

    let seeded = seed_daily_tasks(doc.player.streak);
    let layout_ok = doc.daily_tasks.len() == DAILY_TASK_COUNT
        && doc
            .daily_tasks
            .iter()
            .zip(&seeded)
            .all(|(task, seed)| task.category == seed.category);
    if !layout_ok {
        doc.daily_tasks = seeded;
    }
    for task in &mut doc.daily_tasks {
        task.progress = task.progress.min(task.max);
    }
    let remaining = doc.timer.total_secs().min(doc.settings.timer_duration_secs);
    doc.timer = Timer::from_secs(remaining);
    for quest in doc.quests.fixed.values_mut() {
        quest.progress = quest.progress.min(quest.max);
    }
    // A claimed flag without its unlock is not a reachable state.
    for achievement in &mut doc.achievements {
        achievement.claimed &= achievement.unlocked;
    }
    refresh_pending(doc);
}
