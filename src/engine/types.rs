use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DOCUMENT_SCHEMA_VERSION: u8 = 1;

/// Number of fixed daily tasks. Task identity is the positional index.
pub const DAILY_TASK_COUNT: usize = 4;

// ============================================================================
// Player
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Strength,
    Agility,
    Vitality,
    Intelligence,
    Perception,
}

impl StatKind {
    /// Canonical ordering, also used to break ties when picking a dominant stat.
    pub fn all() -> [StatKind; 5] {
        [
            StatKind::Strength,
            StatKind::Agility,
            StatKind::Vitality,
            StatKind::Intelligence,
            StatKind::Perception,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatKind::Strength => "strength",
            StatKind::Agility => "agility",
            StatKind::Vitality => "vitality",
            StatKind::Intelligence => "intelligence",
            StatKind::Perception => "perception",
        }
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            StatKind::Strength => "STR",
            StatKind::Agility => "AGI",
            StatKind::Vitality => "VIT",
            StatKind::Intelligence => "INT",
            StatKind::Perception => "PER",
        }
    }

    /// Accepts the full name or the three-letter abbreviation, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        let wanted = name.trim();
        StatKind::all().into_iter().find(|kind| {
            wanted.eq_ignore_ascii_case(kind.as_str()) || wanted.eq_ignore_ascii_case(kind.abbrev())
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub strength: u32,
    pub agility: u32,
    pub vitality: u32,
    pub intelligence: u32,
    pub perception: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            strength: 10,
            agility: 10,
            vitality: 10,
            intelligence: 10,
            perception: 10,
        }
    }
}

impl Stats {
    pub fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Strength => self.strength,
            StatKind::Agility => self.agility,
            StatKind::Vitality => self.vitality,
            StatKind::Intelligence => self.intelligence,
            StatKind::Perception => self.perception,
        }
    }

    fn slot(&mut self, kind: StatKind) -> &mut u32 {
        match kind {
            StatKind::Strength => &mut self.strength,
            StatKind::Agility => &mut self.agility,
            StatKind::Vitality => &mut self.vitality,
            StatKind::Intelligence => &mut self.intelligence,
            StatKind::Perception => &mut self.perception,
        }
    }

    pub fn increment(&mut self, kind: StatKind) {
        let slot = self.slot(kind);
        *slot = slot.saturating_add(1);
    }

    /// Sum of the five base stats (unspent points are not part of this).
    pub fn total(&self) -> u64 {
        StatKind::all().iter().map(|k| self.get(*k) as u64).sum()
    }
}

/// Rank tiers, declared lowest first so the derived ordering matches progression.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RankTier {
    E,
    D,
    C,
    B,
    A,
    S,
}

impl RankTier {
    pub fn letter(&self) -> &'static str {
        match self {
            RankTier::E => "E",
            RankTier::D => "D",
            RankTier::C => "C",
            RankTier::B => "B",
            RankTier::A => "A",
            RankTier::S => "S",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RankTier::E => "AWAKENED",
            RankTier::D => "NOVICE HUNTER",
            RankTier::C => "TRAINED HUNTER",
            RankTier::B => "SKILLED HUNTER",
            RankTier::A => "ELITE HUNTER",
            RankTier::S => "SHADOW MONARCH",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub name: String,
    pub level: u32,
    pub current_xp: u64,
    pub xp_to_next_level: u64,
    pub total_experience: u64,
    pub class: String,
    pub title: String,
    pub rank: RankTier,
    pub rank_name: String,
    pub rank_score: u64,
    /// `None` once the top tier is reached.
    pub points_to_next_rank: Option<u64>,
    pub stats: Stats,
    pub available_points: u32,
    pub coins: u64,
    pub energy: u32,
    pub max_energy: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub physical_damage_reduction: u32,
    pub magical_damage_reduction: u32,
    /// Lifetime count of task completions; never reset by the daily rollover.
    #[serde(default)]
    pub tasks_completed: u64,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: 1,
            current_xp: 0,
            xp_to_next_level: 100,
            total_experience: 0,
            class: "NONE".to_string(),
            title: "NONE".to_string(),
            rank: RankTier::E,
            rank_name: RankTier::E.title().to_string(),
            rank_score: 0,
            points_to_next_rank: Some(200),
            stats: Stats::default(),
            available_points: 0,
            coins: 0,
            energy: 100,
            max_energy: 100,
            streak: 0,
            max_streak: 0,
            physical_damage_reduction: 0,
            magical_damage_reduction: 0,
            tasks_completed: 0,
        }
    }
}

// ============================================================================
// Daily tasks
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Pushups,
    Situps,
    OutdoorRun,
    Meditation,
}

impl TaskCategory {
    /// Display label for a given numeric target.
    pub fn label(&self, target: u32) -> String {
        match self {
            TaskCategory::Pushups => format!("{} PUSHUPS", target),
            TaskCategory::Situps => format!("{} SITUPS", target),
            TaskCategory::OutdoorRun => format!("{} KM OUTDOOR RUN", target),
            TaskCategory::Meditation => format!("MEDITATE {} MIN", target),
        }
    }

    /// Whether the target grows with the streak on each rollover.
    pub fn scales_with_streak(&self) -> bool {
        matches!(self, TaskCategory::Pushups | TaskCategory::Situps)
    }

    /// Fixed quest fed by completing this task, and by how much.
    pub fn quest_link(&self) -> (QuestCategory, u32) {
        match self {
            TaskCategory::Pushups | TaskCategory::Situps => (QuestCategory::StrengthTraining, 10),
            TaskCategory::Meditation => (QuestCategory::SpiritualTraining, 15),
            TaskCategory::OutdoorRun => (QuestCategory::Discipline, 20),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyTask {
    pub category: TaskCategory,
    /// Derived from `category` and `max`; never parsed back.
    pub name: String,
    pub completed: bool,
    pub progress: u32,
    pub max: u32,
    pub xp_reward: u64,
    pub coin_reward: u64,
}

impl DailyTask {
    pub fn new(category: TaskCategory, target: u32, xp_reward: u64, coin_reward: u64) -> Self {
        Self {
            category,
            name: category.label(target),
            completed: false,
            progress: 0,
            max: target,
            xp_reward,
            coin_reward,
        }
    }

    pub fn set_target(&mut self, target: u32) {
        self.max = target;
        self.name = self.category.label(target);
        self.progress = self.progress.min(target);
    }

    pub fn mark_complete(&mut self) {
        self.completed = true;
        self.progress = self.max;
    }

    pub fn reset(&mut self) {
        self.completed = false;
        self.progress = 0;
    }
}

/// Countdown shown next to the daily tasks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timer {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Timer {
    pub fn from_secs(total: u32) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    /// Saturates at `u32::MAX` for out-of-range fields from a hand-edited document.
    pub fn total_secs(&self) -> u32 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }

    pub fn is_expired(&self) -> bool {
        self.total_secs() == 0
    }

    /// Decrement by one second, borrowing from minutes and hours. Stops at zero.
    pub fn tick(&mut self) {
        if self.seconds > 0 {
            self.seconds -= 1;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
        } else if self.hours > 0 {
            self.hours -= 1;
            self.minutes = 59;
            self.seconds = 59;
        }
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

// ============================================================================
// Quests
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestCategory {
    StrengthTraining,
    Intelligence,
    Discipline,
    SpiritualTraining,
    SecretQuests,
}

impl QuestCategory {
    pub fn all() -> [QuestCategory; 5] {
        [
            QuestCategory::StrengthTraining,
            QuestCategory::Intelligence,
            QuestCategory::Discipline,
            QuestCategory::SpiritualTraining,
            QuestCategory::SecretQuests,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestCategory::StrengthTraining => "strength_training",
            QuestCategory::Intelligence => "intelligence",
            QuestCategory::Discipline => "discipline",
            QuestCategory::SpiritualTraining => "spiritual_training",
            QuestCategory::SecretQuests => "secret_quests",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        let wanted = key.trim();
        QuestCategory::all()
            .into_iter()
            .find(|c| wanted.eq_ignore_ascii_case(c.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixedQuest {
    pub name: String,
    pub description: String,
    pub progress: u32,
    pub max: u32,
    pub completed: bool,
    pub reward_xp: u64,
    pub reward_coins: u64,
}

impl FixedQuest {
    pub fn new(name: &str, description: &str, reward_xp: u64, reward_coins: u64) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            progress: 0,
            max: 100,
            completed: false,
            reward_xp,
            reward_coins,
        }
    }

    /// Adds progress, capped at `max`. Completed quests stop accruing.
    pub fn add_progress(&mut self, amount: u32) {
        if !self.completed {
            self.progress = self.progress.saturating_add(amount).min(self.max);
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.completed && self.progress >= self.max
    }
}

/// Fixed quests keyed by category, plus the derived count of pending personal quests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct QuestBook {
    pub fixed: BTreeMap<QuestCategory, FixedQuest>,
    #[serde(rename = "personal_quests")]
    pub personal_pending: u32,
}

impl QuestBook {
    pub fn completed_count(&self) -> usize {
        self.fixed.values().filter(|q| q.completed).count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalQuest {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub completed: bool,
    pub created_on: NaiveDate,
    #[serde(default)]
    pub completed_on: Option<NaiveDate>,
    pub reward_xp: u64,
    pub reward_coins: u64,
}

// ============================================================================
// Achievements
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    FirstSteps,
    Dedication,
    LevelUp,
    QuestMaster,
    Unstoppable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub kind: AchievementKind,
    pub name: String,
    pub description: String,
    pub unlocked: bool,
    pub claimed: bool,
    pub reward_coins: u64,
}

impl Achievement {
    pub fn new(kind: AchievementKind, name: &str, description: &str, reward_coins: u64) -> Self {
        Self {
            kind,
            name: name.to_string(),
            description: description.to_string(),
            unlocked: false,
            claimed: false,
            reward_coins,
        }
    }
}

// ============================================================================
// Shop & inventory
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemEffect {
    RestoreEnergy { amount: u32 },
    GrantExperience { amount: u64 },
    QuestProgress { quest: QuestCategory, amount: u32 },
    GrantStatPoints { amount: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShopItem {
    pub name: String,
    pub description: String,
    pub price: u64,
    pub effect: ItemEffect,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: u32,
}

// ============================================================================
// Document
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Value the countdown timer is reset to on each rollover.
    pub timer_duration_secs: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timer_duration_secs: 24 * 3600,
        }
    }
}

/// XP and coins paid out together by a task, quest, or personal quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reward {
    pub xp: u64,
    pub coins: u64,
}

/// The whole persisted game state. Every engine operation reads and rewrites this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameDocument {
    pub schema_version: u8,
    pub player: Player,
    pub daily_tasks: Vec<DailyTask>,
    pub timer: Timer,
    pub last_reset: NaiveDate,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    pub quests: QuestBook,
    #[serde(default)]
    pub personal_quest_list: Vec<PersonalQuest>,
    /// Next id handed to a personal quest. Only advanced by a successful create.
    pub next_personal_quest_id: u32,
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub shop: Vec<ShopItem>,
    #[serde(default)]
    pub settings: Settings,
}
