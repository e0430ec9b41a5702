//! Daily rollover, streak bookkeeping and the countdown timer.
use chrono::NaiveDate;
use log::{debug, info};
use serde::Serialize;

use crate::engine::types::{DailyTask, GameDocument, Timer};

/// Pushup/situp target with no streak.
pub const BASE_STRENGTH_TARGET: u32 = 12;
/// Extra repetitions per streak day.
pub const TARGET_PER_STREAK_DAY: u32 = 2;

/// Pushup/situp target for the given (post-reset) streak.
pub fn scaled_target(streak: u32) -> u32 {
    BASE_STRENGTH_TARGET.saturating_add(TARGET_PER_STREAK_DAY.saturating_mul(streak))
}

pub fn all_tasks_completed(doc: &GameDocument) -> bool {
    !doc.daily_tasks.is_empty() && doc.daily_tasks.iter().all(|t| t.completed)
}

/// Run the rollover if `today` is a later calendar date than the stored reset date.
///
/// Returns true when the rollover fired (the caller must then persist). Fires at most
/// once per date; a clock that moved backwards is ignored.
pub fn check_daily_reset(doc: &mut GameDocument, today: NaiveDate) -> bool {
    if today <= doc.last_reset {
        return false;
    }

    let days_elapsed = (today - doc.last_reset).num_days();
    let finished_cycle = all_tasks_completed(doc);
    let previous_streak = doc.player.streak;

    // A skipped calendar day breaks the streak even if the last cycle was finished.
    if !finished_cycle || days_elapsed > 1 {
        doc.player.streak = 0;
    }

    let target = scaled_target(doc.player.streak);
    for task in &mut doc.daily_tasks {
        reset_task(task, target);
    }
    doc.timer = Timer::from_secs(doc.settings.timer_duration_secs);
    doc.player.energy = doc.player.max_energy;
    doc.last_reset = today;

    info!(
        "Daily reset for {}: streak {} -> {} (days elapsed {}, cycle finished {})",
        today, previous_streak, doc.player.streak, days_elapsed, finished_cycle
    );
    true
}

fn reset_task(task: &mut DailyTask, strength_target: u32) {
    task.reset();
    if task.category.scales_with_streak() {
        task.set_target(strength_target);
    }
}

/// Decrement the countdown by one second. Stops at zero.
pub fn update_timer(doc: &mut GameDocument) -> Timer {
    doc.timer.tick();
    if doc.timer.is_expired() {
        debug!("Countdown timer reached zero");
    }
    doc.timer
}

/// Payload for the daily task listing.
#[derive(Debug, Clone, Serialize)]
pub struct DailyView {
    pub tasks: Vec<DailyTask>,
    pub timer: String,
    pub timer_seconds: u32,
    pub streak: u32,
}

pub fn daily_view(doc: &GameDocument) -> DailyView {
    DailyView {
        tasks: doc.daily_tasks.clone(),
        timer: doc.timer.to_string(),
        timer_seconds: doc.timer.total_secs(),
        streak: doc.player.streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::new_document;
    use crate::engine::types::TaskCategory;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn complete(doc: &mut GameDocument, count: usize) {
        for task in doc.daily_tasks.iter_mut().take(count) {
            task.mark_complete();
        }
    }

    #[test]
    fn same_day_does_nothing() {
        let mut doc = new_document("Jin", day(1));
        complete(&mut doc, 2);
        let before = doc.clone();
        assert!(!check_daily_reset(&mut doc, day(1)));
        assert_eq!(doc, before);
    }

    #[test]
    fn earlier_date_is_ignored() {
        let mut doc = new_document("Jin", day(5));
        assert!(!check_daily_reset(&mut doc, day(4)));
        assert_eq!(doc.last_reset, day(5));
    }

    #[test]
    fn partial_cycle_breaks_streak() {
        let mut doc = new_document("Jin", day(1));
        doc.player.streak = 5;
        doc.player.max_streak = 9;
        complete(&mut doc, 3);

        assert!(check_daily_reset(&mut doc, day(2)));
        assert_eq!(doc.player.streak, 0);
        assert_eq!(doc.player.max_streak, 9);
        assert_eq!(doc.daily_tasks[0].max, 12);
        assert_eq!(doc.daily_tasks[1].name, "12 SITUPS");
        assert!(doc.daily_tasks.iter().all(|t| !t.completed && t.progress == 0));
    }

    #[test]
    fn finished_cycle_keeps_streak_and_scales_targets() {
        let mut doc = new_document("Jin", day(1));
        doc.player.streak = 4;
        doc.player.max_streak = 4;
        complete(&mut doc, 4);

        assert!(check_daily_reset(&mut doc, day(2)));
        assert_eq!(doc.player.streak, 4);
        assert_eq!(doc.daily_tasks[0].name, "20 PUSHUPS");
        assert_eq!(doc.daily_tasks[1].max, 20);
        // Run and meditation are not scaled.
        assert_eq!(doc.daily_tasks[2].max, 2);
        assert_eq!(doc.daily_tasks[3].category, TaskCategory::Meditation);
        assert_eq!(doc.daily_tasks[3].max, 15);
    }

    #[test]
    fn skipped_day_breaks_streak() {
        let mut doc = new_document("Jin", day(1));
        doc.player.streak = 4;
        doc.player.max_streak = 4;
        complete(&mut doc, 4);

        assert!(check_daily_reset(&mut doc, day(3)));
        assert_eq!(doc.player.streak, 0);
        assert_eq!(doc.daily_tasks[0].max, 12);
    }

    #[test]
    fn rollover_restores_energy_and_timer_once() {
        let mut doc = new_document("Jin", day(1));
        doc.settings.timer_duration_secs = 3_600;
        doc.player.energy = 10;
        doc.timer = Timer::from_secs(5);

        assert!(check_daily_reset(&mut doc, day(2)));
        assert_eq!(doc.player.energy, doc.player.max_energy);
        assert_eq!(doc.timer.to_string(), "01:00:00");
        assert_eq!(doc.last_reset, day(2));
        assert!(!check_daily_reset(&mut doc, day(2)));
    }

    #[test]
    fn update_timer_borrows_and_reports() {
        let mut doc = new_document("Jin", day(1));
        doc.timer = Timer::from_secs(60);
        let timer = update_timer(&mut doc);
        assert_eq!(timer.to_string(), "00:00:59");
        let view = daily_view(&doc);
        assert_eq!(view.timer, "00:00:59");
        assert_eq!(view.timer_seconds, 59);
        assert_eq!(view.tasks.len(), 4);
    }
}
