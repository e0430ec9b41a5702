//! Process-wide operation counters, exposed through `GET /api/metrics`.
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};

static DAILY_RESETS: AtomicU64 = AtomicU64::new(0);
static SAVES: AtomicU64 = AtomicU64::new(0);

static OP_COUNTERS: OnceLock<Mutex<BTreeMap<String, OpCounter>>> = OnceLock::new();

/// Outcome counts for one action name.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpCounter {
    pub applied: u64,
    /// Refused by a game rule; nothing changed.
    pub rejected: u64,
    /// Storage failures.
    pub failed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Rejected,
    Failed,
}

fn counters() -> MutexGuard<'static, BTreeMap<String, OpCounter>> {
    OP_COUNTERS
        .get_or_init(|| Mutex::new(BTreeMap::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn record(action: &str, outcome: Outcome) -> OpCounter {
    let mut guard = counters();
    let counter = guard.entry(action.to_string()).or_default();
    match outcome {
        Outcome::Applied => counter.applied = counter.applied.saturating_add(1),
        Outcome::Rejected => counter.rejected = counter.rejected.saturating_add(1),
        Outcome::Failed => counter.failed = counter.failed.saturating_add(1),
    }
    *counter
}

pub fn inc_daily_resets() {
    DAILY_RESETS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_saves() {
    SAVES.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct Snapshot {
    pub daily_resets: u64,
    pub saves: u64,
    pub operations: BTreeMap<String, OpCounter>,
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        daily_resets: DAILY_RESETS.load(Ordering::Relaxed),
        saves: SAVES.load(Ordering::Relaxed),
        operations: counters().clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_are_counted_per_action() {
        // Unique action name so parallel tests sharing the registry do not interfere.
        let action = "metrics_test_claim";
        record(action, Outcome::Applied);
        record(action, Outcome::Rejected);
        let counter = record(action, Outcome::Rejected);
        assert_eq!(
            counter,
            OpCounter {
                applied: 1,
                rejected: 2,
                failed: 0
            }
        );
        assert_eq!(snapshot().operations.get(action), Some(&counter));
    }
}
