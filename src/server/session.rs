//! The session host: owns the live document and serializes every operation on it.
use chrono::NaiveDate;
use log::{debug, error, info};

use crate::engine::daily::check_daily_reset;
use crate::engine::errors::EngineError;
use crate::engine::state::refresh_derived;
use crate::engine::types::{GameDocument, Settings};
use crate::metrics::{self, Outcome};
use crate::storage::{GameStore, LoadSource};

/// Source of "today" for the daily rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Local calendar date of the host.
    Local,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::Local => chrono::Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

/// Live game state plus the store it is written through to.
///
/// Mutations run against a copy of the document. The copy is saved and only then
/// becomes the live document, so a rejected operation or a failed save leaves both
/// memory and disk as they were.
#[derive(Debug)]
pub struct GameSession {
    store: GameStore,
    doc: GameDocument,
    clock: Clock,
}

impl GameSession {
    /// Load (or create) the document, repair derived fields, and apply any pending rollover.
    pub async fn open(
        store: GameStore,
        player_name: &str,
        settings: Settings,
        clock: Clock,
    ) -> Result<Self, EngineError> {
        let today = clock.today();
        let (mut doc, source) = store.load_or_default(player_name, settings, today).await?;
        refresh_derived(&mut doc);
        let rolled = check_daily_reset(&mut doc, today);
        if rolled {
            metrics::inc_daily_resets();
        }
        if rolled || source != LoadSource::Existing {
            store.save(&doc).await?;
            metrics::inc_saves();
        }
        info!(
            "Session ready for {} (level {}, rank {}) from {}",
            doc.player.name,
            doc.player.level,
            doc.player.rank.letter(),
            store.path().display()
        );
        Ok(Self { store, doc, clock })
    }

    pub fn document(&self) -> &GameDocument {
        &self.doc
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    /// Run the daily rollover if the date moved on, persisting when it fires.
    pub async fn sync_day(&mut self) -> Result<bool, EngineError> {
        let mut draft = self.doc.clone();
        if !check_daily_reset(&mut draft, self.clock.today()) {
            return Ok(false);
        }
        self.store.save(&draft).await?;
        metrics::inc_saves();
        metrics::inc_daily_resets();
        self.doc = draft;
        Ok(true)
    }

    /// Read-only view after the rollover check.
    pub async fn read<T>(&mut self, view: impl FnOnce(&GameDocument) -> T) -> Result<T, EngineError> {
        self.sync_day().await?;
        Ok(view(&self.doc))
    }

    /// Apply `op` all-or-nothing and write the result through to disk.
    ///
    /// `op` receives a copy of the document and today's date. The copy replaces the live
    /// document only after it has been saved. Unchanged documents are not rewritten.
    pub async fn mutate<T>(
        &mut self,
        action: &str,
        op: impl FnOnce(&mut GameDocument, NaiveDate) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        if let Err(e) = self.sync_day().await {
            error!("{}: daily reset could not be saved: {}", action, e);
            metrics::record(action, Outcome::Failed);
            return Err(e);
        }

        let mut draft = self.doc.clone();
        let value = match op(&mut draft, self.clock.today()) {
            Ok(value) => value,
            Err(e) => {
                debug!("{} rejected: {}", action, e);
                metrics::record(action, Outcome::Rejected);
                return Err(e);
            }
        };

        if draft != self.doc {
            if let Err(e) = self.store.save(&draft).await {
                error!("{}: failed to save game document: {}", action, e);
                metrics::record(action, Outcome::Failed);
                return Err(e);
            }
            metrics::inc_saves();
            self.doc = draft;
        }
        metrics::record(action, Outcome::Applied);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tasks::complete_task;
    use tempfile::tempdir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    async fn session(dir: &std::path::Path, d: u32) -> GameSession {
        let store = GameStore::open(dir, "state.json").await.unwrap();
        GameSession::open(store, "Jin", Settings::default(), Clock::Fixed(day(d)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn open_creates_and_persists_fresh_document() {
        let dir = tempdir().unwrap();
        let session = session(dir.path(), 1).await;
        assert!(session.store().path().exists());
        assert_eq!(session.document().player.name, "Jin");
    }

    #[tokio::test]
    async fn rejected_operation_leaves_document_untouched() {
        let dir = tempdir().unwrap();
        let mut session = session(dir.path(), 1).await;
        let before = session.document().clone();
        let on_disk = std::fs::read_to_string(session.store().path()).unwrap();

        let err = session
            .mutate("complete_task", |doc, _| complete_task(doc, 9))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(session.document(), &before);
        assert_eq!(std::fs::read_to_string(session.store().path()).unwrap(), on_disk);
    }

    #[tokio::test]
    async fn applied_operation_is_written_through() {
        let dir = tempdir().unwrap();
        let mut session = session(dir.path(), 1).await;
        session
            .mutate("complete_task", |doc, _| complete_task(doc, 0))
            .await
            .unwrap();

        let reopened = self::session(dir.path(), 1).await;
        assert!(reopened.document().daily_tasks[0].completed);
        assert_eq!(reopened.document().player.total_experience, 25);
    }

    #[tokio::test]
    async fn reads_trigger_rollover_once() {
        let dir = tempdir().unwrap();
        let mut session = session(dir.path(), 1).await;
        session
            .mutate("complete_task", |doc, _| complete_task(doc, 0))
            .await
            .unwrap();

        session.set_clock(Clock::Fixed(day(2)));
        let completed = session
            .read(|doc| doc.daily_tasks.iter().filter(|t| t.completed).count())
            .await
            .unwrap();
        assert_eq!(completed, 0);
        assert_eq!(session.document().last_reset, day(2));
        assert!(!session.sync_day().await.unwrap());
    }
}
