//! Test utilities & fixtures shared by the integration tests.

use ascend::engine::state::new_document;
use ascend::engine::types::{GameDocument, Settings};
use ascend::server::{Clock, GameSession};
use ascend::storage::GameStore;
use chrono::NaiveDate;
use tempfile::TempDir;

#[allow(dead_code)]
pub const STATE_FILE: &str = "game_state.json";

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

#[allow(dead_code)]
pub fn fresh_document() -> GameDocument {
    new_document("Tester", day(1))
}

/// Open a session over a fresh temp directory. Keep the `TempDir` alive for the test.
#[allow(dead_code)]
pub async fn fresh_session(today: NaiveDate) -> (TempDir, GameSession) {
    let dir = tempfile::tempdir().expect("tempdir");
    let session = open_session(&dir, today).await;
    (dir, session)
}

#[allow(dead_code)]
pub async fn open_session(dir: &TempDir, today: NaiveDate) -> GameSession {
    let store = GameStore::open(dir.path(), STATE_FILE).await.expect("store");
    GameSession::open(store, "Tester", Settings::default(), Clock::Fixed(today))
        .await
        .expect("session")
}
