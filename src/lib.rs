//! # Ascend - Habit Progression Engine
//!
//! Ascend turns real-world daily habits into RPG-style progression for a single player.
//! Completing daily tasks earns experience and coins, feeds category quests, extends a
//! streak that scales tomorrow's difficulty, and moves the player up a ranked ladder.
//!
//! ## Features
//!
//! - **Leveling**: Level is always recomputed from total experience (each level needs 20% more).
//! - **Ranks, Classes, Titles**: Derived from level, stats, and streak history.
//! - **Daily Rollover**: Once per calendar day the streak is judged and tasks are reset.
//! - **Quests & Achievements**: Category quests, player-authored quests, unlock-then-claim achievements.
//! - **Shop**: Coins buy consumables that restore energy, grant experience, or advance quests.
//! - **HTTP API**: JSON endpoints served with axum; every change is written through to disk.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ascend::config::Config;
//! use ascend::server::{self, Clock, GameSession};
//! use ascend::storage::GameStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let store = GameStore::open(&config.storage.data_dir, &config.storage.state_file).await?;
//!     let session = GameSession::open(
//!         store,
//!         &config.game.player_name,
//!         config.game.settings(),
//!         Clock::Local,
//!     )
//!     .await?;
//!     server::run(session, config.bind_addr()?).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`engine`] - Progression rules operating on the game document
//! - [`storage`] - Atomic load/save of the game document
//! - [`server`] - Session host and HTTP routes
//! - [`config`] - Configuration management and validation
//! - [`validation`] - Validation of player-authored text
//! - [`metrics`] - Operation counters

pub mod config;
pub mod engine;
pub mod logutil;
pub mod metrics;
pub mod server;
pub mod storage;
pub mod validation;
