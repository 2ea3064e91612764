//! Leaderboard module: best score per player.
//!
//! This module implements:
//! - `LeaderboardRepository` trait with PostgreSQL and in-memory backends
//! - Upsert-if-higher score submission (`LeaderboardManager::submit_score`)
//! - Case-insensitive player names
//! - Change notifications over a broadcast channel
//!
//! ## Example
//!
//! ```
//! use pixdex::leaderboard::{InMemoryLeaderboard, LeaderboardManager, SubmitOutcome};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let leaderboard = LeaderboardManager::new(Arc::new(InMemoryLeaderboard::new()));
//!
//!     let outcome = leaderboard.submit_score("Ana", 3, None).await?;
//!     assert!(matches!(outcome, SubmitOutcome::Created(_)));
//!
//!     // Lower scores never overwrite a better one
//!     let outcome = leaderboard.submit_score("ana", 1, None).await?;
//!     assert!(matches!(outcome, SubmitOutcome::Unchanged(_)));
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;
pub mod repository;

pub use errors::{LeaderboardError, LeaderboardResult};
pub use manager::LeaderboardManager;
pub use models::{DEFAULT_TOP_PLAYERS, LeaderboardEntry, LeaderboardEvent, PlayerId, SubmitOutcome};
pub use repository::{InMemoryLeaderboard, LeaderboardRepository, PgLeaderboard};
