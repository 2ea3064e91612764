//! # Pixdex
//!
//! Audiovisual catalog with a hangman-style guessing game and a leaderboard.
//!
//! ## Core Modules
//!
//! - [`catalog`]: Items, content types and genres, with a bundled dataset
//!   and browsing/filtering
//! - [`game`]: Hangman session reducer, normalization, masked rendering and
//!   the actor that hosts a game
//! - [`leaderboard`]: Best score per player behind a repository trait
//! - [`db`]: PostgreSQL pool for the leaderboard
//!
//! ## Example
//!
//! ```
//! use pixdex::{
//!     catalog::Item,
//!     game::{GameSession, GuessEvent, Phase, apply_guess},
//! };
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let pool = vec![Item::new(1, "Café!"), Item::new(2, "Dark")];
//! let mut rng = StdRng::seed_from_u64(1);
//! let session = GameSession::new("Ana", pool).start(&mut rng);
//!
//! let title = session.current_item().map(|item| item.name.clone()).unwrap();
//! let session = apply_guess(session, &GuessEvent::Title(title.to_lowercase()));
//! assert_eq!(session.phase(), Phase::Won);
//! assert_eq!(session.score(), 1);
//! ```

/// Catalog data, providers and browsing.
pub mod catalog;
pub use catalog::{Catalog, CatalogError, CatalogFilter, CatalogProvider, Item};

/// Database connection pooling.
pub mod db;

/// Hangman engine and game host.
pub mod game;
pub use game::{GameSession, GuessEvent, Phase, apply_guess, normalize};

/// Leaderboard storage and score submission.
pub mod leaderboard;
pub use leaderboard::{LeaderboardManager, SubmitOutcome};
