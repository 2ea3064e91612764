//! Hangman game engine.
//!
//! This module provides:
//! - Title normalization used for comparing guesses (`normalize`)
//! - The session reducer (`GameSession::apply`, `apply_guess`)
//! - Masked rendering of the target title (`render`)
//! - One-shot outcome reporting to the leaderboard (`outcome`)
//! - A tokio actor hosting one session with the intermission pause (`actor`)

pub mod actor;
pub mod config;
pub mod constants;
pub mod messages;
pub mod normalize;
pub mod outcome;
pub mod render;
pub mod session;

pub use actor::{GameActor, GameHandle};
pub use config::GameConfig;
pub use messages::{GameMessage, GameView};
pub use normalize::{canonical_title, normalize};
pub use outcome::{GameOutcome, GameStatus, OutcomeReporter, ReportStatus};
pub use render::{Glyph, MaskedWord, mask};
pub use session::{GameEvent, GameSession, GuessEvent, Phase, apply_guess};
