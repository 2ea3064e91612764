//! Leaderboard error types.

use crate::db::timeouts::TimeoutError;
use thiserror::Error;

/// Leaderboard errors
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Player name empty or blank
    #[error("Invalid player name: {0:?}")]
    InvalidName(String),

    /// Negative score
    #[error("Invalid score: {0}")]
    InvalidScore(i64),

    /// Backend refused or failed the write
    #[error("Leaderboard unavailable: {0}")]
    Unavailable(String),
}

impl LeaderboardError {
    /// Message safe to show a player; database details are not exposed.
    pub fn client_message(&self) -> String {
        match self {
            LeaderboardError::Database(_) => "Leaderboard is unavailable".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<TimeoutError> for LeaderboardError {
    fn from(err: TimeoutError) -> Self {
        match err {
            TimeoutError::Database(e) => LeaderboardError::Database(e),
            TimeoutError::Timeout(_) => LeaderboardError::Unavailable(err.to_string()),
        }
    }
}

/// Result type for leaderboard operations
pub type LeaderboardResult<T> = Result<T, LeaderboardError>;
