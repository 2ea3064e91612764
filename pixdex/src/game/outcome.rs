//! Final game result and its one-shot hand-off to the leaderboard.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use uuid::Uuid;

use crate::leaderboard::{LeaderboardManager, SubmitOutcome};

/// How a session ended
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Won,
    Lost,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Won => write!(f, "win"),
            GameStatus::Lost => write!(f, "lose"),
        }
    }
}

/// Emitted once when a session reaches `Won` or `Lost`
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameOutcome {
    pub session_id: Uuid,
    pub status: GameStatus,
    pub score: u32,
    pub player: String,
}

/// What happened to the score hand-off
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportStatus {
    /// The leaderboard accepted the submission
    Submitted(SubmitOutcome),
    /// The leaderboard could not be written; the outcome itself stands
    Failed(String),
    /// This reporter already handed off an outcome
    AlreadyReported,
}

impl ReportStatus {
    /// Notice to show the player, if any.
    pub fn notice(&self) -> Option<String> {
        match self {
            ReportStatus::Failed(message) => {
                Some(format!("Your score could not be saved: {message}"))
            }
            _ => None,
        }
    }

    /// What the leaderboard did with the score, if it was reached.
    pub fn submitted(&self) -> Option<&SubmitOutcome> {
        match self {
            ReportStatus::Submitted(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// Hands a session's outcome to the leaderboard at most once.
pub struct OutcomeReporter {
    leaderboard: Arc<LeaderboardManager>,
    reported: bool,
}

impl OutcomeReporter {
    pub fn new(leaderboard: Arc<LeaderboardManager>) -> Self {
        Self {
            leaderboard,
            reported: false,
        }
    }

    pub fn has_reported(&self) -> bool {
        self.reported
    }

    /// Submit `outcome`. Failures are returned, not retried.
    pub async fn report(&mut self, outcome: &GameOutcome) -> ReportStatus {
        if self.reported {
            return ReportStatus::AlreadyReported;
        }
        self.reported = true;

        info!(
            "Session {} over: {} {} with score {}",
            outcome.session_id, outcome.player, outcome.status, outcome.score
        );

        match self
            .leaderboard
            .submit_score(&outcome.player, i64::from(outcome.score), None)
            .await
        {
            Ok(result) => {
                if !result.is_write() {
                    debug!("Session {} left the leaderboard as it was", outcome.session_id);
                }
                ReportStatus::Submitted(result)
            }
            Err(e) => {
                warn!("Score submission for session {} failed: {e}", outcome.session_id);
                ReportStatus::Failed(e.client_message())
            }
        }
    }
}
