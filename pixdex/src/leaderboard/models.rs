//! Leaderboard data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Player ID type
pub type PlayerId = i64;

/// Number of players the lobby scoreboard shows
pub const DEFAULT_TOP_PLAYERS: usize = 5;

/// A player's best score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: PlayerId,
    pub name: String,
    pub score: i64,
    /// Authenticated account that last wrote this entry
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    /// Case-insensitive name comparison used for all lookups.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Result of a score submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    /// First score for this name
    Created(LeaderboardEntry),
    /// New score beat the stored one
    Improved {
        previous: i64,
        entry: LeaderboardEntry,
    },
    /// Stored score was equal or higher; nothing written
    Unchanged(LeaderboardEntry),
    /// Zero score; nothing looked up or written
    Ignored,
}

impl SubmitOutcome {
    /// Entry as stored after the submission, if one exists.
    pub fn entry(&self) -> Option<&LeaderboardEntry> {
        match self {
            SubmitOutcome::Created(entry)
            | SubmitOutcome::Improved { entry, .. }
            | SubmitOutcome::Unchanged(entry) => Some(entry),
            SubmitOutcome::Ignored => None,
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(
            self,
            SubmitOutcome::Created(_) | SubmitOutcome::Improved { .. }
        )
    }
}

/// Change notification published by the leaderboard manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", content = "payload", rename_all = "UPPERCASE")]
pub enum LeaderboardEvent {
    Insert(LeaderboardEntry),
    Update(LeaderboardEntry),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: i64) -> LeaderboardEntry {
        let now = Utc::now();
        LeaderboardEntry {
            id: 1,
            name: name.to_string(),
            score,
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_name_matches_case_insensitive() {
        let e = entry("PixelMaster", 12);
        assert!(e.name_matches("pixelmaster"));
        assert!(e.name_matches("PIXELMASTER"));
        assert!(!e.name_matches("PixelMaster2"));
    }

    #[test]
    fn test_submit_outcome_entry() {
        assert!(SubmitOutcome::Ignored.entry().is_none());
        assert!(!SubmitOutcome::Ignored.is_write());

        let unchanged = SubmitOutcome::Unchanged(entry("a", 3));
        assert_eq!(unchanged.entry().unwrap().score, 3);
        assert!(!unchanged.is_write());

        let improved = SubmitOutcome::Improved {
            previous: 1,
            entry: entry("a", 4),
        };
        assert!(improved.is_write());
    }

    #[test]
    fn test_event_serializes_with_event_type_tag() {
        let json = serde_json::to_value(LeaderboardEvent::Update(entry("a", 4))).unwrap();
        assert_eq!(json["event_type"], "UPDATE");
        assert_eq!(json["payload"]["score"], 4);
    }
}
