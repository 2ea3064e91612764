//! Leaderboard manager: score submission policy and change notifications.

use log::{debug, info};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::{
    errors::{LeaderboardError, LeaderboardResult},
    models::{DEFAULT_TOP_PLAYERS, LeaderboardEntry, LeaderboardEvent, SubmitOutcome},
    repository::LeaderboardRepository,
};

const EVENT_CAPACITY: usize = 64;

/// Leaderboard manager
#[derive(Clone)]
pub struct LeaderboardManager {
    repository: Arc<dyn LeaderboardRepository>,
    events: broadcast::Sender<LeaderboardEvent>,
}

impl LeaderboardManager {
    /// Create a new leaderboard manager
    ///
    /// # Arguments
    ///
    /// * `repository` - Storage backend
    pub fn new(repository: Arc<dyn LeaderboardRepository>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { repository, events }
    }

    /// Record a finished game's score.
    ///
    /// A zero score is ignored without touching storage. An unknown name
    /// (compared case-insensitively) creates an entry; a known name is only
    /// updated when `score` is strictly higher than the stored one.
    ///
    /// # Errors
    ///
    /// * `LeaderboardError::InvalidScore` - Negative score
    /// * `LeaderboardError::InvalidName` - Blank player name
    /// * `LeaderboardError::Database` - Storage failure
    pub async fn submit_score(
        &self,
        name: &str,
        score: i64,
        user_id: Option<&str>,
    ) -> LeaderboardResult<SubmitOutcome> {
        if score == 0 {
            debug!("Ignoring zero score for {name}");
            return Ok(SubmitOutcome::Ignored);
        }
        if score < 0 {
            return Err(LeaderboardError::InvalidScore(score));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(LeaderboardError::InvalidName(name.to_string()));
        }

        match self.repository.find_by_name(name).await? {
            Some(existing) if score > existing.score => {
                let previous = existing.score;
                match self
                    .repository
                    .raise_score(existing.id, score, user_id)
                    .await?
                {
                    Some(entry) => {
                        info!("{} improved best score {} -> {}", entry.name, previous, score);
                        self.publish(LeaderboardEvent::Update(entry.clone()));
                        Ok(SubmitOutcome::Improved { previous, entry })
                    }
                    // Another write got there first with an equal or higher score
                    None => {
                        let current = self
                            .repository
                            .find_by_id(existing.id)
                            .await?
                            .unwrap_or(existing);
                        debug!(
                            "{} keeps best score {} (submitted {})",
                            current.name, current.score, score
                        );
                        Ok(SubmitOutcome::Unchanged(current))
                    }
                }
            }
            Some(existing) => {
                debug!(
                    "{} keeps best score {} (submitted {})",
                    existing.name, existing.score, score
                );
                Ok(SubmitOutcome::Unchanged(existing))
            }
            None => {
                let entry = self.repository.insert(name, score, user_id).await?;
                info!("New leaderboard entry {} with {}", entry.name, score);
                self.publish(LeaderboardEvent::Insert(entry.clone()));
                Ok(SubmitOutcome::Created(entry))
            }
        }
    }

    /// All players, highest score first
    pub async fn players(&self) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        self.repository.list(None).await
    }

    /// Best `limit` players, highest score first
    pub async fn top_players(&self, limit: usize) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        self.repository.list(Some(limit)).await
    }

    /// Scoreboard as the lobby shows it
    pub async fn scoreboard(&self) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        self.top_players(DEFAULT_TOP_PLAYERS).await
    }

    pub async fn player_by_name(&self, name: &str) -> LeaderboardResult<Option<LeaderboardEntry>> {
        self.repository.find_by_name(name.trim()).await
    }

    /// Whether `name` is taken, ignoring case
    pub async fn player_exists(&self, name: &str) -> LeaderboardResult<bool> {
        Ok(self.player_by_name(name).await?.is_some())
    }

    /// Receive every change made through this manager from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LeaderboardEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: LeaderboardEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::{InMemoryLeaderboard, PlayerId};

    fn manager() -> LeaderboardManager {
        LeaderboardManager::new(Arc::new(InMemoryLeaderboard::seeded()))
    }

    #[tokio::test]
    async fn test_zero_score_ignored() {
        let lb = manager();
        let outcome = lb.submit_score("Newcomer", 0, None).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert!(!lb.player_exists("Newcomer").await.unwrap());
    }

    #[tokio::test]
    async fn test_zero_score_does_not_touch_existing() {
        let lb = manager();
        lb.submit_score("PixelMaster", 0, None).await.unwrap();
        let entry = lb.player_by_name("PixelMaster").await.unwrap().unwrap();
        assert_eq!(entry.score, 12);
    }

    #[tokio::test]
    async fn test_negative_score_rejected() {
        let lb = manager();
        let err = lb.submit_score("Ana", -1, None).await.unwrap_err();
        assert!(matches!(err, LeaderboardError::InvalidScore(-1)));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let lb = manager();
        let err = lb.submit_score("   ", 3, None).await.unwrap_err();
        assert!(matches!(err, LeaderboardError::InvalidName(_)));
    }

    #[tokio::test]
    async fn test_new_player_created() {
        let lb = manager();
        let outcome = lb.submit_score("Ana", 4, None).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Created(ref e) if e.score == 4));
        assert!(lb.player_exists("ANA").await.unwrap());
    }

    #[tokio::test]
    async fn test_higher_score_overwrites_case_insensitively() {
        let lb = manager();
        let outcome = lb.submit_score("animewizard", 6, None).await.unwrap();

        match outcome {
            SubmitOutcome::Improved { previous, entry } => {
                assert_eq!(previous, 5);
                assert_eq!(entry.score, 6);
                assert_eq!(entry.name, "AnimeWizard");
            }
            other => panic!("expected Improved, got {other:?}"),
        }
        assert_eq!(lb.players().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_equal_or_lower_score_unchanged() {
        let lb = manager();
        for score in [12, 3] {
            let outcome = lb.submit_score("PixelMaster", score, None).await.unwrap();
            assert!(matches!(outcome, SubmitOutcome::Unchanged(ref e) if e.score == 12));
        }
    }

    #[tokio::test]
    async fn test_scoreboard_top_five() {
        let lb = manager();
        lb.submit_score("Ana", 20, None).await.unwrap();

        let board = lb.scoreboard().await.unwrap();
        assert_eq!(board.len(), DEFAULT_TOP_PLAYERS);
        assert_eq!(board[0].name, "Ana");
        assert!(board.iter().all(|e| e.name != "AnimeWizard"));
    }

    #[tokio::test]
    async fn test_subscribers_see_writes_only() {
        let lb = manager();
        let mut rx = lb.subscribe();

        lb.submit_score("Ana", 2, None).await.unwrap();
        lb.submit_score("Ana", 1, None).await.unwrap();
        lb.submit_score("Ana", 7, None).await.unwrap();
        lb.submit_score("Ana", 0, None).await.unwrap();

        assert!(matches!(rx.recv().await.unwrap(), LeaderboardEvent::Insert(ref e) if e.score == 2));
        assert!(matches!(rx.recv().await.unwrap(), LeaderboardEvent::Update(ref e) if e.score == 7));
        assert!(rx.try_recv().is_err());
    }

    /// Reads a stale score, as a second client would before another
    /// finish lands
    struct StaleReads(InMemoryLeaderboard);

    #[async_trait::async_trait]
    impl LeaderboardRepository for StaleReads {
        async fn find_by_name(&self, name: &str) -> LeaderboardResult<Option<LeaderboardEntry>> {
            let found = self.0.find_by_name(name).await?;
            Ok(found.map(|entry| LeaderboardEntry { score: 1, ..entry }))
        }

        async fn find_by_id(
            &self,
            id: PlayerId,
        ) -> LeaderboardResult<Option<LeaderboardEntry>> {
            self.0.find_by_id(id).await
        }

        async fn insert(
            &self,
            name: &str,
            score: i64,
            user_id: Option<&str>,
        ) -> LeaderboardResult<LeaderboardEntry> {
            self.0.insert(name, score, user_id).await
        }

        async fn raise_score(
            &self,
            id: PlayerId,
            score: i64,
            user_id: Option<&str>,
        ) -> LeaderboardResult<Option<LeaderboardEntry>> {
            self.0.raise_score(id, score, user_id).await
        }

        async fn list(&self, limit: Option<usize>) -> LeaderboardResult<Vec<LeaderboardEntry>> {
            self.0.list(limit).await
        }
    }

    #[tokio::test]
    async fn test_stale_read_never_lowers_score() {
        let lb = LeaderboardManager::new(Arc::new(StaleReads(InMemoryLeaderboard::seeded())));
        let mut rx = lb.subscribe();

        let outcome = lb.submit_score("PixelMaster", 5, None).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Unchanged(ref e) if e.score == 12));
        assert_eq!(lb.scoreboard().await.unwrap()[0].score, 12);
        assert!(rx.try_recv().is_err());
    }
}
