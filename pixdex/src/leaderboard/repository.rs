//! Leaderboard storage behind a trait, with PostgreSQL and in-memory
//! implementations.
#![allow(clippy::needless_raw_string_hashes)]

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::db::timeouts::with_default_timeout;

use super::{
    errors::LeaderboardResult,
    models::{LeaderboardEntry, PlayerId},
};

/// Trait for leaderboard storage operations
#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// Find a player by name, ignoring case
    async fn find_by_name(&self, name: &str) -> LeaderboardResult<Option<LeaderboardEntry>>;

    /// Find a player by ID
    async fn find_by_id(&self, id: PlayerId) -> LeaderboardResult<Option<LeaderboardEntry>>;

    /// Create a new player entry
    async fn insert(
        &self,
        name: &str,
        score: i64,
        user_id: Option<&str>,
    ) -> LeaderboardResult<LeaderboardEntry>;

    /// Set a player's score if it is strictly higher than the stored one,
    /// checked and written in one step. `None` when nothing was written.
    async fn raise_score(
        &self,
        id: PlayerId,
        score: i64,
        user_id: Option<&str>,
    ) -> LeaderboardResult<Option<LeaderboardEntry>>;

    /// Players by score, highest first
    async fn list(&self, limit: Option<usize>) -> LeaderboardResult<Vec<LeaderboardEntry>>;
}

/// PostgreSQL implementation of `LeaderboardRepository` over the `players`
/// table
#[derive(Clone)]
pub struct PgLeaderboard {
    pool: Arc<PgPool>,
}

impl PgLeaderboard {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    fn entry_from_row(row: &PgRow) -> LeaderboardEntry {
        LeaderboardEntry {
            id: row.get("id"),
            name: row.get("name"),
            score: row.get("score"),
            user_id: row.get("user_id"),
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
            updated_at: row.get::<chrono::NaiveDateTime, _>("updated_at").and_utc(),
        }
    }
}

#[async_trait]
impl LeaderboardRepository for PgLeaderboard {
    async fn find_by_name(&self, name: &str) -> LeaderboardResult<Option<LeaderboardEntry>> {
        let query = sqlx::query(
            r#"
            SELECT id, name, score, user_id, created_at, updated_at
            FROM players
            WHERE LOWER(name) = LOWER($1)
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool.as_ref());
        let row = with_default_timeout(query).await?;

        Ok(row.as_ref().map(Self::entry_from_row))
    }

    async fn find_by_id(&self, id: PlayerId) -> LeaderboardResult<Option<LeaderboardEntry>> {
        let query = sqlx::query(
            r#"
            SELECT id, name, score, user_id, created_at, updated_at
            FROM players
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref());
        let row = with_default_timeout(query).await?;

        Ok(row.as_ref().map(Self::entry_from_row))
    }

    async fn insert(
        &self,
        name: &str,
        score: i64,
        user_id: Option<&str>,
    ) -> LeaderboardResult<LeaderboardEntry> {
        let query = sqlx::query(
            r#"
            INSERT INTO players (name, score, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, score, user_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(score)
        .bind(user_id)
        .fetch_one(self.pool.as_ref());
        let row = with_default_timeout(query).await?;

        Ok(Self::entry_from_row(&row))
    }

    async fn raise_score(
        &self,
        id: PlayerId,
        score: i64,
        user_id: Option<&str>,
    ) -> LeaderboardResult<Option<LeaderboardEntry>> {
        let query = sqlx::query(
            r#"
            UPDATE players
            SET score = $2, user_id = COALESCE($3, user_id), updated_at = NOW()
            WHERE id = $1 AND score < $2
            RETURNING id, name, score, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(score)
        .bind(user_id)
        .fetch_optional(self.pool.as_ref());
        let row = with_default_timeout(query).await?;

        Ok(row.as_ref().map(Self::entry_from_row))
    }

    async fn list(&self, limit: Option<usize>) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        // NULL limit means no limit in PostgreSQL
        let limit = limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX));
        let query = sqlx::query(
            r#"
            SELECT id, name, score, user_id, created_at, updated_at
            FROM players
            ORDER BY score DESC, id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref());
        let rows = with_default_timeout(query).await?;

        Ok(rows.iter().map(Self::entry_from_row).collect())
    }
}

/// In-memory implementation of `LeaderboardRepository`, for offline play
/// and tests
#[derive(Default)]
pub struct InMemoryLeaderboard {
    entries: RwLock<Vec<LeaderboardEntry>>,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given `(name, score)` rows, IDs assigned in order.
    pub fn with_players<'a>(players: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        let now = Utc::now();
        let entries = players
            .into_iter()
            .zip(1..)
            .map(|((name, score), id)| LeaderboardEntry {
                id,
                name: name.to_string(),
                score,
                user_id: None,
                created_at: now,
                updated_at: now,
            })
            .collect();

        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Demo scoreboard shown before anyone has played.
    pub fn seeded() -> Self {
        Self::with_players([
            ("PixelMaster", 12),
            ("NinjaGamer", 10),
            ("MediaGuru", 8),
            ("TVFanatic", 7),
            ("AnimeWizard", 5),
        ])
    }
}

#[async_trait]
impl LeaderboardRepository for InMemoryLeaderboard {
    async fn find_by_name(&self, name: &str) -> LeaderboardResult<Option<LeaderboardEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| e.name_matches(name)).cloned())
    }

    async fn find_by_id(&self, id: PlayerId) -> LeaderboardResult<Option<LeaderboardEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| e.id == id).cloned())
    }

    async fn insert(
        &self,
        name: &str,
        score: i64,
        user_id: Option<&str>,
    ) -> LeaderboardResult<LeaderboardEntry> {
        let mut entries = self.entries.write().await;
        let id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let entry = LeaderboardEntry {
            id,
            name: name.to_string(),
            score,
            user_id: user_id.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn raise_score(
        &self,
        id: PlayerId,
        score: i64,
        user_id: Option<&str>,
    ) -> LeaderboardResult<Option<LeaderboardEntry>> {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.iter_mut().find(|e| e.id == id && e.score < score) else {
            return Ok(None);
        };

        entry.score = score;
        if let Some(user_id) = user_id {
            entry.user_id = Some(user_id.to_string());
        }
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn list(&self, limit: Option<usize>) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        let mut entries = self.entries.read().await.clone();
        entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let repo = InMemoryLeaderboard::new();

        let first = repo.insert("Ana", 3, None).await.unwrap();
        let second = repo.insert("Luis", 1, Some("user-1")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.user_id.as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_find_by_name_ignores_case() {
        let repo = InMemoryLeaderboard::seeded();

        let found = repo.find_by_name("pixelmaster").await.unwrap();
        assert_eq!(found.unwrap().score, 12);
        assert!(repo.find_by_name("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_sorted_and_limited() {
        let repo = InMemoryLeaderboard::with_players([("a", 1), ("b", 9), ("c", 5), ("d", 9)]);

        let top = repo.list(Some(3)).await.unwrap();
        let names: Vec<_> = top.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "c"]);

        assert_eq!(repo.list(None).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_raise_score_keeps_user_when_none() {
        let repo = InMemoryLeaderboard::new();
        let entry = repo.insert("Ana", 3, Some("user-1")).await.unwrap();

        let updated = repo.raise_score(entry.id, 8, None).await.unwrap().unwrap();
        assert_eq!(updated.score, 8);
        assert_eq!(updated.user_id.as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_raise_score_never_lowers() {
        let repo = InMemoryLeaderboard::seeded();

        assert!(repo.raise_score(1, 12, None).await.unwrap().is_none());
        assert!(repo.raise_score(1, 4, None).await.unwrap().is_none());
        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().score, 12);
    }

    #[tokio::test]
    async fn test_raise_missing_player() {
        let repo = InMemoryLeaderboard::new();
        assert!(repo.raise_score(42, 1, None).await.unwrap().is_none());
    }
}
