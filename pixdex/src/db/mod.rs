//! PostgreSQL storage for the leaderboard.
//!
//! [`Database::connect`] opens the pool, creates the `players` table if
//! needed and checks the server answers before any game relies on it.

use log::info;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::{sync::Arc, time::Duration};

pub mod config;
pub mod timeouts;

pub use config::DatabaseConfig;

use crate::leaderboard::PgLeaderboard;
use timeouts::{TimeoutResult, with_default_timeout, with_timeout};

const PLAYERS_SCHEMA: &str = include_str!("../../migrations/0001_players.sql");

/// Leaderboard database
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect, apply the schema and ping.
    ///
    /// # Errors
    ///
    /// * `TimeoutError::Timeout` - Server did not answer within the
    ///   configured connection timeout
    /// * `TimeoutError::Database` - Connection or schema failure
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pixdex::{db::{Database, DatabaseConfig}, leaderboard::LeaderboardManager};
    /// use std::sync::Arc;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let config = DatabaseConfig::from_env().unwrap_or_default();
    ///     let db = Database::connect(&config).await?;
    ///     let leaderboard = LeaderboardManager::new(Arc::new(db.leaderboard()));
    ///     println!("{} players", leaderboard.players().await?.len());
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(config: &DatabaseConfig) -> TimeoutResult<Self> {
        let connect_timeout = Duration::from_secs(config.connection_timeout_secs);
        let pool = with_timeout(
            connect_timeout,
            Self::pool_options(config).connect(&config.database_url),
        )
        .await?;

        let db = Self { pool };
        with_timeout(connect_timeout, sqlx::raw_sql(PLAYERS_SCHEMA).execute(&db.pool)).await?;
        db.ping().await?;

        info!(
            "Leaderboard database ready (pool {}..{})",
            config.min_connections, config.max_connections
        );
        Ok(db)
    }

    /// Pool that connects on first use; nothing is checked up front.
    ///
    /// # Errors
    ///
    /// * `sqlx::Error::Configuration` - Malformed database URL
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = Self::pool_options(config).connect_lazy(&config.database_url)?;
        Ok(Self { pool })
    }

    fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Leaderboard repository sharing this pool
    pub fn leaderboard(&self) -> PgLeaderboard {
        PgLeaderboard::new(Arc::new(self.pool.clone()))
    }

    /// Round trip to the server
    pub async fn ping(&self) -> TimeoutResult<()> {
        with_default_timeout(sqlx::query("SELECT 1").execute(&self.pool)).await?;
        Ok(())
    }

    /// Close every connection; pending score writes fail afterwards
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::timeouts::TimeoutError,
        leaderboard::{LeaderboardError, LeaderboardRepository},
    };

    fn unreachable() -> DatabaseConfig {
        DatabaseConfig {
            // Port 1 refuses connections
            database_url: "postgres://pixdex@127.0.0.1:1/pixdex".to_string(),
            max_connections: 1,
            min_connections: 0,
            connection_timeout_secs: 1,
            ..DatabaseConfig::development()
        }
    }

    #[test]
    fn test_connect_lazy_rejects_malformed_url() {
        let config = DatabaseConfig {
            database_url: "not a url".to_string(),
            ..DatabaseConfig::development()
        };
        assert!(Database::connect_lazy(&config).is_err());
    }

    #[tokio::test]
    async fn test_ping_fails_without_server() {
        let db = Database::connect_lazy(&unreachable()).unwrap();
        let err = db.ping().await.unwrap_err();
        assert!(matches!(err, TimeoutError::Database(_) | TimeoutError::Timeout(_)));
        db.close().await;
    }

    #[tokio::test]
    async fn test_leaderboard_errors_without_server() {
        let db = Database::connect_lazy(&unreachable()).unwrap();
        let err = db.leaderboard().list(Some(5)).await.unwrap_err();
        assert!(matches!(
            err,
            LeaderboardError::Database(_) | LeaderboardError::Unavailable(_)
        ));
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL"]
    async fn test_connect_applies_schema() {
        let config = DatabaseConfig::from_env().unwrap_or_default();
        let db = Database::connect(&config).await.expect("Failed to connect");

        let repo = db.leaderboard();
        let name = format!("schema-check-{}", uuid::Uuid::new_v4());
        let entry = repo.insert(&name, 2, None).await.unwrap();
        assert!(repo.raise_score(entry.id, 1, None).await.unwrap().is_none());
        assert_eq!(repo.raise_score(entry.id, 5, None).await.unwrap().unwrap().score, 5);

        sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(entry.id)
            .execute(db.pool())
            .await
            .unwrap();
        db.close().await;
    }
}
