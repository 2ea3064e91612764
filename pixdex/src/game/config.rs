//! Game host configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::constants::DEFAULT_INTERMISSION;
use crate::db::config::parse_env_or;

/// Settings for a hosted game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Pause between solving a title and revealing the next one
    pub intermission: Duration,

    /// Seed for target selection; random when `None`
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Create configuration from environment variables
    ///
    /// - `PIXDEX_INTERMISSION_MS`: Pause before the next title (default: 1000)
    /// - `PIXDEX_SEED`: Fixed seed for target selection (default: random)
    pub fn from_env() -> Self {
        let default_ms = u64::try_from(DEFAULT_INTERMISSION.as_millis()).unwrap_or(1000);
        Self {
            intermission: Duration::from_millis(parse_env_or("PIXDEX_INTERMISSION_MS", default_ms)),
            seed: std::env::var("PIXDEX_SEED").ok().and_then(|s| s.parse().ok()),
        }
    }

    #[must_use]
    pub fn with_intermission(mut self, intermission: Duration) -> Self {
        self.intermission = intermission;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            intermission: DEFAULT_INTERMISSION,
            seed: None,
        }
    }
}
