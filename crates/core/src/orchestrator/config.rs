//! Orchestrator configuration.

use crate::config::{Config, TimingConfig};
use crate::matchmaking::DEFAULT_POOL_SIZE;

/// The slice of [`Config`] the duel loop runs on.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub timings: TimingConfig,
    /// Contender pool size for matchmaking.
    pub pool_size: usize,
    /// Entries shown on the leaderboard.
    pub leaderboard_size: usize,
    pub k_factor: f64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            timings: TimingConfig::default(),
            pool_size: DEFAULT_POOL_SIZE,
            leaderboard_size: 10,
            k_factor: 16.0,
        }
    }
}

impl From<&Config> for OrchestratorConfig {
    fn from(config: &Config) -> Self {
        Self {
            timings: config.timings.clone(),
            pool_size: config.matchmaking.pool_size,
            leaderboard_size: config.display.leaderboard_size,
            k_factor: config.rating.k_factor,
        }
    }
}
