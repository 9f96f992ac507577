//! Types for the duel orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artwork::RepositoryError;
use crate::matchmaking::MatchmakingError;

/// Position in the duel loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Start,
    Duel,
    Decision,
    Timeout,
    Leaderboard,
    SplashScreen,
    Error,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Duel => "duel",
            Self::Decision => "decision",
            Self::Timeout => "timeout",
            Self::Leaderboard => "leaderboard",
            Self::SplashScreen => "splash_screen",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// The phase has nothing to do (Start, or Decision without a vote).
    Entered,
    VoteReceived,
    VoteTimedOut,
    Completed,
    Failed,
}

/// The duel loop's state machine.
pub fn transition(phase: Phase, outcome: PhaseOutcome) -> Phase {
    use PhaseOutcome::*;

    match (phase, outcome) {
        (Phase::Error, _) => Phase::Duel,
        (Phase::Start, _) => Phase::Duel,
        (_, Failed) => Phase::Error,
        (Phase::Duel, VoteReceived) => Phase::Decision,
        (Phase::Duel, VoteTimedOut) => Phase::Timeout,
        (Phase::Decision, Completed) => Phase::Duel,
        (Phase::Timeout, Completed) => Phase::Leaderboard,
        (Phase::Leaderboard, Completed) => Phase::SplashScreen,
        (Phase::SplashScreen, Completed) => Phase::Duel,
        _ => Phase::Duel,
    }
}

/// A phase failure. Its message is what the error banner shows.
#[derive(Debug, Error)]
pub enum DuelError {
    #[error("repository failure: {0}")]
    Repository(#[from] RepositoryError),

    #[error("no eligible contenders for artwork {0}")]
    NoContendersAvailable(i64),

    #[error("message encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl From<MatchmakingError> for DuelError {
    fn from(err: MatchmakingError) -> Self {
        match err {
            MatchmakingError::NoContendersAvailable(id) => Self::NoContendersAvailable(id),
            MatchmakingError::Repository(e) => Self::Repository(e),
        }
    }
}

/// Snapshot of the duel loop, published after every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorStatus {
    pub phase: Phase,
    /// Ids of the pair on screen, `[one, two]`.
    pub in_play: Option<[i64; 2]>,
    pub last_error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Default for OrchestratorStatus {
    fn default() -> Self {
        Self {
            phase: Phase::Start,
            in_play: None,
            last_error: None,
            updated_at: Utc::now(),
        }
    }
}
