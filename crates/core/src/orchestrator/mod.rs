//! Duel orchestrator for the unattended show loop.
//!
//! The orchestrator drives the display through its phases automatically:
//! - **Duel**: two artworks on screen, waiting for a button press
//! - **Decision** / **Timeout**: the result of that wait
//! - **Leaderboard** / **SplashScreen**: interludes after an unanswered duel
//! - **Error**: a visible banner, then automatic recovery

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::{DuelOrchestrator, OrchestratorHandle};
pub use types::{transition, DuelError, OrchestratorStatus, Phase, PhaseOutcome};
