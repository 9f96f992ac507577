use std::sync::Arc;

use artbattle_core::{
    ArtworkRepository, Broadcaster, Config, OrchestratorStatus, SanitizedConfig, VoteSender,
};
use tokio::sync::watch;

/// Shared application state
pub struct AppState {
    config: Config,
    repository: Arc<dyn ArtworkRepository>,
    broadcaster: Broadcaster,
    votes: VoteSender,
    status: watch::Receiver<OrchestratorStatus>,
}

impl AppState {
    pub fn new(
        config: Config,
        repository: Arc<dyn ArtworkRepository>,
        broadcaster: Broadcaster,
        votes: VoteSender,
        status: watch::Receiver<OrchestratorStatus>,
    ) -> Self {
        Self {
            config,
            repository,
            broadcaster,
            votes,
            status,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &dyn ArtworkRepository {
        self.repository.as_ref()
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    pub fn votes(&self) -> &VoteSender {
        &self.votes
    }

    /// Latest orchestrator status snapshot.
    pub fn orchestrator_status(&self) -> OrchestratorStatus {
        self.status.borrow().clone()
    }
}
