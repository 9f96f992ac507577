//! Duel orchestrator implementation.
//!
//! One control task owns all duel state and drives the loop:
//! - **Duel**: present a pair, wait for a vote or the timeout
//! - **Decision** / **Timeout**: show the outcome
//! - **Leaderboard** / **SplashScreen**: interludes after an unanswered duel
//! - **Error**: show the failure banner, cool down, resume at Duel

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::artwork::{Artwork, ArtworkRepository};
use crate::broadcast::{
    BroadcastMessage, Broadcaster, DuelPayload, ErrorPayload, LeaderboardPayload, SplashPayload,
};
use crate::decision::DecisionProcessor;
use crate::input::{VoteReceiver, VoteToken};
use crate::matchmaking::ContenderSelector;
use crate::metrics;

use super::config::OrchestratorConfig;
use super::types::{transition, DuelError, OrchestratorStatus, Phase, PhaseOutcome};

/// How long `stop` waits for the loop to reach a phase boundary.
const STOP_GRACE: Duration = Duration::from_secs(1);

/// The duel loop's single owner of phase state.
pub struct DuelOrchestrator {
    config: OrchestratorConfig,
    repository: Arc<dyn ArtworkRepository>,
    broadcaster: Broadcaster,
    votes: VoteReceiver,
    selector: ContenderSelector,
    decisions: DecisionProcessor,

    // Runtime state
    phase: Phase,
    in_play: Option<(Artwork, Artwork)>,
    pending_vote: Option<VoteToken>,
    last_error: Option<String>,
    status_tx: watch::Sender<OrchestratorStatus>,
}

impl DuelOrchestrator {
    /// Create a new orchestrator in the Start phase.
    pub fn new(
        config: OrchestratorConfig,
        repository: Arc<dyn ArtworkRepository>,
        broadcaster: Broadcaster,
        votes: VoteReceiver,
    ) -> Self {
        let (status_tx, _) = watch::channel(OrchestratorStatus::default());

        Self {
            selector: ContenderSelector::new(config.pool_size),
            decisions: DecisionProcessor::new(config.k_factor),
            config,
            repository,
            broadcaster,
            votes,
            phase: Phase::Start,
            in_play: None,
            pending_vote: None,
            last_error: None,
            status_tx,
        }
    }

    /// Use a seeded opponent choice.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.selector = ContenderSelector::seeded(self.config.pool_size, seed);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The pair currently on screen.
    pub fn in_play(&self) -> Option<&(Artwork, Artwork)> {
        self.in_play.as_ref()
    }

    /// Subscribe to status snapshots.
    pub fn status(&self) -> watch::Receiver<OrchestratorStatus> {
        self.status_tx.subscribe()
    }

    /// Run the current phase to completion and move to the next one.
    pub async fn step(&mut self) -> Phase {
        let from = self.phase;
        let outcome = match self.run_phase().await {
            Ok(outcome) => outcome,
            Err(e) => self.fail(e),
        };

        let to = transition(from, outcome);
        metrics::PHASE_TRANSITIONS
            .with_label_values(&[from.as_str(), to.as_str()])
            .inc();
        info!("Phase {} -> {}", from, to);

        self.phase = to;
        self.publish();
        to
    }

    /// Spawn the control task.
    ///
    /// Shutdown is checked between phases only. Dropping the handle also stops
    /// the loop at the next boundary.
    pub fn start(mut self) -> OrchestratorHandle {
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
        let status = self.status();

        let task = tokio::spawn(async move {
            info!("Duel loop started");
            loop {
                if !matches!(shutdown_rx.try_recv(), Err(TryRecvError::Empty)) {
                    info!("Duel loop received shutdown signal");
                    break;
                }
                self.step().await;
            }
            info!("Duel loop stopped");
        });

        OrchestratorHandle {
            shutdown_tx,
            task,
            status,
        }
    }

    async fn run_phase(&mut self) -> Result<PhaseOutcome, DuelError> {
        match self.phase {
            Phase::Start => Ok(PhaseOutcome::Entered),
            Phase::Duel => self.present_duel().await,
            Phase::Decision => self.decide().await,
            Phase::Timeout => self.show_timeout().await,
            Phase::Leaderboard => self.show_leaderboard().await,
            Phase::SplashScreen => self.show_splash().await,
            Phase::Error => Ok(self.show_error().await),
        }
    }

    async fn present_duel(&mut self) -> Result<PhaseOutcome, DuelError> {
        self.in_play = None;
        self.pending_vote = None;

        let (one, two) = self.selector.select_duel(self.repository.as_ref())?;
        let message = BroadcastMessage::Duel(DuelPayload::new(&one, &two)).encode()?;

        info!(one = one.id, two = two.id, "Presenting duel");
        self.in_play = Some((one, two));
        self.publish();
        self.broadcaster.send(message);

        self.votes.drain();
        match self
            .votes
            .try_receive_vote(self.config.timings.duel_timeout())
            .await
        {
            Some(vote) => {
                debug!(vote = %vote, "Vote received");
                self.pending_vote = Some(vote);
                Ok(PhaseOutcome::VoteReceived)
            }
            None => {
                debug!("Duel timed out without a vote");
                Ok(PhaseOutcome::VoteTimedOut)
            }
        }
    }

    async fn decide(&mut self) -> Result<PhaseOutcome, DuelError> {
        let (Some((one, two)), Some(vote)) = (self.in_play.as_ref(), self.pending_vote.take())
        else {
            warn!("Decision phase without a duel and vote, resetting");
            return Ok(PhaseOutcome::Entered);
        };

        let outcome = self
            .decisions
            .process(self.repository.as_ref(), one, two, vote)?;
        let message = BroadcastMessage::Decision(outcome.to_payload()).encode()?;

        self.in_play = Some((outcome.one, outcome.two));
        self.broadcaster.send(message);
        self.display_wait(self.config.timings.decision_cooldown())
            .await;
        Ok(PhaseOutcome::Completed)
    }

    async fn show_timeout(&mut self) -> Result<PhaseOutcome, DuelError> {
        let Some((one, two)) = self.in_play.as_ref() else {
            warn!("Timeout phase without a duel, resetting");
            return Ok(PhaseOutcome::Entered);
        };

        let message = BroadcastMessage::Timeout(DuelPayload::new(one, two)).encode()?;
        self.broadcaster.send(message);
        self.display_wait(self.config.timings.timeout_display()).await;
        Ok(PhaseOutcome::Completed)
    }

    async fn show_leaderboard(&mut self) -> Result<PhaseOutcome, DuelError> {
        let entries = self.repository.leaderboard(self.config.leaderboard_size)?;
        let message = BroadcastMessage::Leaderboard(LeaderboardPayload::new(&entries)).encode()?;

        self.broadcaster.send(message);
        self.display_wait(self.config.timings.leaderboard_duration())
            .await;
        Ok(PhaseOutcome::Completed)
    }

    async fn show_splash(&mut self) -> Result<PhaseOutcome, DuelError> {
        let duel_count = self.repository.total_duel_count()?;
        let message = BroadcastMessage::Splash(SplashPayload { duel_count }).encode()?;

        self.broadcaster.send(message);
        self.display_wait(self.config.timings.splash_duration()).await;
        Ok(PhaseOutcome::Completed)
    }

    async fn show_error(&mut self) -> PhaseOutcome {
        let message = self
            .last_error
            .clone()
            .unwrap_or_else(|| "unknown error".to_string());

        match BroadcastMessage::Error(ErrorPayload { message }).encode() {
            Ok(encoded) => {
                self.broadcaster.send(encoded);
            }
            Err(e) => error!("Failed to encode error banner: {}", e),
        }

        self.display_wait(self.config.timings.error_cooldown()).await;
        self.last_error = None;
        PhaseOutcome::Completed
    }

    /// Hold the current screen for `duration`, or until a press when
    /// `skip_on_press` is set. Stale presses are discarded first.
    async fn display_wait(&mut self, duration: Duration) {
        self.votes.drain();
        if self.config.timings.skip_on_press {
            if let Some(vote) = self.votes.try_receive_vote(duration).await {
                debug!(vote = %vote, "Display wait skipped by press");
            }
        } else {
            tokio::time::sleep(duration).await;
        }
    }

    fn fail(&mut self, err: DuelError) -> PhaseOutcome {
        let message = format!("{} error: {}", self.phase, err);
        error!("{}", message);
        metrics::PHASE_FAILURES
            .with_label_values(&[self.phase.as_str()])
            .inc();
        self.last_error = Some(message);
        PhaseOutcome::Failed
    }

    fn publish(&self) {
        self.status_tx.send_replace(OrchestratorStatus {
            phase: self.phase,
            in_play: self.in_play.as_ref().map(|(one, two)| [one.id, two.id]),
            last_error: self.last_error.clone(),
            updated_at: chrono::Utc::now(),
        });
    }
}

/// Handle to a running duel loop.
pub struct OrchestratorHandle {
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
    status: watch::Receiver<OrchestratorStatus>,
}

impl OrchestratorHandle {
    /// Latest status snapshot.
    pub fn status(&self) -> OrchestratorStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OrchestratorStatus> {
        self.status.clone()
    }

    /// Stop the loop at the next phase boundary.
    ///
    /// If the current phase is still waiting after the grace period the task is
    /// aborted. Waits are its only suspension points, so no repository call is
    /// interrupted.
    pub async fn stop(mut self) {
        info!("Stopping duel loop");
        let _ = self.shutdown_tx.send(());

        if tokio::time::timeout(STOP_GRACE, &mut self.task).await.is_err() {
            debug!("Duel loop still waiting, aborting");
            self.task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::{
        ArtworkQueries, DuelRecord, NewArtwork, RepositoryError, SqliteArtworkStore,
    };
    use crate::broadcast::Subscription;
    use crate::input::{vote_channel, VoteSender, VoteSource};
    use serde_json::Value;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Fault {
        None,
        Leaderboard,
        DuelCount,
        /// Fail the duel log write after both artworks were updated.
        AppendDuel,
    }

    fn injected() -> RepositoryError {
        RepositoryError::Database("disk I/O error".to_string())
    }

    /// SQLite store with switchable failures.
    struct FaultyStore {
        inner: SqliteArtworkStore,
        fault: Mutex<Fault>,
    }

    impl FaultyStore {
        fn inject(&self, fault: Fault) {
            *self.fault.lock().unwrap() = fault;
        }

        fn fails(&self, fault: Fault) -> bool {
            *self.fault.lock().unwrap() == fault
        }
    }

    impl ArtworkQueries for FaultyStore {
        fn artwork(&self, id: i64) -> Result<Artwork, RepositoryError> {
            self.inner.artwork(id)
        }

        fn artwork_by_filename(&self, filename: &str) -> Result<Option<Artwork>, RepositoryError> {
            self.inner.artwork_by_filename(filename)
        }

        fn artwork_with_lowest_duel_count(&self) -> Result<Artwork, RepositoryError> {
            self.inner.artwork_with_lowest_duel_count()
        }

        fn artworks_with_similar_rating(
            &self,
            benchmark: &Artwork,
            count: usize,
        ) -> Result<Vec<Artwork>, RepositoryError> {
            self.inner.artworks_with_similar_rating(benchmark, count)
        }

        fn rank(&self, artwork: &Artwork) -> Result<i64, RepositoryError> {
            self.inner.rank(artwork)
        }

        fn update_artwork(&self, artwork: &Artwork) -> Result<(), RepositoryError> {
            self.inner.update_artwork(artwork)
        }

        fn append_duel(&self, duel: &DuelRecord) -> Result<i64, RepositoryError> {
            self.inner.append_duel(duel)
        }

        fn leaderboard(&self, limit: usize) -> Result<Vec<Artwork>, RepositoryError> {
            if self.fails(Fault::Leaderboard) {
                return Err(injected());
            }
            self.inner.leaderboard(limit)
        }

        fn total_duel_count(&self) -> Result<u64, RepositoryError> {
            if self.fails(Fault::DuelCount) {
                return Err(injected());
            }
            self.inner.total_duel_count()
        }

        fn insert_artwork(&self, artwork: NewArtwork) -> Result<Artwork, RepositoryError> {
            self.inner.insert_artwork(artwork)
        }
    }

    /// Transaction handle whose duel log write fails.
    struct FailingAppend<'a>(&'a dyn ArtworkQueries);

    impl ArtworkQueries for FailingAppend<'_> {
        fn artwork(&self, id: i64) -> Result<Artwork, RepositoryError> {
            self.0.artwork(id)
        }

        fn artwork_by_filename(&self, filename: &str) -> Result<Option<Artwork>, RepositoryError> {
            self.0.artwork_by_filename(filename)
        }

        fn artwork_with_lowest_duel_count(&self) -> Result<Artwork, RepositoryError> {
            self.0.artwork_with_lowest_duel_count()
        }

        fn artworks_with_similar_rating(
            &self,
            benchmark: &Artwork,
            count: usize,
        ) -> Result<Vec<Artwork>, RepositoryError> {
            self.0.artworks_with_similar_rating(benchmark, count)
        }

        fn rank(&self, artwork: &Artwork) -> Result<i64, RepositoryError> {
            self.0.rank(artwork)
        }

        fn update_artwork(&self, artwork: &Artwork) -> Result<(), RepositoryError> {
            self.0.update_artwork(artwork)
        }

        fn append_duel(&self, _duel: &DuelRecord) -> Result<i64, RepositoryError> {
            Err(injected())
        }

        fn leaderboard(&self, limit: usize) -> Result<Vec<Artwork>, RepositoryError> {
            self.0.leaderboard(limit)
        }

        fn total_duel_count(&self) -> Result<u64, RepositoryError> {
            self.0.total_duel_count()
        }

        fn insert_artwork(&self, artwork: NewArtwork) -> Result<Artwork, RepositoryError> {
            self.0.insert_artwork(artwork)
        }
    }

    impl ArtworkRepository for FaultyStore {
        fn run_transaction(
            &self,
            work: &mut dyn FnMut(&dyn ArtworkQueries) -> Result<(), RepositoryError>,
        ) -> Result<(), RepositoryError> {
            if self.fails(Fault::AppendDuel) {
                self.inner
                    .run_transaction(&mut |tx| work(&FailingAppend(tx)))
            } else {
                self.inner.run_transaction(work)
            }
        }
    }

    struct Harness {
        orchestrator: DuelOrchestrator,
        votes: VoteSender,
        display: Subscription,
        store: Arc<FaultyStore>,
    }

    fn harness(artworks: &[(&str, i32)], config: OrchestratorConfig) -> Harness {
        let store = Arc::new(FaultyStore {
            inner: SqliteArtworkStore::in_memory().unwrap(),
            fault: Mutex::new(Fault::None),
        });
        for (name, rating) in artworks {
            store
                .insert_artwork(
                    NewArtwork::new(*name, "Artist", "P1", format!("{}.jpg", name))
                        .with_rating(*rating),
                )
                .unwrap();
        }

        let broadcaster = Broadcaster::default();
        let display = broadcaster.subscribe();
        let (votes, receiver) = vote_channel();
        let repository: Arc<dyn ArtworkRepository> = store.clone();
        let orchestrator =
            DuelOrchestrator::new(config, repository, broadcaster, receiver).with_rng_seed(9);

        Harness {
            orchestrator,
            votes,
            display,
            store,
        }
    }

    fn next_message(display: &mut Subscription) -> (String, Value) {
        let message = display.receiver.try_recv().unwrap();
        let (tag, json) = message.split_once(": ").unwrap();
        (tag.to_string(), serde_json::from_str(json).unwrap())
    }

    async fn step_until(h: &mut Harness, phase: Phase) {
        while h.orchestrator.phase() != phase {
            h.orchestrator.step().await;
        }
    }

    /// Run the Error phase and check the banner, the cooldown and the resume.
    async fn assert_error_cycle(h: &mut Harness, reason_prefix: &str) {
        assert_eq!(h.orchestrator.phase(), Phase::Error);
        let reason = h.orchestrator.status().borrow().last_error.clone().unwrap();
        assert!(reason.starts_with(reason_prefix), "{}", reason);
        assert!(reason.contains("disk I/O error"), "{}", reason);
        assert!(h.display.receiver.try_recv().is_err());

        let started = tokio::time::Instant::now();
        assert_eq!(h.orchestrator.step().await, Phase::Duel);
        assert_eq!(started.elapsed(), Duration::from_secs(30));

        let (tag, error) = next_message(&mut h.display);
        assert_eq!(tag, "ERROR");
        assert_eq!(error["message"], reason.as_str());
        assert!(h.display.receiver.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_moves_to_duel_silently() {
        let mut h = harness(&[("a", 800), ("b", 800)], OrchestratorConfig::default());
        assert_eq!(h.orchestrator.phase(), Phase::Start);

        assert_eq!(h.orchestrator.step().await, Phase::Duel);
        assert!(h.display.receiver.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_duel_cycle() {
        let mut h = harness(&[("a", 800), ("b", 810)], OrchestratorConfig::default());
        h.orchestrator.step().await;

        let started = tokio::time::Instant::now();
        assert_eq!(h.orchestrator.step().await, Phase::Timeout);
        assert_eq!(started.elapsed(), Duration::from_secs(20));
        let (tag, duel) = next_message(&mut h.display);
        assert_eq!(tag, "DUEL");

        assert_eq!(h.orchestrator.step().await, Phase::Leaderboard);
        let (tag, timeout) = next_message(&mut h.display);
        assert_eq!(tag, "TIMEOUT");
        assert_eq!(timeout["one"]["id"], duel["one"]["id"]);
        assert_eq!(timeout["two"]["id"], duel["two"]["id"]);

        assert_eq!(h.orchestrator.step().await, Phase::SplashScreen);
        let (tag, board) = next_message(&mut h.display);
        assert_eq!(tag, "LEADERBOARD");
        assert_eq!(board["count"], 2);
        assert_eq!(board["entries"][0]["rating"], 810);

        assert_eq!(h.orchestrator.step().await, Phase::Duel);
        let (tag, splash) = next_message(&mut h.display);
        assert_eq!(tag, "SPLASH");
        assert_eq!(splash["duelCount"], 0);

        // A timeout never touches duel counts.
        for artwork in h.store.leaderboard(10).unwrap() {
            assert_eq!(artwork.duel_count, 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_vote_resolves_decision() {
        let mut h = harness(&[("a", 800), ("b", 800)], OrchestratorConfig::default());
        h.orchestrator.step().await;

        let votes = h.votes.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            votes.offer(VoteToken::Two, VoteSource::Serial);
        });

        assert_eq!(h.orchestrator.step().await, Phase::Decision);
        let (tag, _) = next_message(&mut h.display);
        assert_eq!(tag, "DUEL");

        assert_eq!(h.orchestrator.step().await, Phase::Duel);
        let (tag, decision) = next_message(&mut h.display);
        assert_eq!(tag, "DECISION");
        assert_eq!(decision["winner"], "two");
        assert_eq!(decision["twoRatingDelta"], 8);
        assert_eq!(decision["oneRatingDelta"], -8);
        assert_eq!(decision["one"]["duelCount"], 1);
        assert_eq!(decision["two"]["duelCount"], 1);

        assert_eq!(h.store.total_duel_count().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_vote_is_drained() {
        let mut h = harness(&[("a", 800), ("b", 800)], OrchestratorConfig::default());
        h.orchestrator.step().await;

        // Pressed during the previous interlude.
        assert!(h.votes.offer(VoteToken::One, VoteSource::Serial));

        assert_eq!(h.orchestrator.step().await, Phase::Timeout);
        assert_eq!(h.store.total_duel_count().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_show_errors_then_recovers() {
        let mut h = harness(&[], OrchestratorConfig::default());
        let status = h.orchestrator.status();
        h.orchestrator.step().await;

        assert_eq!(h.orchestrator.step().await, Phase::Error);
        let snapshot = status.borrow().clone();
        assert_eq!(snapshot.phase, Phase::Error);
        let reason = snapshot.last_error.unwrap();
        assert!(reason.starts_with("duel error:"), "{}", reason);
        assert!(h.orchestrator.in_play().is_none());

        let started = tokio::time::Instant::now();
        assert_eq!(h.orchestrator.step().await, Phase::Duel);
        assert_eq!(started.elapsed(), Duration::from_secs(30));

        let (tag, error) = next_message(&mut h.display);
        assert_eq!(tag, "ERROR");
        assert_eq!(error["message"], reason.as_str());
        assert!(status.borrow().last_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_artwork_has_no_contenders() {
        let mut h = harness(&[("alone", 800)], OrchestratorConfig::default());
        h.orchestrator.step().await;

        assert_eq!(h.orchestrator.step().await, Phase::Error);
        let reason = h.orchestrator.status().borrow().last_error.clone().unwrap();
        assert!(reason.contains("no eligible contenders"), "{}", reason);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_tracks_pair_in_play() {
        let mut h = harness(&[("a", 800), ("b", 800)], OrchestratorConfig::default());
        let status = h.orchestrator.status();
        h.orchestrator.step().await;
        h.orchestrator.step().await;

        let snapshot = status.borrow().clone();
        assert_eq!(snapshot.phase, Phase::Timeout);
        let [one, two] = snapshot.in_play.unwrap();
        assert_ne!(one, two);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_on_press_shortens_display_wait() {
        let mut config = OrchestratorConfig::default();
        config.timings.skip_on_press = true;
        let mut h = harness(&[("a", 800), ("b", 800)], config);
        h.orchestrator.step().await;
        h.orchestrator.step().await;
        h.orchestrator.step().await;
        assert_eq!(h.orchestrator.phase(), Phase::Leaderboard);

        let votes = h.votes.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            votes.offer(VoteToken::One, VoteSource::Remote);
        });

        let started = tokio::time::Instant::now();
        assert_eq!(h.orchestrator.step().await, Phase::SplashScreen);
        assert_eq!(started.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_stop() {
        let h = harness(&[("a", 800), ("b", 800)], OrchestratorConfig::default());
        let handle = h.orchestrator.start();
        let mut status = handle.subscribe();

        loop {
            status.changed().await.unwrap();
            if status.borrow().phase == Phase::Leaderboard {
                break;
            }
        }
        assert_eq!(handle.status().phase, Phase::Leaderboard);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_decision_failure_rolls_back_and_recovers() {
        let mut h = harness(&[("a", 800), ("b", 800)], OrchestratorConfig::default());
        h.orchestrator.step().await;
        h.store.inject(Fault::AppendDuel);

        let votes = h.votes.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            votes.offer(VoteToken::One, VoteSource::Serial);
        });
        assert_eq!(h.orchestrator.step().await, Phase::Decision);
        let (tag, _) = next_message(&mut h.display);
        assert_eq!(tag, "DUEL");

        assert_eq!(h.orchestrator.step().await, Phase::Error);
        h.store.inject(Fault::None);

        // Nothing from the failed decision was kept.
        assert_eq!(h.store.total_duel_count().unwrap(), 0);
        for artwork in h.store.leaderboard(10).unwrap() {
            assert_eq!(artwork.duel_count, 0);
            assert_eq!(artwork.rating, 800);
        }

        assert_error_cycle(&mut h, "decision error:").await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaderboard_failure_shows_error() {
        let mut h = harness(&[("a", 800), ("b", 810)], OrchestratorConfig::default());
        step_until(&mut h, Phase::Leaderboard).await;
        assert_eq!(next_message(&mut h.display).0, "DUEL");
        assert_eq!(next_message(&mut h.display).0, "TIMEOUT");

        h.store.inject(Fault::Leaderboard);
        assert_eq!(h.orchestrator.step().await, Phase::Error);
        h.store.inject(Fault::None);

        assert_error_cycle(&mut h, "leaderboard error:").await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_splash_failure_shows_error() {
        let mut h = harness(&[("a", 800), ("b", 810)], OrchestratorConfig::default());
        step_until(&mut h, Phase::SplashScreen).await;
        assert_eq!(next_message(&mut h.display).0, "DUEL");
        assert_eq!(next_message(&mut h.display).0, "TIMEOUT");
        assert_eq!(next_message(&mut h.display).0, "LEADERBOARD");

        h.store.inject(Fault::DuelCount);
        assert_eq!(h.orchestrator.step().await, Phase::Error);
        h.store.inject(Fault::None);

        assert_error_cycle(&mut h, "splash_screen error:").await;
        for artwork in h.store.leaderboard(10).unwrap() {
            assert_eq!(artwork.duel_count, 0);
        }
    }
}
