pub mod artwork;
pub mod broadcast;
pub mod config;
pub mod decision;
pub mod input;
pub mod matchmaking;
pub mod metrics;
pub mod orchestrator;
pub mod rating;

pub use artwork::{
    Artwork, ArtworkQueries, ArtworkRepository, DuelRecord, NewArtwork, RepositoryError,
    SqliteArtworkStore, DEFAULT_RATING,
};
pub use broadcast::{BroadcastMessage, Broadcaster, Subscription};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use decision::{DecisionOutcome, DecisionProcessor};
pub use input::{
    parse_button_message, vote_channel, SerialReader, SerialReaderHandle, VoteParseError,
    VoteReceiver, VoteSender, VoteSource, VoteToken,
};
pub use matchmaking::{ContenderSelector, MatchmakingError};
pub use orchestrator::{
    DuelError, DuelOrchestrator, OrchestratorConfig, OrchestratorHandle, OrchestratorStatus,
    Phase,
};
pub use rating::{rating_adjustments, RatingAdjustment};
