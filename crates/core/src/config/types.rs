use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub serial_port: Option<SerialPortConfig>,
    #[serde(default)]
    pub rating: RatingConfig,
    #[serde(default)]
    pub timings: TimingConfig,
    #[serde(default)]
    pub matchmaking: MatchmakingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    5000
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("artbattle.db")
}

/// Button device configuration.
///
/// The device is read as a plain byte stream (e.g. `/dev/ttyUSB0` already
/// configured with `stty`, or a pty during rehearsals).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SerialPortConfig {
    pub device_file: PathBuf,
}

/// Rating engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RatingConfig {
    /// Rating assigned to newly ingested artworks.
    #[serde(default = "default_points")]
    pub default_points: i32,
    /// Maximum rating swing per decision.
    #[serde(default = "default_k_factor")]
    pub k_factor: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            default_points: default_points(),
            k_factor: default_k_factor(),
        }
    }
}

fn default_points() -> i32 {
    800
}

fn default_k_factor() -> f64 {
    16.0
}

/// Phase durations, all in seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimingConfig {
    /// How long a duel waits for a vote before timing out.
    #[serde(default = "default_duel_secs")]
    pub duel: u64,
    #[serde(default = "default_leaderboard_secs")]
    pub leaderboard: u64,
    #[serde(default = "default_splash_secs")]
    pub splash_screen: u64,
    /// Cooldown after a decision is shown.
    #[serde(default = "default_decision_secs")]
    pub decision: u64,
    /// How long the timeout notice stays up.
    #[serde(default = "default_timeout_secs")]
    pub timeout: u64,
    /// Cooldown after an error banner before the show resumes.
    #[serde(default = "default_error_secs")]
    pub error: u64,
    /// End display waits early when a button is pressed.
    #[serde(default)]
    pub skip_on_press: bool,
}

impl TimingConfig {
    pub fn duel_timeout(&self) -> Duration {
        Duration::from_secs(self.duel)
    }

    pub fn leaderboard_duration(&self) -> Duration {
        Duration::from_secs(self.leaderboard)
    }

    pub fn splash_duration(&self) -> Duration {
        Duration::from_secs(self.splash_screen)
    }

    pub fn decision_cooldown(&self) -> Duration {
        Duration::from_secs(self.decision)
    }

    pub fn timeout_display(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn error_cooldown(&self) -> Duration {
        Duration::from_secs(self.error)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            duel: default_duel_secs(),
            leaderboard: default_leaderboard_secs(),
            splash_screen: default_splash_secs(),
            decision: default_decision_secs(),
            timeout: default_timeout_secs(),
            error: default_error_secs(),
            skip_on_press: false,
        }
    }
}

fn default_duel_secs() -> u64 {
    20
}

fn default_leaderboard_secs() -> u64 {
    15
}

fn default_splash_secs() -> u64 {
    15
}

fn default_decision_secs() -> u64 {
    5
}

fn default_timeout_secs() -> u64 {
    3
}

fn default_error_secs() -> u64 {
    30
}

/// Contender selection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchmakingConfig {
    /// Size of the contender pool drawn around the benchmark rating.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl Default for MatchmakingConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
        }
    }
}

fn default_pool_size() -> usize {
    50
}

/// Display client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Number of entries shown on the leaderboard.
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
    /// Directory holding the display front-end.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    /// Directory the artwork filenames are relative to.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
    /// Send the last broadcast message to clients as soon as they connect.
    #[serde(default)]
    pub replay_last_message: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            leaderboard_size: default_leaderboard_size(),
            assets_dir: default_assets_dir(),
            images_dir: default_images_dir(),
            replay_last_message: false,
        }
    }
}

fn default_leaderboard_size() -> usize {
    10
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("display")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

/// Config view for API responses (filesystem layout only, no device paths)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub serial_port_configured: bool,
    pub rating: RatingConfig,
    pub timings: TimingConfig,
    pub matchmaking: MatchmakingConfig,
    pub leaderboard_size: usize,
    pub replay_last_message: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            serial_port_configured: config.serial_port.is_some(),
            rating: config.rating.clone(),
            timings: config.timings.clone(),
            matchmaking: config.matchmaking.clone(),
            leaderboard_size: config.display.leaderboard_size,
            replay_last_message: config.display.replay_last_message,
        }
    }
}
