use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use artbattle_core::{
    load_config, validate_config, vote_channel, ArtworkRepository, Broadcaster, DuelOrchestrator,
    OrchestratorConfig, SerialReader, SqliteArtworkStore,
};
use artbattle_server::api::create_router;
use artbattle_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("ARTBATTLE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);

    // Create SQLite artwork repository
    let repository: Arc<dyn ArtworkRepository> = Arc::new(
        SqliteArtworkStore::new(&config.database.path)
            .context("Failed to open artwork database")?
            .with_default_rating(config.rating.default_points),
    );
    info!("Artwork repository initialized");

    let broadcaster = Broadcaster::new(
        artbattle_core::broadcast::DEFAULT_CAPACITY,
        config.display.replay_last_message,
    );
    let (votes, vote_receiver) = vote_channel();

    // Button device reader, if one is attached
    let serial_reader = match &config.serial_port {
        Some(serial) => {
            info!("Reading buttons from {:?}", serial.device_file);
            let reader = SerialReader::new(&serial.device_file, votes.clone())
                .spawn()
                .context("Failed to start button reader")?;
            Some(reader)
        }
        None => {
            info!("No button device configured, accepting remote presses only");
            None
        }
    };

    // Start the duel loop
    let orchestrator = DuelOrchestrator::new(
        OrchestratorConfig::from(&config),
        Arc::clone(&repository),
        broadcaster.clone(),
        vote_receiver,
    );
    let status = orchestrator.status();
    let orchestrator = orchestrator.start();
    info!("Duel orchestrator started");

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        repository,
        broadcaster,
        votes,
        status,
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");

    if let Some(reader) = serial_reader {
        reader.stop();
    }

    orchestrator.stop().await;
    info!("Duel orchestrator stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
