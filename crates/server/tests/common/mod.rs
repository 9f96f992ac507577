//! Common test utilities for in-process API testing.
//!
//! This module provides a test fixture that builds the router over a real
//! file-backed store in a temp dir, with the vote channel and status feed
//! exposed so tests can observe and drive them.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::watch;
use tower::ServiceExt;

use artbattle_core::config::{DatabaseConfig, DisplayConfig};
use artbattle_core::{
    vote_channel, Artwork, ArtworkQueries, ArtworkRepository, Broadcaster, Config, NewArtwork,
    OrchestratorStatus, SqliteArtworkStore, VoteReceiver,
};

/// Test fixture for API testing.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    pub store: Arc<SqliteArtworkStore>,
    pub broadcaster: Broadcaster,
    /// Receiving end of the vote channel the router feeds
    pub votes: VoteReceiver,
    /// Drives what `/api/v1/status` reports
    pub status: watch::Sender<OrchestratorStatus>,
    /// Temporary directory for database, images and display assets
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let images_dir = temp_dir.path().join("images");
        let assets_dir = temp_dir.path().join("display");

        std::fs::create_dir_all(&images_dir).expect("Failed to create images dir");
        std::fs::create_dir_all(&assets_dir).expect("Failed to create assets dir");
        std::fs::write(images_dir.join("dragon.jpg"), b"jpeg bytes").unwrap();
        std::fs::write(assets_dir.join("index.html"), "<html>show</html>").unwrap();

        let config = Config {
            database: DatabaseConfig { path: db_path.clone() },
            display: DisplayConfig {
                images_dir,
                assets_dir,
                ..Default::default()
            },
            ..Default::default()
        };

        let store = Arc::new(SqliteArtworkStore::new(&db_path).expect("Failed to create store"));
        let broadcaster = Broadcaster::default();
        let (vote_sender, votes) = vote_channel();
        let (status, status_rx) = watch::channel(OrchestratorStatus::default());

        let repository: Arc<dyn ArtworkRepository> = store.clone();
        let state = Arc::new(artbattle_server::state::AppState::new(
            config,
            repository,
            broadcaster.clone(),
            vote_sender,
            status_rx,
        ));

        let router = artbattle_server::api::create_router(state);

        Self {
            router,
            store,
            broadcaster,
            votes,
            status,
            temp_dir,
        }
    }

    pub fn add_artwork(&self, name: &str, rating: i32) -> Artwork {
        self.store
            .insert_artwork(
                NewArtwork::new(name, "Artist", "Hall A", format!("{}.jpg", name))
                    .with_rating(rating),
            )
            .expect("Failed to insert artwork")
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}
