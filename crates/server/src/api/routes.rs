use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::{handlers, middleware::metrics_middleware, ws};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let display = &state.config().display;
    let images_dir = display.images_dir.clone();
    let assets_dir = display.assets_dir.clone();

    // API routes
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/status", get(handlers::get_status))
        .with_state(state.clone());

    // Display front-end with SPA fallback
    let index_path = assets_dir.join("index.html");
    let serve_assets = ServeDir::new(&assets_dir).fallback(ServeFile::new(index_path));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/ws", get(ws::ws_handler))
        .route("/metrics", get(handlers::get_metrics))
        .with_state(state)
        .nest_service("/images", ServeDir::new(images_dir))
        .fallback_service(serve_assets)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
