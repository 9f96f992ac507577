//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the artbattle server:
//! - HTTP request metrics (latency, counts)
//! - WebSocket display connection metrics
//! - Show totals (collected dynamically)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "artbattle_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("artbattle_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "artbattle_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// WebSocket Metrics
// =============================================================================

/// Active WebSocket connections.
pub static WS_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "artbattle_ws_connections_active",
        "Number of active WebSocket connections",
    )
    .unwrap()
});

/// Total WebSocket connections (cumulative).
pub static WS_CONNECTIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "artbattle_ws_connections_total",
        "Total WebSocket connections since startup",
    )
    .unwrap()
});

/// WebSocket messages sent by tag.
pub static WS_MESSAGES_SENT: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("artbattle_ws_messages_sent_total", "WebSocket messages sent"),
        &["tag"],
    )
    .unwrap()
});

/// WebSocket lag events (when client falls behind).
pub static WS_LAG_EVENTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "artbattle_ws_lag_events_total",
        "WebSocket lag events (client fell behind)",
    )
    .unwrap()
});

/// Inbound frames that were not a valid button press.
pub static WS_INVALID_VOTES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "artbattle_ws_invalid_votes_total",
        "Inbound WebSocket frames discarded as invalid votes",
    )
    .unwrap()
});

// =============================================================================
// Show Metrics (collected dynamically)
// =============================================================================

/// Resolved duels in the log.
pub static DUELS_RECORDED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("artbattle_duels_recorded", "Resolved duels in the duel log").unwrap()
});

/// Display clients subscribed to the broadcast.
pub static DISPLAY_CLIENTS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "artbattle_display_clients",
        "Display clients subscribed to the broadcast",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // WebSocket
    registry
        .register(Box::new(WS_CONNECTIONS_ACTIVE.clone()))
        .unwrap();
    registry
        .register(Box::new(WS_CONNECTIONS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(WS_MESSAGES_SENT.clone()))
        .unwrap();
    registry.register(Box::new(WS_LAG_EVENTS.clone())).unwrap();
    registry
        .register(Box::new(WS_INVALID_VOTES.clone()))
        .unwrap();

    // Show
    registry
        .register(Box::new(DUELS_RECORDED.clone()))
        .unwrap();
    registry
        .register(Box::new(DISPLAY_CLIENTS.clone()))
        .unwrap();

    // Core metrics (orchestrator, input)
    for metric in artbattle_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Collect dynamic metrics from current application state.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    if let Ok(count) = state.repository().total_duel_count() {
        DUELS_RECORDED.set(i64::try_from(count).unwrap_or(i64::MAX));
    }
    DISPLAY_CLIENTS.set(state.broadcaster().client_count() as i64);
}

/// Normalize a path for metric labels, so image and asset names don't
/// explode the label set.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with("/api/") || path == "/ws" || path == "/metrics" {
        path.to_string()
    } else if path.starts_with("/images/") {
        "/images/{file}".to_string()
    } else {
        "/{asset}".to_string()
    }
}
