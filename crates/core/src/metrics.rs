//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Orchestrator (phase transitions, failures, decisions)
//! - Input channel (votes received and dropped)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Orchestrator Metrics
// =============================================================================

/// Phase transitions by source and target phase.
pub static PHASE_TRANSITIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "artbattle_phase_transitions_total",
            "Total orchestrator phase transitions",
        ),
        &["from", "to"],
    )
    .unwrap()
});

/// Phase failures that forced the Error phase.
pub static PHASE_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "artbattle_phase_failures_total",
            "Total phase failures leading to the error phase",
        ),
        &["phase"], // "duel", "decision", "timeout", "leaderboard", "splash_screen"
    )
    .unwrap()
});

/// Resolved decisions by winning side.
pub static DECISIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("artbattle_decisions_total", "Total resolved duel decisions"),
        &["winner"], // "one", "two"
    )
    .unwrap()
});

/// Rating points moved per decision.
pub static RATING_SWING: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "artbattle_rating_swing_points",
            "Rating points moved by a decision",
        )
        .buckets(vec![1.0, 2.0, 4.0, 8.0, 12.0, 16.0, 24.0, 32.0, 64.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Input Metrics
// =============================================================================

/// Vote presses received by source.
pub static VOTES_RECEIVED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("artbattle_votes_received_total", "Total vote presses received"),
        &["source"], // "serial", "remote"
    )
    .unwrap()
});

/// Presses dropped because the vote slot was occupied.
pub static VOTES_DROPPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "artbattle_votes_dropped_total",
        "Total vote presses dropped while the slot was occupied",
    )
    .unwrap()
});

// =============================================================================
// Registry Helper
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Orchestrator
        Box::new(PHASE_TRANSITIONS.clone()),
        Box::new(PHASE_FAILURES.clone()),
        Box::new(DECISIONS.clone()),
        Box::new(RATING_SWING.clone()),
        // Input
        Box::new(VOTES_RECEIVED.clone()),
        Box::new(VOTES_DROPPED.clone()),
    ]
}
