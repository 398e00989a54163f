//! Prometheus metrics for the pulse dashboard.
//!
//! Covers:
//! - Stream connection state and reconnects
//! - Tick reconciliation (processed / ignored / undecodable)
//! - Flash cues and audible alerts
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A registration failure means a
//! duplicate metric name, which is a startup bug; these panics only occur
//! during static initialization, never at runtime.

use crate::error::TelemetryResult;
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge, register_gauge_vec, register_int_counter,
    register_int_gauge, CounterVec, Encoder, Gauge, GaugeVec, IntCounter, IntGauge, TextEncoder,
};

/// Stream connection state (1 = open, 0 = not open).
pub static WS_CONNECTED: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!("pulse_ws_connected", "Ticker stream connection state (1=open)").unwrap()
});

/// Stream state machine current state.
/// Labels: state (connecting/open/closed)
pub static WS_STATE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "pulse_ws_state",
        "Ticker stream current state (1=active, 0=inactive)",
        &["state"]
    )
    .unwrap()
});

/// Total reconnection attempts.
pub static WS_RECONNECT_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pulse_ws_reconnect_total",
        "Total ticker stream reconnection attempts",
        &["reason"]
    )
    .unwrap()
});

/// Frames dropped because they could not be decoded.
pub static WS_DECODE_ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pulse_ws_decode_errors_total",
        "Inbound frames dropped as undecodable",
        &["kind"]
    )
    .unwrap()
});

/// Ticks merged into the store.
pub static TICKS_PROCESSED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "pulse_ticks_processed_total",
        "Ticks reconciled into the instrument store"
    )
    .unwrap()
});

/// Ticks ignored by the reconciler.
pub static TICKS_IGNORED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pulse_ticks_ignored_total",
        "Ticks ignored by the reconciler",
        &["reason"]
    )
    .unwrap()
});

/// Instruments loaded by the last snapshot.
pub static SNAPSHOT_INSTRUMENTS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "pulse_snapshot_instruments",
        "Instruments held by the store after the last snapshot load"
    )
    .unwrap()
});

/// Flash cues started.
pub static FLASHES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pulse_flashes_total",
        "Row flash cues started",
        &["direction"]
    )
    .unwrap()
});

/// Audible alerts fired for the focused instrument.
pub static ALERTS_FIRED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "pulse_alerts_fired_total",
        "Audible alerts fired for the focused instrument"
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Record stream open.
    pub fn ws_connected() {
        WS_CONNECTED.set(1.0);
    }

    /// Record stream not open.
    pub fn ws_disconnected() {
        WS_CONNECTED.set(0.0);
    }

    /// Set the stream state. Only the active state is 1.
    pub fn ws_state_set(state: &str) {
        for s in &["connecting", "open", "closed"] {
            WS_STATE.with_label_values(&[s]).set(0.0);
        }
        WS_STATE.with_label_values(&[state]).set(1.0);
    }

    /// Record a reconnection attempt.
    pub fn ws_reconnect(reason: &str) {
        WS_RECONNECT_TOTAL.with_label_values(&[reason]).inc();
    }

    /// Record a dropped undecodable frame.
    pub fn ws_decode_error(kind: &str) {
        WS_DECODE_ERRORS_TOTAL.with_label_values(&[kind]).inc();
    }

    /// Record a reconciled tick.
    pub fn tick_processed() {
        TICKS_PROCESSED_TOTAL.inc();
    }

    /// Record an ignored tick.
    pub fn tick_ignored(reason: &str) {
        TICKS_IGNORED_TOTAL.with_label_values(&[reason]).inc();
    }

    /// Record the size of the loaded snapshot.
    pub fn snapshot_loaded(instruments: usize) {
        SNAPSHOT_INSTRUMENTS.set(i64::try_from(instruments).unwrap_or(i64::MAX));
    }

    /// Record a started flash.
    pub fn flash_started(direction: &str) {
        FLASHES_TOTAL.with_label_values(&[direction]).inc();
    }

    /// Record a fired alert.
    pub fn alert_fired() {
        ALERTS_FIRED_TOTAL.inc();
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn gather_text() -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let families = prometheus::gather();
        let mut buffer = Vec::new();
        encoder.encode(&families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
