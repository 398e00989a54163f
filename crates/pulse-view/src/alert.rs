//! Audible alert gating for the focused instrument.
//!
//! The policy compares each focused update against a baseline price: the
//! price the detail panel was initialized with, then the price of every
//! later focused update. Muted updates still move the baseline, so unmuting
//! never fires for a move that happened while muted.

use pulse_core::{Direction, Price, Symbol};
use std::io::Write;
use tracing::{debug, info};

/// Stateful alert gate.
#[derive(Debug, Clone)]
pub struct AlertPolicy {
    muted: bool,
    baseline: Option<Price>,
}

impl AlertPolicy {
    pub fn new(muted: bool) -> Self {
        Self {
            muted,
            baseline: None,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn baseline(&self) -> Option<Price> {
        self.baseline
    }

    /// Change the mute flag. Takes effect from the next update.
    pub fn set_muted(&mut self, muted: bool) {
        if self.muted != muted {
            debug!(muted, "Alert mute toggled");
        }
        self.muted = muted;
    }

    /// Focus moved: the newly focused instrument's current price is the baseline.
    pub fn reset_baseline(&mut self, price: Price) {
        self.baseline = Some(price);
    }

    /// Decide whether a focused update fires, then move the baseline.
    ///
    /// Fires iff not muted, the direction is not `Unchanged`, and the price
    /// differs from the baseline.
    pub fn on_focused_update(&mut self, direction: Direction, new_price: Price) -> bool {
        let moved = self.baseline != Some(new_price);
        self.baseline = Some(new_price);
        !self.muted && direction != Direction::Unchanged && moved
    }
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Output for fired alerts.
#[cfg_attr(test, mockall::automock)]
pub trait AlertSink: Send + Sync {
    fn play(&self, symbol: &Symbol, direction: Direction, price: Price);
}

/// Logs fired alerts and optionally rings the terminal bell.
#[derive(Debug, Clone, Default)]
pub struct LogAlertSink {
    bell: bool,
}

impl LogAlertSink {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }
}

impl AlertSink for LogAlertSink {
    fn play(&self, symbol: &Symbol, direction: Direction, price: Price) {
        info!(symbol = %symbol, %direction, %price, "Price alert");
        if self.bell {
            let mut stderr = std::io::stderr();
            if let Err(e) = stderr.write_all(b"\x07").and_then(|()| stderr.flush()) {
                debug!(?e, "Failed to ring terminal bell");
            }
        }
    }
}
