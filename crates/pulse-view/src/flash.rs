//! Row flash timers.
//!
//! Time is passed in explicitly so expiry is deterministic under test.

use crate::types::FlashClass;
use pulse_core::Symbol;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct Flash {
    class: FlashClass,
    started_at: Instant,
}

/// Tracks at most one flash per symbol.
#[derive(Debug)]
pub struct FlashTracker {
    duration: Duration,
    active: HashMap<Symbol, Flash>,
}

impl FlashTracker {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            active: HashMap::new(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Start a flash. A flash already running on the symbol is replaced and
    /// its timer restarts from `now`.
    pub fn start(&mut self, symbol: Symbol, class: FlashClass, now: Instant) {
        self.active.insert(
            symbol,
            Flash {
                class,
                started_at: now,
            },
        );
    }

    /// Flash visible on `symbol` at `now`.
    pub fn active(&self, symbol: &Symbol, now: Instant) -> Option<FlashClass> {
        self.active
            .get(symbol)
            .filter(|flash| now.saturating_duration_since(flash.started_at) < self.duration)
            .map(|flash| flash.class)
    }

    /// Drop expired flashes and return their symbols.
    pub fn sweep(&mut self, now: Instant) -> Vec<Symbol> {
        let duration = self.duration;
        let mut expired = Vec::new();
        self.active.retain(|symbol, flash| {
            let keep = now.saturating_duration_since(flash.started_at) < duration;
            if !keep {
                expired.push(symbol.clone());
            }
            keep
        });
        expired.sort();
        expired
    }

    /// Forget the flash on `symbol`.
    pub fn clear(&mut self, symbol: &Symbol) {
        self.active.remove(symbol);
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
