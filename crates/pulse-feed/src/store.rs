//! Instrument store.
//!
//! Authoritative in-memory table of every known instrument. Populated once
//! from the snapshot, then mutated in place by ticks. Instruments are never
//! removed during a session and ranks are never renumbered.

use crate::error::FeedResult;
use crate::snapshot::{build_instruments, RawSnapshotEntry};
use parking_lot::RwLock;
use pulse_core::{Instrument, Price, Symbol, Tick};
use pulse_telemetry::Metrics;
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Default)]
struct StoreInner {
    instruments: HashMap<Symbol, Instrument>,
    /// Symbols ordered by rank.
    ranked: Vec<Symbol>,
}

/// Thread-safe instrument table.
///
/// Each `apply` runs under a single write lock, so readers never observe a
/// half-applied tick.
#[derive(Debug)]
pub struct InstrumentStore {
    quote_asset: String,
    inner: RwLock<StoreInner>,
}

impl InstrumentStore {
    /// Create an empty store for instruments quoted in `quote_asset`.
    pub fn new(quote_asset: impl Into<String>) -> Self {
        Self {
            quote_asset: quote_asset.into().to_ascii_uppercase(),
            inner: RwLock::new(StoreInner::default()),
        }
    }

    pub fn quote_asset(&self) -> &str {
        &self.quote_asset
    }

    /// Replace all state with the given snapshot.
    ///
    /// Every entry is validated before the swap; on error the previous
    /// contents are left untouched. Returns the number of instruments loaded.
    pub fn load(&self, entries: &[RawSnapshotEntry]) -> FeedResult<usize> {
        let instruments = build_instruments(entries, &self.quote_asset)?;

        let ranked: Vec<Symbol> = instruments.iter().map(|i| i.symbol.clone()).collect();
        let instruments: HashMap<Symbol, Instrument> = instruments
            .into_iter()
            .map(|i| (i.symbol.clone(), i))
            .collect();
        let count = ranked.len();

        *self.inner.write() = StoreInner {
            instruments,
            ranked,
        };

        Metrics::snapshot_loaded(count);
        info!(count, quote = %self.quote_asset, "Instrument snapshot loaded");
        Ok(count)
    }

    /// Overwrite price and percent change of the tick's instrument.
    ///
    /// Returns the updated instrument and the price it replaced, or `None`
    /// when the symbol is unknown.
    pub fn apply(&self, tick: &Tick) -> Option<(Instrument, Price)> {
        let mut inner = self.inner.write();
        let instrument = inner.instruments.get_mut(&tick.symbol)?;
        let prior = instrument.price;
        instrument.price = tick.price;
        instrument.change = tick.change;
        Some((instrument.clone(), prior))
    }

    pub fn get(&self, symbol: &Symbol) -> Option<Instrument> {
        self.inner.read().instruments.get(symbol).cloned()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.inner.read().instruments.contains_key(symbol)
    }

    /// First `n` instruments by rank.
    pub fn top_by_volume(&self, n: usize) -> Vec<Instrument> {
        let inner = self.inner.read();
        inner
            .ranked
            .iter()
            .take(n)
            .filter_map(|symbol| inner.instruments.get(symbol).cloned())
            .collect()
    }

    /// Symbols of the first `n` instruments by rank.
    pub fn top_symbols(&self, n: usize) -> Vec<Symbol> {
        self.inner.read().ranked.iter().take(n).cloned().collect()
    }

    /// Instrument holding rank 1, if any.
    pub fn leader(&self) -> Option<Instrument> {
        self.top_by_volume(1).into_iter().next()
    }

    pub fn len(&self) -> usize {
        self.inner.read().ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().ranked.is_empty()
    }
}
