//! Market data types shared across the pipeline.
//!
//! Contains the ranked `Instrument`, the streaming `Tick`, and the
//! `ReconciliationEvent` emitted once per processed tick.

use crate::{Percent, Price, Symbol, Volume};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A tradable instrument tracked by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Unique exchange symbol.
    pub symbol: Symbol,
    /// 1-based rank by descending quote volume at snapshot time.
    /// Assigned once at load, never renumbered by streaming updates.
    pub rank: u32,
    /// Symbol with quote suffix stripped.
    pub name: String,
    /// Last known price.
    pub price: Price,
    /// 24h percent change.
    pub change: Percent,
    /// 24h quote volume.
    pub volume: Volume,
}

/// One incremental price/percent update from the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub symbol: Symbol,
    pub price: Price,
    pub change: Percent,
}

impl Tick {
    pub fn new(symbol: Symbol, price: Price, change: Percent) -> Self {
        Self {
            symbol,
            price,
            change,
        }
    }
}

/// Bounded, ordered set of symbols subscribed to on the stream.
///
/// The cap is enforced at construction; the set is never resized afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchSet {
    symbols: Vec<Symbol>,
}

impl WatchSet {
    /// Build from symbols in priority order, keeping at most `cap` distinct entries.
    pub fn bounded(symbols: impl IntoIterator<Item = Symbol>, cap: usize) -> Self {
        let mut selected: Vec<Symbol> = Vec::with_capacity(cap);
        for symbol in symbols {
            if selected.len() >= cap {
                break;
            }
            if !selected.contains(&symbol) {
                selected.push(symbol);
            }
        }
        Self { symbols: selected }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}

/// Directional delta between two consecutive prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Unchanged,
}

impl Direction {
    /// `Up` iff `new > previous`, `Down` iff `new < previous`, else `Unchanged`.
    pub fn between(previous: Price, new: Price) -> Self {
        match new.cmp(&previous) {
            Ordering::Greater => Self::Up,
            Ordering::Less => Self::Down,
            Ordering::Equal => Self::Unchanged,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Unchanged => "unchanged",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of merging one tick into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationEvent {
    pub symbol: Symbol,
    pub previous_price: Price,
    pub price: Price,
    pub direction: Direction,
    /// Percent change taken verbatim from the tick.
    pub change: Percent,
}

impl ReconciliationEvent {
    pub fn new(symbol: Symbol, previous_price: Price, price: Price, change: Percent) -> Self {
        Self {
            symbol,
            previous_price,
            price,
            direction: Direction::between(previous_price, price),
            change,
        }
    }
}
