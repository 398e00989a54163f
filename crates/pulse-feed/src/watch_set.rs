//! Watch set selection.

use crate::store::InstrumentStore;
use pulse_core::WatchSet;
use pulse_ws::WatchSetSource;
use std::sync::Arc;

/// Default number of symbols streamed live.
pub const DEFAULT_WATCH_SET_CAP: usize = 40;

/// Derives the bounded set of symbols to stream from the store.
///
/// Also serves as the connection's `WatchSetSource`, so every reconnect
/// subscribes to the set computed from the current store.
#[derive(Debug, Clone)]
pub struct WatchSetSelector {
    store: Arc<InstrumentStore>,
    cap: usize,
}

impl WatchSetSelector {
    pub fn new(store: Arc<InstrumentStore>, cap: usize) -> Self {
        Self { store, cap }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// First `cap` instruments by descending volume.
    pub fn select(store: &InstrumentStore, cap: usize) -> WatchSet {
        WatchSet::bounded(store.top_symbols(cap), cap)
    }

    /// Watch set for the current store contents.
    pub fn current(&self) -> WatchSet {
        Self::select(&self.store, self.cap)
    }
}

impl WatchSetSource for WatchSetSelector {
    fn current_watch_set(&self) -> WatchSet {
        self.current()
    }
}
