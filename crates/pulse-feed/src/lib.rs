//! Market state for the pulse dashboard.
//!
//! - `InstrumentStore`: authoritative table of instruments, loaded from the
//!   snapshot and updated in place by ticks
//! - `WatchSetSelector`: bounded top-by-volume subset streamed live
//! - `Reconciler`: merges ticks into the store and emits directional events
//! - `SnapshotClient`: one-shot REST fetch of the 24h ticker snapshot

pub mod client;
pub mod error;
pub mod reconciler;
pub mod snapshot;
pub mod store;
pub mod watch_set;

pub use client::SnapshotClient;
pub use error::{FeedError, FeedResult};
pub use reconciler::{Reconciled, Reconciler};
pub use snapshot::{filter_quote_asset, RawSnapshotEntry};
pub use store::InstrumentStore;
pub use watch_set::{WatchSetSelector, DEFAULT_WATCH_SET_CAP};
