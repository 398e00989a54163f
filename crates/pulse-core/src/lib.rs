//! Core domain types for the pulse market dashboard.
//!
//! This crate provides the fundamental types shared by the feed, stream and view layers:
//! - `Symbol`: Exchange instrument identifier (e.g. "BTCUSDT")
//! - `Price`, `Percent`, `Volume`: Precision-safe numeric types
//! - `Instrument`: Ranked instrument with last-known price and change
//! - `Tick`, `ReconciliationEvent`, `Direction`: Streaming update types
//! - `WatchSet`: Bounded set of streamed symbols

pub mod decimal;
pub mod error;
pub mod symbol;
pub mod types;

pub use decimal::{Percent, Price, Volume};
pub use error::{CoreError, Result};
pub use symbol::Symbol;
pub use types::{Direction, Instrument, ReconciliationEvent, Tick, WatchSet};
