//! Feed error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Snapshot load failed: {0}")]
    SnapshotLoad(String),

    #[error("Snapshot contains no instruments")]
    EmptySnapshot,

    #[error("Invalid snapshot entry {index} ({symbol}): {reason}")]
    InvalidEntry {
        index: usize,
        symbol: String,
        reason: String,
    },

    #[error("Duplicate symbol in snapshot: {0}")]
    DuplicateSymbol(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

pub type FeedResult<T> = Result<T, FeedError>;
