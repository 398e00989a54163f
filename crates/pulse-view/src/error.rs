//! View error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Invalid view config: {0}")]
    InvalidConfig(String),
}

pub type ViewResult<T> = Result<T, ViewError>;
