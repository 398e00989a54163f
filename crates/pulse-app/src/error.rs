//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] pulse_ws::WsError),

    #[error("Feed error: {0}")]
    Feed(#[from] pulse_feed::FeedError),

    #[error("Invalid symbol: {0}")]
    Symbol(#[from] pulse_core::CoreError),

    #[error("Invalid command: {0}")]
    Command(String),
}

pub type AppResult<T> = Result<T, AppError>;
