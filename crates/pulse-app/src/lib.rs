//! Live market dashboard.
//!
//! Main application that orchestrates all components:
//! - Snapshot load into the instrument store
//! - Ticker stream subscription for the top instruments by volume
//! - Tick reconciliation and view binding on a single consumer task
//! - Interactive control (focus, mute) from stdin

pub mod app;
pub mod config;
pub mod control;
pub mod error;

pub use app::{Application, RunSummary};
pub use config::AppConfig;
pub use control::ControlCommand;
pub use error::{AppError, AppResult};
