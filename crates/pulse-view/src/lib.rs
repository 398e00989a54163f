//! View layer of the pulse market dashboard.
//!
//! Turns reconciliation events into presentation state:
//!
//! - Row text and transient flash cues for the rendered instrument rows
//! - Detail panel text and badge for the focused instrument
//! - Audible alert gating for the focused instrument
//! - Top movers summary cards
//! - JSON fan-out of every view change for external renderers
//!
//! # Flow
//!
//! ```text
//! ReconciliationEvent ──▶ ViewBinder ──┬─▶ RowView (+ flash, 400ms)
//!                                      ├─▶ DetailView ──▶ AlertPolicy ──▶ AlertSink
//!                                      └─▶ EventBroadcaster (JSON)
//! ```

pub mod alert;
pub mod binder;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod flash;
pub mod format;
pub mod types;

pub use alert::{AlertPolicy, AlertSink, LogAlertSink};
pub use binder::ViewBinder;
pub use broadcast::EventBroadcaster;
pub use config::ViewConfig;
pub use error::{ViewError, ViewResult};
pub use flash::FlashTracker;
pub use types::{CardView, DetailView, FlashClass, RowView, Tone, ViewMessage, ViewUpdate};
