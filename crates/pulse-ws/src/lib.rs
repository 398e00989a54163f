//! Ticker stream connection for the pulse market dashboard.
//!
//! Provides the single live subscription to the exchange ticker feed:
//! - Combined-stream subscription built from the watch set
//! - Decoding of ticker payloads into `Tick`s (bad frames are dropped, never fatal)
//! - At most one active connection at a time
//! - Automatic reconnection after a fixed delay (exponential backoff opt-in)

pub mod backoff;
pub mod connection;
pub mod error;
pub mod message;
pub mod subscription;

pub use backoff::{BackoffKind, ReconnectPolicy};
pub use connection::{ConnectionConfig, ConnectionState, StreamConnection, WatchSetSource};
pub use error::{WsError, WsResult};
pub use message::{decode_tick, DecodeError, StreamEnvelope, TickerPayload};
pub use subscription::{combined_stream_url, stream_path, topic_for};

use std::sync::Once;

static INIT_CRYPTO: Once = Once::new();

/// Initialize the TLS crypto provider.
/// Must be called before any WebSocket connections are made.
pub fn init_crypto() {
    INIT_CRYPTO.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
