//! Ticker stream connection.
//!
//! Owns the single live subscription to the exchange. `open` tears down any
//! previous session before starting a new one, so at most one socket is ever
//! active. A session reconnects on its own after a loss, re-reading the watch
//! set from its `WatchSetSource` before each attempt.

use crate::backoff::ReconnectPolicy;
use crate::error::{WsError, WsResult};
use crate::message::decode_tick;
use crate::subscription::combined_stream_url;
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use pulse_core::{Tick, WatchSet};
use pulse_telemetry::Metrics;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex as TokioMutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async_tls_with_config, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Supplies the watch set used when a session reconnects.
pub trait WatchSetSource: Send + Sync {
    fn current_watch_set(&self) -> WatchSet;
}

impl WatchSetSource for WatchSet {
    fn current_watch_set(&self) -> WatchSet {
        self.clone()
    }
}

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Combined-stream endpoint without query string.
    pub url: String,
    /// Delay policy between reconnection attempts.
    pub reconnect: ReconnectPolicy,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: "wss://stream.binance.com:9443/stream".to_string(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

struct ActiveSession {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// The single live ticker subscription.
pub struct StreamConnection {
    config: ConnectionConfig,
    state: Arc<RwLock<ConnectionState>>,
    source: Arc<dyn WatchSetSource>,
    tick_tx: mpsc::Sender<Tick>,
    session: TokioMutex<Option<ActiveSession>>,
    reconnect_count: Arc<AtomicU64>,
    opened_count: Arc<AtomicU64>,
    shutdown_token: CancellationToken,
}

impl StreamConnection {
    /// Create a connection. Nothing is opened until `open` is called.
    pub fn new(
        config: ConnectionConfig,
        source: Arc<dyn WatchSetSource>,
        tick_tx: mpsc::Sender<Tick>,
    ) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(ConnectionState::Closed)),
            source,
            tick_tx,
            session: TokioMutex::new(None),
            reconnect_count: Arc::new(AtomicU64::new(0)),
            opened_count: Arc::new(AtomicU64::new(0)),
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Get current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Reconnection attempts scheduled since creation.
    pub fn reconnect_count(&self) -> u64 {
        self.reconnect_count.load(Ordering::Relaxed)
    }

    /// Sockets successfully opened since creation.
    pub fn opened_count(&self) -> u64 {
        self.opened_count.load(Ordering::Relaxed)
    }

    /// Open a subscription for `watch_set`, replacing any active one.
    ///
    /// The previous session is cancelled and awaited before the new one is
    /// spawned. Returns once the new session is scheduled; connection
    /// failures are handled by the session's reconnect loop.
    pub async fn open(&self, watch_set: WatchSet) -> WsResult<()> {
        if self.is_shutdown() {
            return Err(WsError::Shutdown);
        }
        let url = combined_stream_url(&self.config.url, &watch_set)?;

        let mut slot = self.session.lock().await;
        if let Some(previous) = slot.take() {
            debug!("Closing previous stream session");
            previous.token.cancel();
            if let Err(e) = previous.handle.await {
                error!(?e, "Previous stream session panicked");
            }
        }

        let token = self.shutdown_token.child_token();
        let worker = SessionWorker {
            base_url: self.config.url.clone(),
            url,
            policy: self.config.reconnect,
            state: self.state.clone(),
            source: self.source.clone(),
            tick_tx: self.tick_tx.clone(),
            reconnect_count: self.reconnect_count.clone(),
            opened_count: self.opened_count.clone(),
            token: token.clone(),
        };
        info!(symbols = watch_set.len(), "Opening ticker stream");
        let handle = tokio::spawn(worker.run());
        *slot = Some(ActiveSession { token, handle });
        Ok(())
    }

    /// Cancel the active session and wait for its socket to close.
    pub async fn close(&self) {
        let mut slot = self.session.lock().await;
        if let Some(active) = slot.take() {
            active.token.cancel();
            if let Err(e) = active.handle.await {
                error!(?e, "Stream session panicked");
            }
        }
    }

    /// Signal graceful shutdown. No further `open` calls are accepted.
    pub fn shutdown(&self) {
        info!("StreamConnection shutdown requested");
        self.shutdown_token.cancel();
    }

    /// Check if shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }
}

/// Everything a spawned session needs, detached from `StreamConnection`.
struct SessionWorker {
    base_url: String,
    url: String,
    policy: ReconnectPolicy,
    state: Arc<RwLock<ConnectionState>>,
    source: Arc<dyn WatchSetSource>,
    tick_tx: mpsc::Sender<Tick>,
    reconnect_count: Arc<AtomicU64>,
    opened_count: Arc<AtomicU64>,
    token: CancellationToken,
}

impl SessionWorker {
    async fn run(mut self) {
        let mut attempt = 0u32;

        loop {
            self.set_state(ConnectionState::Connecting);

            let reason = match self.connect_once(&mut attempt).await {
                Ok(()) => "stream_ended",
                Err(WsError::ConnectionClosed { code, reason }) => {
                    warn!(code, %reason, "Ticker stream closed by server");
                    "server_close"
                }
                Err(e) => {
                    error!(?e, "Ticker stream error");
                    "error"
                }
            };

            self.set_state(ConnectionState::Closed);
            if self.token.is_cancelled() {
                debug!("Stream session cancelled");
                return;
            }

            attempt = attempt.saturating_add(1);
            self.reconnect_count.fetch_add(1, Ordering::Relaxed);
            Metrics::ws_reconnect(reason);

            let delay = self.policy.delay_for(attempt);
            warn!(attempt, delay_ms = delay.as_millis() as u64, "Reconnecting");

            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = self.token.cancelled() => {
                    debug!("Stream session cancelled during reconnect delay");
                    return;
                }
            }

            self.refresh_url();
        }
    }

    /// Rebuild the subscription URL from the current watch set.
    fn refresh_url(&mut self) {
        let watch_set = self.source.current_watch_set();
        match combined_stream_url(&self.base_url, &watch_set) {
            Ok(url) => self.url = url,
            Err(e) => warn!(?e, "Watch set unavailable, reusing previous subscription"),
        }
    }

    /// Connect and pump frames until the socket ends or the session is
    /// cancelled. Returns `Ok(())` on cancellation and clean stream end.
    async fn connect_once(&self, attempt: &mut u32) -> WsResult<()> {
        info!(url = %self.url, "Connecting to ticker stream");

        let connect = connect_async_tls_with_config(self.url.as_str(), None, true, None);
        let (ws_stream, _response) = tokio::select! {
            () = self.token.cancelled() => return Ok(()),
            result = connect => result?,
        };
        let (mut write, mut read) = ws_stream.split();

        self.set_state(ConnectionState::Open);
        self.opened_count.fetch_add(1, Ordering::Relaxed);
        *attempt = 0;
        info!("Ticker stream open");

        loop {
            tokio::select! {
                biased;

                () = self.token.cancelled() => {
                    if let Err(e) = write.send(Message::Close(None)).await {
                        debug!(?e, "Failed to send Close frame");
                    }
                    return Ok(());
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if !self.forward(&text).await {
                                return Ok(());
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = frame
                                .map(|f| (f.code.into(), f.reason.to_string()))
                                .unwrap_or((1000, "Normal close".to_string()));
                            return Err(WsError::ConnectionClosed { code, reason });
                        }
                        Some(Err(e)) => return Err(e.into()),
                        None => {
                            warn!("Ticker stream ended");
                            return Ok(());
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Decode and forward one text frame. Returns false once the consumer is gone.
    ///
    /// A send blocked on a full channel is abandoned when the session is
    /// cancelled; the read loop then sends the Close frame.
    async fn forward(&self, text: &str) -> bool {
        match decode_tick(text) {
            Ok(tick) => {
                tokio::select! {
                    result = self.tick_tx.send(tick) => {
                        if result.is_err() {
                            warn!("Tick receiver dropped, ending stream session");
                            self.token.cancel();
                            return false;
                        }
                    }
                    () = self.token.cancelled() => {
                        debug!("Session cancelled while tick channel was full");
                    }
                }
            }
            Err(e) => {
                Metrics::ws_decode_error(e.kind());
                warn!(error = %e, "Dropping undecodable frame");
            }
        }
        true
    }

    fn set_state(&self, state: ConnectionState) {
        *self.state.write() = state;
        Metrics::ws_state_set(state.as_str());
        if state == ConnectionState::Open {
            Metrics::ws_connected();
        } else {
            Metrics::ws_disconnected();
        }
    }
}
