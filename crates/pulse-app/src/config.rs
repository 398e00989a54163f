//! Application configuration.

use crate::error::{AppError, AppResult};
use pulse_core::Symbol;
use pulse_feed::DEFAULT_WATCH_SET_CAP;
use pulse_view::ViewConfig;
use pulse_ws::{BackoffKind, ConnectionConfig, ReconnectPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ticker stream settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsConfig {
    /// Delay before reconnecting (base delay for exponential backoff).
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// `fixed` or `exponential`.
    #[serde(default)]
    pub backoff: BackoffKind,
    /// Upper bound for exponential backoff.
    #[serde(default = "default_reconnect_max_delay_ms")]
    pub reconnect_max_delay_ms: u64,
    /// Maximum jitter added to exponential delays.
    #[serde(default = "default_reconnect_jitter_ms")]
    pub reconnect_jitter_ms: u64,
}

fn default_reconnect_delay_ms() -> u64 {
    5_000
}

fn default_reconnect_max_delay_ms() -> u64 {
    60_000
}

fn default_reconnect_jitter_ms() -> u64 {
    1_000
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: default_reconnect_delay_ms(),
            backoff: BackoffKind::default(),
            reconnect_max_delay_ms: default_reconnect_max_delay_ms(),
            reconnect_jitter_ms: default_reconnect_jitter_ms(),
        }
    }
}

impl From<&WsConfig> for ReconnectPolicy {
    fn from(cfg: &WsConfig) -> Self {
        Self {
            kind: cfg.backoff,
            base_delay_ms: cfg.reconnect_delay_ms,
            max_delay_ms: cfg.reconnect_max_delay_ms,
            jitter_ms: cfg.reconnect_jitter_ms,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directives used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info,pulse=debug".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Combined ticker stream endpoint.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// REST base URL for the snapshot.
    #[serde(default = "default_rest_url")]
    pub rest_url: String,
    /// Quote currency family kept from the snapshot.
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,
    /// Maximum number of symbols streamed live.
    #[serde(default = "default_watch_set_cap")]
    pub watch_set_cap: usize,
    /// Symbol focused at startup when present in the snapshot.
    #[serde(default = "default_focus")]
    pub default_focus: String,
    /// Number of list rows rendered at startup.
    #[serde(default = "default_rendered_rows")]
    pub rendered_rows: usize,
    #[serde(default)]
    pub websocket: WsConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_ws_url() -> String {
    "wss://stream.binance.com:9443/stream".to_string()
}

fn default_rest_url() -> String {
    "https://api.binance.com".to_string()
}

fn default_quote_asset() -> String {
    "USDT".to_string()
}

fn default_watch_set_cap() -> usize {
    DEFAULT_WATCH_SET_CAP
}

fn default_focus() -> String {
    "BTCUSDT".to_string()
}

fn default_rendered_rows() -> usize {
    25
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            rest_url: default_rest_url(),
            quote_asset: default_quote_asset(),
            watch_set_cap: default_watch_set_cap(),
            default_focus: default_focus(),
            rendered_rows: default_rendered_rows(),
            websocket: WsConfig::default(),
            view: ViewConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML content.
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.watch_set_cap == 0 {
            return Err(AppError::Config("watch_set_cap must be > 0".to_string()));
        }
        if self.quote_asset.trim().is_empty() {
            return Err(AppError::Config("quote_asset must not be empty".to_string()));
        }
        if self.ws_url.trim().is_empty() {
            return Err(AppError::Config("ws_url must not be empty".to_string()));
        }
        if self.websocket.reconnect_delay_ms == 0 {
            return Err(AppError::Config(
                "websocket.reconnect_delay_ms must be > 0".to_string(),
            ));
        }
        Symbol::new(&self.default_focus)
            .map_err(|e| AppError::Config(format!("default_focus: {e}")))?;
        self.view
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        Ok(())
    }

    /// Stream connection settings.
    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            url: self.ws_url.clone(),
            reconnect: ReconnectPolicy::from(&self.websocket),
        }
    }
}
