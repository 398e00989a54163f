//! Application orchestration.
//!
//! Startup: snapshot → store → rendered rows, default focus → watch set →
//! stream open. After that a single consumer loop handles ticks, control
//! commands and flash expiry one at a time, so each tick is decoded,
//! reconciled and painted before the next is looked at.

use crate::config::AppConfig;
use crate::control::{spawn_stdin_reader, ControlCommand};
use crate::error::AppResult;
use pulse_core::{Symbol, Tick};
use pulse_feed::{
    InstrumentStore, RawSnapshotEntry, Reconciled, Reconciler, SnapshotClient, WatchSetSelector,
};
use pulse_telemetry::Metrics;
use pulse_view::{AlertSink, EventBroadcaster, LogAlertSink, ViewBinder};
use pulse_ws::StreamConnection;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Tick channel capacity between the stream session and the consumer loop.
const TICK_CHANNEL_CAPACITY: usize = 1024;

/// Control command channel capacity.
const CONTROL_CHANNEL_CAPACITY: usize = 16;

/// Counters reported when the run loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks_processed: u64,
    pub ticks_ignored: u64,
    pub alerts_fired: u64,
}

/// Main application state.
pub struct Application {
    config: AppConfig,
    store: Arc<InstrumentStore>,
    binder: Arc<ViewBinder>,
}

impl Application {
    /// Create the application with the logging alert sink.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let sink = Arc::new(LogAlertSink::new(config.view.bell));
        Self::with_sink(config, sink)
    }

    /// Create the application with a custom alert sink.
    pub fn with_sink(config: AppConfig, sink: Arc<dyn AlertSink>) -> AppResult<Self> {
        config.validate()?;

        let store = Arc::new(InstrumentStore::new(config.quote_asset.clone()));
        let binder = Arc::new(ViewBinder::new(
            store.clone(),
            config.view.clone(),
            sink,
            EventBroadcaster::default(),
        ));

        Ok(Self {
            config,
            store,
            binder,
        })
    }

    pub fn store(&self) -> &Arc<InstrumentStore> {
        &self.store
    }

    pub fn binder(&self) -> &Arc<ViewBinder> {
        &self.binder
    }

    /// Subscribe to JSON view messages.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.binder.broadcaster().subscribe()
    }

    /// Fetch the snapshot over REST and load it.
    pub async fn load_snapshot(&self) -> AppResult<usize> {
        let client = SnapshotClient::new(&self.config.rest_url, self.config.quote_asset.clone())?;
        let entries = client.fetch().await?;
        self.load_entries(&entries)
    }

    /// Load already-fetched snapshot entries.
    pub fn load_entries(&self, entries: &[RawSnapshotEntry]) -> AppResult<usize> {
        Ok(self.store.load(entries)?)
    }

    /// Configured default focus if present, else the rank-1 instrument.
    pub fn initial_focus(&self) -> Option<Symbol> {
        Symbol::new(&self.config.default_focus)
            .ok()
            .filter(|symbol| self.store.contains(symbol))
            .or_else(|| self.store.leader().map(|instrument| instrument.symbol))
    }

    /// Run with stdin control until `quit` or Ctrl+C.
    pub async fn run(self) -> AppResult<RunSummary> {
        let shutdown = CancellationToken::new();
        let (control_tx, control_rx) = mpsc::channel(CONTROL_CHANNEL_CAPACITY);
        let stdin_handle = spawn_stdin_reader(control_tx);

        let ctrl_c_token = shutdown.clone();
        let ctrl_c_handle = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
                ctrl_c_token.cancel();
            }
        });

        let result = self.run_with(control_rx, shutdown).await;

        stdin_handle.abort();
        ctrl_c_handle.abort();
        result
    }

    /// Run the dashboard until `shutdown` is cancelled or `Quit` arrives.
    ///
    /// Loads the snapshot first when the store is still empty; a snapshot
    /// failure ends the run with an error before any connection is opened.
    pub async fn run_with(
        self,
        mut control_rx: mpsc::Receiver<ControlCommand>,
        shutdown: CancellationToken,
    ) -> AppResult<RunSummary> {
        if self.store.is_empty() {
            if let Err(e) = self.load_snapshot().await {
                error!(error = %e, "Snapshot load failed, dashboard not started");
                return Err(e);
            }
        }

        self.prepare_view();

        let selector = WatchSetSelector::new(self.store.clone(), self.config.watch_set_cap);
        let watch_set = selector.current();
        info!(
            symbols = watch_set.len(),
            cap = self.config.watch_set_cap,
            "Watch set selected"
        );

        let (tick_tx, mut tick_rx) = mpsc::channel::<Tick>(TICK_CHANNEL_CAPACITY);
        let connection = StreamConnection::new(
            self.config.connection_config(),
            Arc::new(selector),
            tick_tx,
        );
        connection.open(watch_set).await?;

        let mut reconciler = Reconciler::new(self.store.clone());
        let mut alerts_fired = 0u64;
        let mut sweep = tokio::time::interval(sweep_period(&self.config));
        sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!("Entering main event loop");
        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    info!("Shutdown requested");
                    break;
                }

                Some(tick) = tick_rx.recv() => {
                    if let Reconciled::Event(event) = reconciler.process(&tick) {
                        let update = self.binder.on_event(&event, Instant::now());
                        if update.alert {
                            alerts_fired += 1;
                        }
                    }
                }

                Some(command) = control_rx.recv() => {
                    if !self.handle_command(command) {
                        break;
                    }
                }

                _ = sweep.tick() => {
                    self.binder.sweep_flashes(Instant::now());
                }
            }
        }

        connection.shutdown();
        connection.close().await;

        let summary = RunSummary {
            ticks_processed: reconciler.processed_count(),
            ticks_ignored: reconciler.ignored_count(),
            alerts_fired,
        };
        info!(?summary, "Dashboard stopped");
        Ok(summary)
    }

    /// Initial list rows, default focus and top movers.
    fn prepare_view(&self) {
        let rows = self
            .binder
            .set_rendered_rows(self.store.top_symbols(self.config.rendered_rows));
        debug!(rows = rows.len(), "Initial rows rendered");

        if let Some(symbol) = self.initial_focus() {
            if let Err(e) = self.binder.focus_changed(&symbol) {
                warn!(error = %e, "Default focus unavailable");
            }
        }
        self.binder.top_movers();
    }

    /// Apply one control command. Returns false when the loop should stop.
    fn handle_command(&self, command: ControlCommand) -> bool {
        match command {
            ControlCommand::Focus(symbol) => {
                match self.binder.focus_changed(&symbol) {
                    Ok(detail) => println!(
                        "{} {} {} ({})",
                        detail.name, detail.price_text, detail.change_text, detail.subtitle
                    ),
                    Err(e) => warn!(error = %e, "Focus change rejected"),
                }
                true
            }
            ControlCommand::Mute => {
                self.binder.mute_toggled(true);
                true
            }
            ControlCommand::Unmute => {
                self.binder.mute_toggled(false);
                true
            }
            ControlCommand::Top => {
                for card in self.binder.top_movers() {
                    println!("{:<8} {:>16} {:>8}", card.name, card.price_text, card.change_text);
                }
                true
            }
            ControlCommand::Metrics => {
                match Metrics::gather_text() {
                    Ok(text) => print!("{text}"),
                    Err(e) => warn!(error = %e, "Failed to render metrics"),
                }
                true
            }
            ControlCommand::Quit => {
                info!("Quit requested");
                false
            }
        }
    }
}

/// Sweep often enough that a flash never outlives its duration by more
/// than a quarter.
fn sweep_period(config: &AppConfig) -> Duration {
    Duration::from_millis((config.view.flash_duration_ms / 4).max(10))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn entries() -> Vec<RawSnapshotEntry> {
        vec![
            RawSnapshotEntry::new("AUSDT", "10", "1.0", "100"),
            RawSnapshotEntry::new("BUSDT", "5", "-1.0", "200"),
        ]
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AppConfig {
            watch_set_cap: 0,
            ..Default::default()
        };
        assert!(matches!(
            Application::new(config),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_initial_focus_falls_back_to_rank_one() {
        let app = Application::new(AppConfig::default()).unwrap();
        app.load_entries(&entries()).unwrap();
        assert_eq!(app.initial_focus(), Some(Symbol::new("BUSDT").unwrap()));
    }

    #[test]
    fn test_initial_focus_prefers_configured_symbol() {
        let config = AppConfig {
            default_focus: "AUSDT".to_string(),
            ..Default::default()
        };
        let app = Application::new(config).unwrap();
        app.load_entries(&entries()).unwrap();
        assert_eq!(app.initial_focus(), Some(Symbol::new("AUSDT").unwrap()));
    }

    #[test]
    fn test_commands_drive_binder() {
        let app = Application::new(AppConfig::default()).unwrap();
        app.load_entries(&entries()).unwrap();

        assert!(app.handle_command(ControlCommand::Unmute));
        assert!(!app.binder().is_muted());
        assert!(app.handle_command(ControlCommand::Focus(Symbol::new("AUSDT").unwrap())));
        assert_eq!(app.binder().focused(), Some(Symbol::new("AUSDT").unwrap()));
        assert!(!app.handle_command(ControlCommand::Quit));
    }

    #[test]
    fn test_sweep_period() {
        let config = AppConfig::default();
        assert_eq!(sweep_period(&config), Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_snapshot_failure_is_fatal_to_startup() {
        // Nothing listens on port 9; the fetch fails before any stream opens.
        let config = AppConfig {
            rest_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let app = Application::new(config).unwrap();
        let (_tx, rx) = mpsc::channel(1);

        let result = app.run_with(rx, CancellationToken::new()).await;
        assert!(matches!(
            result,
            Err(AppError::Feed(pulse_feed::FeedError::SnapshotLoad(_)))
        ));
    }
}
