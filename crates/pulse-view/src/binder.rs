//! View binder.
//!
//! Applies reconciliation events to the rendered rows and the focused
//! detail panel, starts row flashes, and consults the alert policy for the
//! focused instrument. All text is derived from the event and the store,
//! never read back from earlier view state, so re-delivering an event
//! produces the same final text.

use crate::alert::{AlertPolicy, AlertSink};
use crate::broadcast::EventBroadcaster;
use crate::config::ViewConfig;
use crate::error::{ViewError, ViewResult};
use crate::flash::FlashTracker;
use crate::format;
use crate::types::{CardView, DetailView, FlashClass, RowView, ViewMessage, ViewUpdate};
use parking_lot::Mutex;
use pulse_core::{Instrument, ReconciliationEvent, Symbol};
use pulse_feed::InstrumentStore;
use pulse_telemetry::Metrics;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

struct BinderState {
    focused: Option<Symbol>,
    rendered: HashSet<Symbol>,
    rows: HashMap<Symbol, RowView>,
    detail: Option<DetailView>,
    flashes: FlashTracker,
    alert: AlertPolicy,
}

/// Presentation state for rows, detail panel and alerts.
pub struct ViewBinder {
    store: Arc<InstrumentStore>,
    config: ViewConfig,
    sink: Arc<dyn AlertSink>,
    broadcaster: EventBroadcaster,
    state: Mutex<BinderState>,
}

impl ViewBinder {
    pub fn new(
        store: Arc<InstrumentStore>,
        config: ViewConfig,
        sink: Arc<dyn AlertSink>,
        broadcaster: EventBroadcaster,
    ) -> Self {
        let state = BinderState {
            focused: None,
            rendered: HashSet::new(),
            rows: HashMap::new(),
            detail: None,
            flashes: FlashTracker::new(config.flash_duration()),
            alert: AlertPolicy::new(config.start_muted),
        };
        Self {
            store,
            config,
            sink,
            broadcaster,
            state: Mutex::new(state),
        }
    }

    pub fn broadcaster(&self) -> &EventBroadcaster {
        &self.broadcaster
    }

    /// Apply one event. Alerts are dispatched after the state lock is released.
    pub fn on_event(&self, event: &ReconciliationEvent, now: Instant) -> ViewUpdate {
        let quote = self.store.quote_asset();
        let update = {
            let mut state = self.state.lock();

            let row = if state.rendered.contains(&event.symbol) {
                if let Some(class) = FlashClass::for_direction(event.direction) {
                    state.flashes.start(event.symbol.clone(), class, now);
                    Metrics::flash_started(event.direction.as_str());
                }
                let flash = state.flashes.active(&event.symbol, now);
                let rank = state.rows.get(&event.symbol).map_or(0, |r| r.rank);
                let row = RowView {
                    symbol: event.symbol.clone(),
                    name: event.symbol.display_name(quote),
                    rank,
                    price_text: format::price_text(event.price),
                    change_text: format::row_change_text(event.change),
                    tone: format::tone_for(event.change),
                    flash,
                };
                state.rows.insert(event.symbol.clone(), row.clone());
                Some(row)
            } else {
                None
            };

            let (detail, alert) = if state.focused.as_ref() == Some(&event.symbol) {
                let detail = detail_from_event(event, quote);
                state.detail = Some(detail.clone());
                let alert = state.alert.on_focused_update(event.direction, event.price);
                (Some(detail), alert)
            } else {
                (None, false)
            };

            ViewUpdate {
                event: event.clone(),
                row,
                detail,
                alert,
            }
        };

        if update.alert {
            Metrics::alert_fired();
            self.sink.play(&event.symbol, event.direction, event.price);
        }
        self.broadcaster.publish(&ViewMessage::from(&update));
        update
    }

    /// Focus `symbol`: rebuild the detail panel from the store and reset
    /// the alert baseline to its current price.
    pub fn focus_changed(&self, symbol: &Symbol) -> ViewResult<DetailView> {
        let instrument = self
            .store
            .get(symbol)
            .ok_or_else(|| ViewError::UnknownSymbol(symbol.to_string()))?;
        let detail = detail_from_instrument(&instrument);

        {
            let mut state = self.state.lock();
            state.focused = Some(instrument.symbol.clone());
            state.detail = Some(detail.clone());
            state.alert.reset_baseline(instrument.price);
        }

        info!(symbol = %instrument.symbol, price = %instrument.price, "Focus changed");
        self.broadcaster.publish(&ViewMessage::Focus {
            detail: detail.clone(),
        });
        Ok(detail)
    }

    /// Change the alert mute flag. Not retroactive.
    pub fn mute_toggled(&self, muted: bool) {
        self.state.lock().alert.set_muted(muted);
        info!(muted, "Alert mute changed");
        self.broadcaster.publish(&ViewMessage::Mute { muted });
    }

    /// Declare which symbols the list currently renders.
    ///
    /// Rows are (re)initialized from the store; rows no longer rendered are
    /// dropped along with their flashes. Unknown symbols are skipped.
    pub fn set_rendered_rows(&self, symbols: impl IntoIterator<Item = Symbol>) -> Vec<RowView> {
        let mut state = self.state.lock();
        let rendered: HashSet<Symbol> = symbols
            .into_iter()
            .filter(|symbol| self.store.contains(symbol))
            .collect();

        let stale: Vec<Symbol> = state
            .rows
            .keys()
            .filter(|symbol| !rendered.contains(*symbol))
            .cloned()
            .collect();
        for symbol in &stale {
            state.rows.remove(symbol);
            state.flashes.clear(symbol);
        }

        for symbol in &rendered {
            if let Some(instrument) = self.store.get(symbol) {
                state.rows.insert(symbol.clone(), row_from_instrument(&instrument));
            }
        }
        state.rendered = rendered;
        debug!(rows = state.rendered.len(), "Rendered rows set");

        let mut rows: Vec<RowView> = state.rows.values().cloned().collect();
        rows.sort_by_key(|row| row.rank);
        rows
    }

    /// Clear expired flashes and notify renderers.
    pub fn sweep_flashes(&self, now: Instant) -> Vec<Symbol> {
        let expired = {
            let mut state = self.state.lock();
            let expired = state.flashes.sweep(now);
            for symbol in &expired {
                if let Some(row) = state.rows.get_mut(symbol) {
                    row.flash = None;
                }
            }
            expired
        };
        for symbol in &expired {
            self.broadcaster.publish(&ViewMessage::FlashCleared {
                symbol: symbol.clone(),
            });
        }
        expired
    }

    /// Summary cards for the top instruments by volume.
    pub fn top_movers(&self) -> Vec<CardView> {
        let cards: Vec<CardView> = self
            .store
            .top_by_volume(self.config.top_movers)
            .iter()
            .map(|instrument| CardView {
                name: instrument.name.clone(),
                price_text: format::card_price_text(instrument.price),
                change_text: format::card_change_text(instrument.change),
                tone: format::tone_for(instrument.change),
            })
            .collect();
        self.broadcaster.publish(&ViewMessage::TopMovers {
            cards: cards.clone(),
        });
        cards
    }

    /// Current row for `symbol` with its flash evaluated at `now`.
    pub fn row(&self, symbol: &Symbol, now: Instant) -> Option<RowView> {
        let state = self.state.lock();
        state.rows.get(symbol).map(|row| RowView {
            flash: state.flashes.active(symbol, now),
            ..row.clone()
        })
    }

    pub fn detail(&self) -> Option<DetailView> {
        self.state.lock().detail.clone()
    }

    pub fn focused(&self) -> Option<Symbol> {
        self.state.lock().focused.clone()
    }

    pub fn is_muted(&self) -> bool {
        self.state.lock().alert.is_muted()
    }
}

fn row_from_instrument(instrument: &Instrument) -> RowView {
    RowView {
        symbol: instrument.symbol.clone(),
        name: instrument.name.clone(),
        rank: instrument.rank,
        price_text: format::price_text(instrument.price),
        change_text: format::row_change_text(instrument.change),
        tone: format::tone_for(instrument.change),
        flash: None,
    }
}

fn detail_from_instrument(instrument: &Instrument) -> DetailView {
    DetailView {
        symbol: instrument.symbol.clone(),
        name: instrument.name.clone(),
        subtitle: format!("{} | Live Data", instrument.symbol),
        price_text: format::price_text(instrument.price),
        change_text: format::detail_change_text(instrument.change),
        badge: format::tone_for(instrument.change),
    }
}

fn detail_from_event(event: &ReconciliationEvent, quote: &str) -> DetailView {
    DetailView {
        symbol: event.symbol.clone(),
        name: event.symbol.display_name(quote),
        subtitle: format!("{} | Live Data", event.symbol),
        price_text: format::price_text(event.price),
        change_text: format::detail_change_text(event.change),
        badge: format::tone_for(event.change),
    }
}
