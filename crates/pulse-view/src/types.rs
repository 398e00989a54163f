//! View state types.
//!
//! These types are serialized as JSON for external renderers.

use pulse_core::{Direction, ReconciliationEvent, Symbol};
use serde::Serialize;

/// Transient row highlight started by a price move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashClass {
    Positive,
    Negative,
}

impl FlashClass {
    /// `Up` flashes positive, `Down` negative, `Unchanged` not at all.
    pub fn for_direction(direction: Direction) -> Option<Self> {
        match direction {
            Direction::Up => Some(Self::Positive),
            Direction::Down => Some(Self::Negative),
            Direction::Unchanged => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

/// Color coding for percent text and badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
}

/// One rendered instrument row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub symbol: Symbol,
    pub name: String,
    pub rank: u32,
    /// e.g. "$67,123.45"
    pub price_text: String,
    /// e.g. "▲ 1.23%"
    pub change_text: String,
    pub tone: Tone,
    /// Active flash, if any.
    pub flash: Option<FlashClass>,
}

/// Detail panel for the focused instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub symbol: Symbol,
    pub name: String,
    /// e.g. "BTCUSDT | Live Data"
    pub subtitle: String,
    pub price_text: String,
    /// e.g. "+1.23%"
    pub change_text: String,
    pub badge: Tone,
}

/// Top movers summary card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub name: String,
    pub price_text: String,
    pub change_text: String,
    pub tone: Tone,
}

/// Everything one event changed on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewUpdate {
    pub event: ReconciliationEvent,
    /// Present when the symbol is a rendered row.
    pub row: Option<RowView>,
    /// Present when the symbol is focused.
    pub detail: Option<DetailView>,
    /// Whether the audible alert fired.
    pub alert: bool,
}

impl ViewUpdate {
    /// Nothing visible changed.
    pub fn is_offscreen(&self) -> bool {
        self.row.is_none() && self.detail.is_none()
    }
}

/// Message published to external renderers (tagged enum for type safety).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewMessage {
    /// A reconciled tick and the view state it produced.
    Event {
        event: ReconciliationEvent,
        row: Option<RowView>,
        detail: Option<DetailView>,
        alert: bool,
    },
    /// Focus moved to another instrument.
    Focus { detail: DetailView },
    /// Alert mute flag changed.
    Mute { muted: bool },
    /// Row flash expired.
    FlashCleared { symbol: Symbol },
    /// Top movers summary.
    TopMovers { cards: Vec<CardView> },
}

impl From<&ViewUpdate> for ViewMessage {
    fn from(update: &ViewUpdate) -> Self {
        Self::Event {
            event: update.event.clone(),
            row: update.row.clone(),
            detail: update.detail.clone(),
            alert: update.alert,
        }
    }
}
