//! 24h ticker snapshot parsing.
//!
//! Raw REST records are kept as strings until `build_instruments`, which
//! validates every entry before anything is handed to the store.

use crate::error::{FeedError, FeedResult};
use pulse_core::{Instrument, Percent, Price, Symbol, Volume};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// One record of `GET /api/v3/ticker/24hr`.
///
/// Only the fields the dashboard consumes are declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSnapshotEntry {
    pub symbol: String,
    pub last_price: String,
    pub price_change_percent: String,
    pub quote_volume: String,
}

impl RawSnapshotEntry {
    pub fn new(
        symbol: impl Into<String>,
        last_price: impl Into<String>,
        price_change_percent: impl Into<String>,
        quote_volume: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            last_price: last_price.into(),
            price_change_percent: price_change_percent.into(),
            quote_volume: quote_volume.into(),
        }
    }

    /// Delisted pairs are still reported, with a last price of exactly zero.
    fn is_delisted(&self) -> bool {
        matches!(Decimal::from_str(self.last_price.trim()), Ok(price) if price.is_zero())
    }
}

/// Keep only pairs quoted in `quote` that are still trading.
pub fn filter_quote_asset(entries: Vec<RawSnapshotEntry>, quote: &str) -> Vec<RawSnapshotEntry> {
    let quote = quote.to_ascii_uppercase();
    entries
        .into_iter()
        .filter(|entry| {
            let symbol = entry.symbol.to_ascii_uppercase();
            symbol.len() > quote.len() && symbol.ends_with(&quote)
        })
        .filter(|entry| !entry.is_delisted())
        .collect()
}

/// Validate entries and rank them by descending quote volume.
///
/// Ties keep snapshot order. Any invalid or duplicate entry fails the whole batch.
pub(crate) fn build_instruments(
    entries: &[RawSnapshotEntry],
    quote: &str,
) -> FeedResult<Vec<Instrument>> {
    if entries.is_empty() {
        return Err(FeedError::EmptySnapshot);
    }

    let mut seen = HashSet::with_capacity(entries.len());
    let mut instruments = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let invalid = |reason: String| FeedError::InvalidEntry {
            index,
            symbol: entry.symbol.clone(),
            reason,
        };

        let symbol = Symbol::new(&entry.symbol).map_err(|e| invalid(e.to_string()))?;
        let price = Price::parse_positive(&entry.last_price).map_err(|e| invalid(e.to_string()))?;
        let change =
            Percent::parse(&entry.price_change_percent).map_err(|e| invalid(e.to_string()))?;
        let volume =
            Volume::parse_non_negative(&entry.quote_volume).map_err(|e| invalid(e.to_string()))?;

        if !seen.insert(symbol.clone()) {
            return Err(FeedError::DuplicateSymbol(symbol.to_string()));
        }

        instruments.push(Instrument {
            name: symbol.display_name(quote),
            symbol,
            rank: 0,
            price,
            change,
            volume,
        });
    }

    // sort_by is stable
    instruments.sort_by(|a, b| b.volume.cmp(&a.volume));
    for (idx, instrument) in instruments.iter_mut().enumerate() {
        instrument.rank = u32::try_from(idx + 1).unwrap_or(u32::MAX);
    }

    Ok(instruments)
}
