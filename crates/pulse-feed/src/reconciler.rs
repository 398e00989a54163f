//! Tick reconciliation.
//!
//! Merges each decoded tick into the store and emits one event per
//! processed tick, in delivery order. Ticks are never batched or coalesced.

use crate::store::InstrumentStore;
use pulse_core::{ReconciliationEvent, Tick};
use pulse_telemetry::Metrics;
use std::sync::Arc;
use tracing::trace;

/// Outcome of processing one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    Event(ReconciliationEvent),
    /// Symbol is not in the store.
    Ignored,
}

impl Reconciled {
    pub fn event(&self) -> Option<&ReconciliationEvent> {
        match self {
            Self::Event(event) => Some(event),
            Self::Ignored => None,
        }
    }
}

/// Applies ticks to the shared store.
pub struct Reconciler {
    store: Arc<InstrumentStore>,
    processed: u64,
    ignored: u64,
}

impl Reconciler {
    pub fn new(store: Arc<InstrumentStore>) -> Self {
        Self {
            store,
            processed: 0,
            ignored: 0,
        }
    }

    /// Apply `tick` and derive its direction from the stored prior price.
    pub fn process(&mut self, tick: &Tick) -> Reconciled {
        let Some((instrument, prior)) = self.store.apply(tick) else {
            self.ignored += 1;
            Metrics::tick_ignored("unknown_symbol");
            trace!(symbol = %tick.symbol, "Ignoring tick for unknown symbol");
            return Reconciled::Ignored;
        };

        self.processed += 1;
        Metrics::tick_processed();

        let event = ReconciliationEvent::new(instrument.symbol, prior, tick.price, tick.change);
        trace!(
            symbol = %event.symbol,
            previous = %event.previous_price,
            price = %event.price,
            direction = %event.direction,
            "Tick reconciled"
        );
        Reconciled::Event(event)
    }

    pub fn processed_count(&self) -> u64 {
        self.processed
    }

    pub fn ignored_count(&self) -> u64 {
        self.ignored
    }

    pub fn store(&self) -> &Arc<InstrumentStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::RawSnapshotEntry;
    use pulse_core::{Direction, Percent, Price, Symbol};
    use rust_decimal_macros::dec;

    fn reconciler() -> Reconciler {
        let store = InstrumentStore::new("USDT");
        store
            .load(&[
                RawSnapshotEntry::new("AUSDT", "10", "0", "100"),
                RawSnapshotEntry::new("BUSDT", "5", "0", "200"),
            ])
            .unwrap();
        Reconciler::new(Arc::new(store))
    }

    fn tick(symbol: &str, price: rust_decimal::Decimal) -> Tick {
        Tick::new(
            Symbol::new(symbol).unwrap(),
            Price::new(price),
            Percent::new(dec!(2.5)),
        )
    }

    #[test]
    fn test_direction_from_prior_price() {
        let mut reconciler = reconciler();

        let up = reconciler.process(&tick("BUSDT", dec!(6)));
        let event = up.event().unwrap();
        assert_eq!(event.previous_price, Price::new(dec!(5)));
        assert_eq!(event.price, Price::new(dec!(6)));
        assert_eq!(event.direction, Direction::Up);
        assert_eq!(event.change, Percent::new(dec!(2.5)));

        let down = reconciler.process(&tick("BUSDT", dec!(4)));
        assert_eq!(down.event().unwrap().direction, Direction::Down);

        let flat = reconciler.process(&tick("BUSDT", dec!(4.00)));
        assert_eq!(flat.event().unwrap().direction, Direction::Unchanged);
    }

    #[test]
    fn test_unknown_symbol_is_ignored() {
        let mut reconciler = reconciler();
        assert_eq!(reconciler.process(&tick("ZZZUSDT", dec!(1))), Reconciled::Ignored);
        assert_eq!(reconciler.ignored_count(), 1);
        assert_eq!(reconciler.processed_count(), 0);
    }

    #[test]
    fn test_one_event_per_tick_in_order() {
        let mut reconciler = reconciler();
        let prices = [dec!(11), dec!(11), dec!(9), dec!(12)];
        let directions: Vec<_> = prices
            .iter()
            .map(|p| reconciler.process(&tick("AUSDT", *p)))
            .map(|r| r.event().map(|e| e.direction))
            .collect();

        assert_eq!(
            directions,
            vec![
                Some(Direction::Up),
                Some(Direction::Unchanged),
                Some(Direction::Down),
                Some(Direction::Up),
            ]
        );
        assert_eq!(reconciler.processed_count(), 4);
    }

    #[test]
    fn test_watched_or_not_every_known_symbol_is_processed() {
        // The stream may deliver any symbol in the store, not only the watch set.
        let mut reconciler = reconciler();
        let result = reconciler.process(&tick("AUSDT", dec!(11)));
        assert!(result.event().is_some());
        assert_eq!(
            reconciler.store().get(&Symbol::new("AUSDT").unwrap()).unwrap().price,
            Price::new(dec!(11))
        );
    }
}
