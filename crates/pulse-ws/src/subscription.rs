//! Subscription addressing for the combined ticker stream.
//!
//! One topic per watched symbol, `<lowercase symbol>@ticker`, joined by `/`
//! into the `streams` query parameter of the combined-stream endpoint.

use crate::error::{WsError, WsResult};
use pulse_core::{Symbol, WatchSet};

/// Stream suffix for the 24h rolling ticker.
pub const TICKER_TOPIC_SUFFIX: &str = "@ticker";

/// Topic name for one symbol.
pub fn topic_for(symbol: &Symbol) -> String {
    format!("{}{}", symbol.stream_name(), TICKER_TOPIC_SUFFIX)
}

/// All topics of the watch set joined by `/`, in watch-set order.
pub fn stream_path(watch_set: &WatchSet) -> String {
    watch_set
        .iter()
        .map(topic_for)
        .collect::<Vec<_>>()
        .join("/")
}

/// Full combined-stream URL addressing every symbol of the watch set.
///
/// `base_url` is the combined endpoint without query (e.g.
/// `wss://stream.binance.com:9443/stream`).
pub fn combined_stream_url(base_url: &str, watch_set: &WatchSet) -> WsResult<String> {
    if watch_set.is_empty() {
        return Err(WsError::EmptyWatchSet);
    }
    let base = base_url.trim_end_matches(['/', '?']);
    Ok(format!("{base}?streams={}", stream_path(watch_set)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watch_set(symbols: &[&str]) -> WatchSet {
        WatchSet::bounded(symbols.iter().map(|s| Symbol::new(s).unwrap()), 40)
    }

    #[test]
    fn test_topic_uses_lowercase_symbol() {
        let symbol = Symbol::new("BTCUSDT").unwrap();
        assert_eq!(topic_for(&symbol), "btcusdt@ticker");
    }

    #[test]
    fn test_stream_path_joins_in_order() {
        let set = watch_set(&["BTCUSDT", "ETHUSDT", "SOLUSDT"]);
        assert_eq!(
            stream_path(&set),
            "btcusdt@ticker/ethusdt@ticker/solusdt@ticker"
        );
    }

    #[test]
    fn test_combined_url() {
        let set = watch_set(&["BTCUSDT", "ETHUSDT"]);
        let url = combined_stream_url("wss://stream.binance.com:9443/stream/", &set).unwrap();
        assert_eq!(
            url,
            "wss://stream.binance.com:9443/stream?streams=btcusdt@ticker/ethusdt@ticker"
        );
    }

    #[test]
    fn test_combined_url_rejects_empty_watch_set() {
        let result = combined_stream_url("wss://example.test/stream", &WatchSet::default());
        assert!(matches!(result, Err(WsError::EmptyWatchSet)));
    }
}
