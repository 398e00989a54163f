//! Ticker stream message types.
//!
//! The combined-stream endpoint wraps every payload in an envelope:
//! `{"stream": "btcusdt@ticker", "data": {"e": "24hrTicker", "s": "BTCUSDT", ...}}`.
//! The single-stream endpoint sends the bare payload. Both are accepted.

use pulse_core::{CoreError, Percent, Price, Symbol, Tick};
use serde::Deserialize;
use thiserror::Error;

/// Event type carried by 24h rolling ticker payloads.
pub const TICKER_EVENT_TYPE: &str = "24hrTicker";

/// Why a single inbound frame could not be turned into a `Tick`.
///
/// Always recovered locally: the frame is dropped and the stream continues.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unexpected event type '{0}'")]
    UnexpectedEvent(String),

    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl DecodeError {
    fn field(field: &'static str, err: CoreError) -> Self {
        Self::InvalidField {
            field,
            reason: err.to_string(),
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::UnexpectedEvent(_) => "unexpected_event",
            Self::InvalidField { .. } => "invalid_field",
        }
    }
}

/// 24h rolling window ticker payload.
///
/// Only the fields the dashboard consumes are declared; the rest are ignored.
#[derive(Debug, Deserialize)]
pub struct TickerPayload {
    #[serde(rename = "e")]
    pub event_type: String,
    #[serde(rename = "E", default)]
    pub event_time: Option<i64>,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "c")]
    pub last_price: String,
    #[serde(rename = "P")]
    pub price_change_percent: String,
}

/// Combined-stream envelope.
#[derive(Debug, Deserialize)]
pub struct StreamEnvelope {
    pub stream: String,
    pub data: TickerPayload,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InboundFrame {
    Combined(StreamEnvelope),
    Bare(TickerPayload),
}

impl TryFrom<TickerPayload> for Tick {
    type Error = DecodeError;

    fn try_from(value: TickerPayload) -> Result<Self, Self::Error> {
        if value.event_type != TICKER_EVENT_TYPE {
            return Err(DecodeError::UnexpectedEvent(value.event_type));
        }

        let symbol = Symbol::new(&value.symbol).map_err(|e| DecodeError::field("s", e))?;
        let price =
            Price::parse_positive(&value.last_price).map_err(|e| DecodeError::field("c", e))?;
        let change = Percent::parse(&value.price_change_percent)
            .map_err(|e| DecodeError::field("P", e))?;

        Ok(Tick::new(symbol, price, change))
    }
}

/// Decode one raw text frame into a `Tick`.
pub fn decode_tick(raw: &str) -> Result<Tick, DecodeError> {
    let frame: InboundFrame = serde_json::from_str(raw)?;
    let payload = match frame {
        InboundFrame::Combined(envelope) => envelope.data,
        InboundFrame::Bare(payload) => payload,
    };
    payload.try_into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decode_combined_envelope() {
        let raw = r#"{"stream":"btcusdt@ticker","data":{"e":"24hrTicker","E":1700000000000,"s":"BTCUSDT","p":"120.5","P":"1.234","c":"67123.45000000","Q":"0.01","v":"100"}}"#;
        let tick = decode_tick(raw).expect("combined frame should decode");

        assert_eq!(tick.symbol.as_str(), "BTCUSDT");
        assert_eq!(tick.price, Price::new(dec!(67123.45)));
        assert_eq!(tick.change, Percent::new(dec!(1.234)));
    }

    #[test]
    fn test_decode_bare_payload() {
        let raw = r#"{"e":"24hrTicker","s":"ETHUSDT","c":"3000.10","P":"-0.50"}"#;
        let tick = decode_tick(raw).expect("bare frame should decode");

        assert_eq!(tick.symbol.as_str(), "ETHUSDT");
        assert_eq!(tick.change, Percent::new(dec!(-0.5)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_tick("not json").unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }

    #[test]
    fn test_decode_rejects_other_event_types() {
        let raw = r#"{"e":"aggTrade","s":"BTCUSDT","c":"1","P":"0"}"#;
        let err = decode_tick(raw).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEvent(ref e) if e == "aggTrade"));
    }

    #[test]
    fn test_decode_rejects_non_positive_price() {
        let raw = r#"{"e":"24hrTicker","s":"BTCUSDT","c":"0.00000000","P":"0"}"#;
        let err = decode_tick(raw).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidField { field: "c", .. }));
    }

    #[test]
    fn test_decode_rejects_unparseable_percent() {
        let raw = r#"{"e":"24hrTicker","s":"BTCUSDT","c":"10","P":"n/a"}"#;
        let err = decode_tick(raw).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidField { field: "P", .. }));
    }
}
