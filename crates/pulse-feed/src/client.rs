//! HTTP client for the 24h ticker snapshot.
//!
//! One-shot `GET /api/v3/ticker/24hr`, filtered to the configured quote
//! asset before it reaches the store.

use crate::error::{FeedError, FeedResult};
use crate::snapshot::{filter_quote_asset, RawSnapshotEntry};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Path of the 24h rolling ticker endpoint.
pub const TICKER_24H_PATH: &str = "/api/v3/ticker/24hr";

/// Client for fetching the instrument snapshot.
pub struct SnapshotClient {
    client: Client,
    url: String,
    quote_asset: String,
}

impl SnapshotClient {
    /// Create a new snapshot client.
    ///
    /// # Arguments
    /// * `rest_url` - REST base URL (e.g., "https://api.binance.com")
    /// * `quote_asset` - Quote currency family to keep (e.g., "USDT")
    pub fn new(rest_url: &str, quote_asset: impl Into<String>) -> FeedResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| FeedError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: format!("{}{}", rest_url.trim_end_matches('/'), TICKER_24H_PATH),
            quote_asset: quote_asset.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the snapshot and keep only pairs quoted in the configured asset.
    ///
    /// Every failure maps to `FeedError::SnapshotLoad`.
    pub async fn fetch(&self) -> FeedResult<Vec<RawSnapshotEntry>> {
        info!(url = %self.url, "Fetching instrument snapshot");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FeedError::SnapshotLoad(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::SnapshotLoad(format!("HTTP {status}: {body}")));
        }

        let entries: Vec<RawSnapshotEntry> = response
            .json()
            .await
            .map_err(|e| FeedError::SnapshotLoad(format!("Failed to parse response: {e}")))?;

        let total = entries.len();
        let kept = filter_quote_asset(entries, &self.quote_asset);
        debug!(total, kept = kept.len(), quote = %self.quote_asset, "Snapshot filtered");

        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP response on a local port.
    async fn serve_once(status: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let client = SnapshotClient::new("https://api.binance.com/", "USDT").unwrap();
        assert_eq!(client.url(), "https://api.binance.com/api/v3/ticker/24hr");
    }

    #[tokio::test]
    async fn test_fetch_filters_quote_asset() {
        let body = r#"[
            {"symbol":"BTCUSDT","lastPrice":"67000.00","priceChangePercent":"1.5","quoteVolume":"1000"},
            {"symbol":"ETHBTC","lastPrice":"0.05","priceChangePercent":"0.1","quoteVolume":"10"},
            {"symbol":"ETHUSDT","lastPrice":"3000.00","priceChangePercent":"-0.5","quoteVolume":"900"}
        ]"#;
        let base = serve_once("200 OK", body).await;
        let client = SnapshotClient::new(&base, "USDT").unwrap();

        let entries = client.fetch().await.unwrap();
        let symbols: Vec<_> = entries.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BTCUSDT", "ETHUSDT"]);
    }

    #[tokio::test]
    async fn test_fetch_maps_http_error_to_snapshot_load() {
        let base = serve_once("503 Service Unavailable", "{}").await;
        let client = SnapshotClient::new(&base, "USDT").unwrap();

        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::SnapshotLoad(ref msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_fetch_maps_bad_body_to_snapshot_load() {
        let base = serve_once("200 OK", r#"{"code":-1121}"#).await;
        let client = SnapshotClient::new(&base, "USDT").unwrap();

        assert!(matches!(
            client.fetch().await,
            Err(FeedError::SnapshotLoad(_))
        ));
    }
}
