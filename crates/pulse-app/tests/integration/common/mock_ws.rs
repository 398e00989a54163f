//! Mock WebSocket server for integration tests.
//!
//! Provides a simple WebSocket server that can:
//! - Accept connections and record the requested path (subscription query)
//! - Push text frames to every connected client
//! - Close every connected client on demand
//! - Report total and currently open connections

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::{accept_hdr_async, tungstenite::Message};

#[derive(Debug, Clone)]
enum ServerCommand {
    Text(String),
    CloseAll,
}

#[derive(Default)]
struct Counters {
    total: u32,
    active: u32,
}

/// A mock WebSocket server for testing.
pub struct MockWsServer {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    commands: broadcast::Sender<ServerCommand>,
    counters: Arc<Mutex<Counters>>,
    paths: Arc<Mutex<Vec<String>>>,
}

impl MockWsServer {
    /// Start a new mock WebSocket server on an available port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let (commands, _) = broadcast::channel::<ServerCommand>(256);
        let counters = Arc::new(Mutex::new(Counters::default()));
        let paths = Arc::new(Mutex::new(Vec::new()));

        let commands_clone = commands.clone();
        let counters_clone = counters.clone();
        let paths_clone = paths.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Ok((stream, _)) = listener.accept() => {
                        tokio::spawn(handle_connection(
                            stream,
                            commands_clone.subscribe(),
                            counters_clone.clone(),
                            paths_clone.clone(),
                        ));
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx,
            commands,
            counters,
            paths,
        }
    }

    /// Combined-stream base URL served by this mock.
    pub fn url(&self) -> String {
        format!("ws://{}/stream", self.addr)
    }

    /// Connections accepted since start.
    pub fn connection_count(&self) -> u32 {
        self.counters.lock().unwrap().total
    }

    /// Connections currently open.
    pub fn active_connections(&self) -> u32 {
        self.counters.lock().unwrap().active
    }

    /// Request paths (with query) in connection order.
    pub fn request_paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    /// Push a text frame to every open connection.
    pub fn send_text(&self, text: impl Into<String>) {
        let _ = self.commands.send(ServerCommand::Text(text.into()));
    }

    /// Close every open connection from the server side.
    pub fn close_all(&self) {
        let _ = self.commands.send(ServerCommand::CloseAll);
    }

    /// Poll until `check` holds or `limit` elapses.
    pub async fn wait_until(&self, limit: Duration, check: impl Fn(&Self) -> bool) -> bool {
        let deadline = tokio::time::Instant::now() + limit;
        while tokio::time::Instant::now() < deadline {
            if check(self) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        check(self)
    }

    /// Shutdown the server.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// 24h ticker frame in the combined-stream envelope.
pub fn ticker_frame(symbol: &str, price: &str, percent: &str) -> String {
    serde_json::json!({
        "stream": format!("{}@ticker", symbol.to_ascii_lowercase()),
        "data": {
            "e": "24hrTicker",
            "E": 1_700_000_000_000_i64,
            "s": symbol,
            "c": price,
            "P": percent,
        }
    })
    .to_string()
}

async fn handle_connection(
    stream: TcpStream,
    mut commands: broadcast::Receiver<ServerCommand>,
    counters: Arc<Mutex<Counters>>,
    paths: Arc<Mutex<Vec<String>>>,
) {
    let record_path = paths.clone();
    let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
        record_path.lock().unwrap().push(req.uri().to_string());
        Ok(resp)
    };

    let ws_stream = match accept_hdr_async(stream, callback).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("WebSocket handshake failed: {}", e);
            return;
        }
    };

    {
        let mut c = counters.lock().unwrap();
        c.total += 1;
        c.active += 1;
    }

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            cmd = commands.recv() => {
                match cmd {
                    Ok(ServerCommand::Text(text)) => {
                        if write.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    Ok(ServerCommand::CloseAll) => {
                        let _ = write.send(Message::Close(None)).await;
                        break;
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        let _ = write.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }

    counters.lock().unwrap().active -= 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_starts() {
        let server = MockWsServer::start().await;
        assert!(server.url().starts_with("ws://127.0.0.1:"));
        assert_eq!(server.connection_count(), 0);
        server.shutdown().await;
    }

    #[test]
    fn test_ticker_frame_shape() {
        let frame = ticker_frame("BTCUSDT", "1.5", "0.1");
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["stream"], "btcusdt@ticker");
        assert_eq!(value["data"]["c"], "1.5");
    }
}
