//! WebSocket connection to the price streamer
//!
//! Connects once, reports readiness to the multiplexer, then pumps frames
//! both ways until the connection drops. There is no reconnect: once the
//! connection is closed the feed stays silent.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use ticker_core::{TickerError, TickerResult};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::FeedConfig;
use crate::multiplexer::TickerMultiplexer;
use crate::transport::{ConnectionState, Transport};

/// Outbound half of the WebSocket connection
///
/// Frames are pushed onto a channel drained by the connection task, so
/// `send` never blocks.
pub struct WebSocketTransport {
    state: RwLock<ConnectionState>,
    outbound_tx: mpsc::UnboundedSender<String>,
}

impl WebSocketTransport {
    fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        (
            Self {
                state: RwLock::new(ConnectionState::Connecting),
                outbound_tx,
            },
            outbound_rx,
        )
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    fn set_state(&self, state: ConnectionState) {
        *self.state.write() = state;
    }
}

impl Transport for WebSocketTransport {
    fn is_ready(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    fn send(&self, frame: String) -> TickerResult<()> {
        self.outbound_tx
            .send(frame)
            .map_err(|_| TickerError::transport("connection task has exited"))
    }
}

impl std::fmt::Debug for WebSocketTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketTransport")
            .field("state", &self.state())
            .finish()
    }
}

/// Multiplexer over the live WebSocket connection
pub type FeedMultiplexer = TickerMultiplexer<WebSocketTransport>;

/// Handle to a running price feed
pub struct TickerFeed {
    multiplexer: Arc<FeedMultiplexer>,
    task: JoinHandle<()>,
}

impl TickerFeed {
    /// Start the feed on the current tokio runtime
    ///
    /// Returns as soon as the connection task is spawned. Subscriptions
    /// made before the connection opens are held and sent on open.
    pub fn connect(config: FeedConfig) -> TickerResult<Self> {
        let url = config.connect_url()?;
        let (transport, outbound_rx) = WebSocketTransport::new();
        let multiplexer = Arc::new(TickerMultiplexer::new(transport));

        let task = tokio::spawn(Self::connection_task(
            url,
            config.endpoint.clone(),
            Arc::clone(&multiplexer),
            outbound_rx,
        ));

        Ok(Self { multiplexer, task })
    }

    /// Shared multiplexer for collaborators to subscribe through
    pub fn multiplexer(&self) -> Arc<FeedMultiplexer> {
        Arc::clone(&self.multiplexer)
    }

    pub fn state(&self) -> ConnectionState {
        self.multiplexer.transport().state()
    }

    /// Wait for the connection to end
    pub async fn closed(self) {
        if let Err(e) = self.task.await {
            error!("[Ticker WS] Connection task failed: {}", e);
        }
    }

    /// Tear the connection down without waiting for the server
    pub fn abort(&self) {
        self.task.abort();
        self.multiplexer.transport().set_state(ConnectionState::Closed);
    }

    async fn connection_task(
        url: Url,
        endpoint: String,
        multiplexer: Arc<FeedMultiplexer>,
        mut outbound_rx: mpsc::UnboundedReceiver<String>,
    ) {
        // The connect URL carries the API key, log the bare endpoint
        info!("[Ticker WS] Connecting to {}", endpoint);

        match connect_async(url.as_str()).await {
            Ok((ws_stream, _)) => {
                info!("[Ticker WS] Connected successfully");
                multiplexer.transport().set_state(ConnectionState::Open);
                multiplexer.handle_ready();

                let (mut write, mut read) = ws_stream.split();

                loop {
                    tokio::select! {
                        msg = read.next() => {
                            match msg {
                                Some(Ok(Message::Text(text))) => {
                                    multiplexer.handle_frame(&text);
                                }
                                Some(Ok(Message::Ping(data))) => {
                                    if let Err(e) = write.send(Message::Pong(data)).await {
                                        warn!("[Ticker WS] Failed to send pong: {}", e);
                                        break;
                                    }
                                }
                                Some(Ok(Message::Close(frame))) => {
                                    info!("[Ticker WS] Connection closed by server: {:?}", frame);
                                    break;
                                }
                                Some(Err(e)) => {
                                    error!("[Ticker WS] Error: {}", e);
                                    break;
                                }
                                None => {
                                    info!("[Ticker WS] Stream ended");
                                    break;
                                }
                                _ => {}
                            }
                        }

                        frame = outbound_rx.recv() => {
                            let Some(frame) = frame else { break };
                            debug!("[Ticker WS] Sending {}", frame);
                            if let Err(e) = write.send(Message::Text(frame.into())).await {
                                warn!("[Ticker WS] Failed to send frame: {}", e);
                                break;
                            }
                        }
                    }
                }
            }
            Err(e) => {
                error!("[Ticker WS] Connection failed: {}", e);
            }
        }

        multiplexer.transport().set_state(ConnectionState::Closed);
        info!("[Ticker WS] Connection closed, feed is now silent");
    }
}

impl std::fmt::Debug for TickerFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickerFeed")
            .field("multiplexer", &self.multiplexer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticker_core::Ticker;

    #[test]
    fn test_transport_not_ready_until_open() {
        let (transport, _rx) = WebSocketTransport::new();
        assert_eq!(transport.state(), ConnectionState::Connecting);
        assert!(!transport.is_ready());

        transport.set_state(ConnectionState::Open);
        assert!(transport.is_ready());

        transport.set_state(ConnectionState::Closed);
        assert!(!transport.is_ready());
    }

    #[test]
    fn test_transport_send_after_task_exit() {
        let (transport, rx) = WebSocketTransport::new();
        drop(rx);
        assert!(matches!(
            transport.send("x".to_string()),
            Err(TickerError::Transport(_))
        ));
    }

    #[test]
    fn test_frames_reach_channel_on_ready() {
        let (transport, mut rx) = WebSocketTransport::new();
        let multiplexer = TickerMultiplexer::new(transport);

        multiplexer.subscribe_to_ticker("BTC", |_| {});
        assert!(rx.try_recv().is_err());

        multiplexer.transport().set_state(ConnectionState::Open);
        assert_eq!(multiplexer.handle_ready(), 1);
        assert_eq!(
            rx.try_recv().unwrap(),
            r#"{"action":"SubAdd","subs":["5~CCCAGG~BTC~USD"]}"#
        );

        multiplexer.unsubscribe_from_ticker(Ticker::from("BTC"));
        assert_eq!(
            rx.try_recv().unwrap(),
            r#"{"action":"SubRemove","subs":["5~CCCAGG~BTC~USD"]}"#
        );
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_url() {
        let config = FeedConfig::new("ftp://example.com", None);
        assert!(matches!(
            TickerFeed::connect(config),
            Err(TickerError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_feed_closes_when_connect_fails() {
        // Nothing listens on the discard port
        let config = FeedConfig::new("ws://127.0.0.1:9", None);
        let feed = TickerFeed::connect(config).unwrap();
        let multiplexer = feed.multiplexer();

        multiplexer.subscribe_to_ticker("BTC", |_| {});
        feed.closed().await;

        assert_eq!(multiplexer.transport().state(), ConnectionState::Closed);
        // Never opened, so the frame is still held
        assert_eq!(multiplexer.pending_frames(), 1);
    }
}
