//! Streaming price feed client
//!
//! Keeps a single WebSocket connection to the price streamer and fans
//! per-ticker price updates out to any number of local callbacks.
//!
//! Connection settings are read from the environment:
//! - `TICKER_FEED_URL` - streamer endpoint
//! - `TICKER_FEED_API_KEY` - API key appended to the connect URL

pub mod config;
pub mod multiplexer;
pub mod queue;
pub mod registry;
pub mod transport;
pub mod websocket;

pub use config::FeedConfig;
pub use multiplexer::TickerMultiplexer;
pub use queue::OutboundQueue;
pub use registry::{PriceCallback, SubscriptionRegistry};
pub use transport::{ConnectionState, Transport};
pub use websocket::{FeedMultiplexer, TickerFeed, WebSocketTransport};
