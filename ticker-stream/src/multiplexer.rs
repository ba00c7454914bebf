//! Ticker subscription multiplexer
//!
//! One streaming connection, any number of local price callbacks. Local
//! subscribe/unsubscribe calls become `SubAdd`/`SubRemove` frames, inbound
//! frames are decoded and fanned out to the callbacks for their ticker.

use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::Arc;
use ticker_core::{decode_frame, DecodedFrame, OutboundFrame, Ticker};
use tracing::{debug, info, warn};

use crate::queue::OutboundQueue;
use crate::registry::{fan_out, PriceCallback, SubscriptionRegistry};
use crate::transport::Transport;

/// Registry and queue share one lock so a subscribe's registry update and
/// its frame are ordered together against other callers.
#[derive(Debug, Default)]
struct MultiplexerState {
    registry: SubscriptionRegistry,
    queue: OutboundQueue,
}

/// Fans a single price stream out to local subscribers
pub struct TickerMultiplexer<T: Transport> {
    transport: T,
    state: Mutex<MultiplexerState>,
}

impl<T: Transport> TickerMultiplexer<T> {
    /// Create a multiplexer over a transport
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: Mutex::new(MultiplexerState::default()),
        }
    }

    /// Register `on_price` for a ticker and ask the streamer for its prices
    ///
    /// A `SubAdd` is sent on every call, even if the ticker already has
    /// callbacks.
    pub fn subscribe_to_ticker<F>(&self, ticker: impl Into<Ticker>, on_price: F)
    where
        F: Fn(Decimal) + Send + Sync + 'static,
    {
        self.subscribe_callback(ticker, Arc::new(on_price));
    }

    /// Same as [`subscribe_to_ticker`](Self::subscribe_to_ticker) for an
    /// already shared callback
    pub fn subscribe_callback(&self, ticker: impl Into<Ticker>, callback: PriceCallback) {
        let ticker = ticker.into();
        let mut state = self.state.lock();

        state.registry.register(ticker.clone(), callback);
        self.send(&mut state, OutboundFrame::subscribe(&ticker));

        debug!("[Ticker WS] Subscribed to {}", ticker);
    }

    /// Drop every callback for a ticker and ask the streamer to stop
    ///
    /// A `SubRemove` is sent even if the ticker had no callbacks.
    pub fn unsubscribe_from_ticker(&self, ticker: impl Into<Ticker>) {
        let ticker = ticker.into();
        let mut state = self.state.lock();

        state.registry.unregister(&ticker);
        self.send(&mut state, OutboundFrame::unsubscribe(&ticker));

        debug!("[Ticker WS] Unsubscribed from {}", ticker);
    }

    /// Decode an inbound frame and fan it out
    ///
    /// Returns the number of callbacks that ran. Frames that do not decode
    /// are dropped.
    pub fn handle_frame(&self, raw: &str) -> usize {
        match decode_frame(raw) {
            Some(frame) => self.dispatch(&frame),
            None => 0,
        }
    }

    /// Fan a decoded frame out to the callbacks for its ticker
    ///
    /// Callbacks run outside the state lock, so they may subscribe or
    /// unsubscribe themselves.
    pub fn dispatch(&self, frame: &DecodedFrame) -> usize {
        if let DecodedFrame::InvalidSubscription { ticker } = frame {
            warn!("[Ticker WS] Subscription rejected for {}", ticker);
        }

        let callbacks = self.state.lock().registry.callbacks(frame.ticker());
        fan_out(&callbacks, frame.ticker(), frame.price())
    }

    /// Readiness transition: flush frames held while connecting
    ///
    /// Returns the number of frames sent.
    pub fn handle_ready(&self) -> usize {
        let flushed = self.state.lock().queue.flush(&self.transport);
        info!("[Ticker WS] Connection ready, flushed {} queued frames", flushed);
        flushed
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Tickers with at least one registered callback
    pub fn subscribed_tickers(&self) -> Vec<Ticker> {
        let mut tickers = self.state.lock().registry.tickers();
        tickers.sort();
        tickers
    }

    pub fn callback_count(&self, ticker: &Ticker) -> usize {
        self.state.lock().registry.callback_count(ticker)
    }

    /// Frames waiting for the connection to become ready
    pub fn pending_frames(&self) -> usize {
        self.state.lock().queue.pending_len()
    }

    fn send(&self, state: &mut MultiplexerState, frame: OutboundFrame) {
        match frame.to_json() {
            Ok(json) => state.queue.enqueue_or_send(&self.transport, json),
            Err(e) => warn!("[Ticker WS] Failed to serialize {:?}: {}", frame.action, e),
        }
    }
}

impl<T: Transport> std::fmt::Debug for TickerMultiplexer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TickerMultiplexer")
            .field("tickers", &state.registry.len())
            .field("pending_frames", &state.queue.pending_len())
            .field("ready", &self.transport.is_ready())
            .finish()
    }
}
