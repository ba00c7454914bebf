//! Inbound frame decoder
//!
//! Turns raw streamer frames into price events. Anything the decoder does
//! not recognise is dropped: the feed is best-effort and an odd frame is
//! never worth failing over.

use rust_decimal::Decimal;
use tracing::debug;

use crate::protocol::{
    InboundFrame, MESSAGE_INVALID_SUB, TYPE_PRICE_UPDATE, TYPE_SUBSCRIPTION_ERROR,
};
use crate::{SubscriptionTopic, Ticker};

/// A frame worth fanning out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedFrame {
    /// New aggregate price for a ticker
    PriceUpdate { ticker: Ticker, price: Decimal },
    /// The streamer rejected our subscription for a ticker
    InvalidSubscription { ticker: Ticker },
}

impl DecodedFrame {
    pub fn ticker(&self) -> &Ticker {
        match self {
            Self::PriceUpdate { ticker, .. } => ticker,
            Self::InvalidSubscription { ticker } => ticker,
        }
    }

    /// Price to hand to callbacks; zero marks a rejected subscription
    pub fn price(&self) -> Decimal {
        match self {
            Self::PriceUpdate { price, .. } => *price,
            Self::InvalidSubscription { .. } => Decimal::ZERO,
        }
    }
}

/// Decode a raw text frame
///
/// Non-JSON text (heartbeats, garbage) and JSON that does not fit
/// [`InboundFrame`] decode to `None`.
pub fn decode_frame(raw: &str) -> Option<DecodedFrame> {
    match serde_json::from_str::<InboundFrame>(raw) {
        Ok(frame) => decode_value(frame),
        Err(e) => {
            debug!("[Ticker WS] Failed to parse frame: {} ({})", raw, e);
            None
        }
    }
}

/// Decode an already-parsed frame
pub fn decode_value(frame: InboundFrame) -> Option<DecodedFrame> {
    match frame.msg_type.as_deref() {
        Some(TYPE_PRICE_UPDATE) => {
            // Updates that only touch volume fields carry no PRICE
            let price = frame.price?;
            let ticker = Ticker::from(frame.from_symbol?);
            Some(DecodedFrame::PriceUpdate { ticker, price })
        }
        Some(TYPE_SUBSCRIPTION_ERROR) => {
            if frame.message.as_deref() != Some(MESSAGE_INVALID_SUB) {
                debug!("[Ticker WS] Ignoring subscription error: {:?}", frame.message);
                return None;
            }
            let ticker = SubscriptionTopic::ticker(frame.parameter.as_deref()?)?;
            Some(DecodedFrame::InvalidSubscription { ticker })
        }
        other => {
            debug!("[Ticker WS] Ignoring message type: {:?}", other);
            None
        }
    }
}
