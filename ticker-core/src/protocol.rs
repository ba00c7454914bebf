//! Wire message types for the streaming price feed
//!
//! Outbound frames are subscription commands, inbound frames are whatever
//! the streamer pushes. Only the fields the decoder consumes are modelled.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{SubscriptionTopic, Ticker, TickerResult};

// ============================================================================
// Client -> Streamer
// ============================================================================

/// Subscription command verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionAction {
    SubAdd,
    SubRemove,
}

/// Subscription command sent to the streamer
///
/// Serializes as `{"action":"SubAdd","subs":["5~CCCAGG~BTC~USD"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundFrame {
    pub action: SubscriptionAction,
    pub subs: Vec<SubscriptionTopic>,
}

impl OutboundFrame {
    /// `SubAdd` for a single ticker
    pub fn subscribe(ticker: &Ticker) -> Self {
        Self {
            action: SubscriptionAction::SubAdd,
            subs: vec![SubscriptionTopic::for_ticker(ticker)],
        }
    }

    /// `SubRemove` for a single ticker
    pub fn unsubscribe(ticker: &Ticker) -> Self {
        Self {
            action: SubscriptionAction::SubRemove,
            subs: vec![SubscriptionTopic::for_ticker(ticker)],
        }
    }

    pub fn to_json(&self) -> TickerResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================================================
// Streamer -> Client
// ============================================================================

/// Message type discriminant for an aggregate-index price update
pub const TYPE_PRICE_UPDATE: &str = "5";

/// Message type discriminant for a subscription error
pub const TYPE_SUBSCRIPTION_ERROR: &str = "500";

/// Error message text for a rejected subscription
pub const MESSAGE_INVALID_SUB: &str = "INVALID_SUB";

/// Raw inbound frame
///
/// Every field is optional; which ones are required depends on `TYPE`.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InboundFrame {
    #[serde(rename = "TYPE", default)]
    pub msg_type: Option<String>,
    #[serde(rename = "PRICE", default)]
    pub price: Option<Decimal>,
    #[serde(rename = "FROMSYMBOL", default)]
    pub from_symbol: Option<String>,
    #[serde(rename = "MESSAGE", default)]
    pub message: Option<String>,
    #[serde(rename = "PARAMETER", default)]
    pub parameter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_subscribe_frame_json() {
        let json = OutboundFrame::subscribe(&Ticker::from("BTC")).to_json().unwrap();
        assert_eq!(json, r#"{"action":"SubAdd","subs":["5~CCCAGG~BTC~USD"]}"#);
    }

    #[test]
    fn test_unsubscribe_frame_json() {
        let json = OutboundFrame::unsubscribe(&Ticker::from("DOGE")).to_json().unwrap();
        assert_eq!(json, r#"{"action":"SubRemove","subs":["5~CCCAGG~DOGE~USD"]}"#);
    }

    #[test]
    fn test_inbound_frame_price_is_exact() {
        let frame: InboundFrame =
            serde_json::from_str(r#"{"TYPE":"5","MARKET":"CCCAGG","FROMSYMBOL":"BTC","TOSYMBOL":"USD","FLAGS":1,"PRICE":100.5}"#)
                .unwrap();
        assert_eq!(frame.msg_type.as_deref(), Some("5"));
        assert_eq!(frame.from_symbol.as_deref(), Some("BTC"));
        assert_eq!(frame.price, Some(dec!(100.5)));
    }

    #[test]
    fn test_inbound_frame_missing_fields() {
        let frame: InboundFrame = serde_json::from_str(r#"{"TYPE":"999"}"#).unwrap();
        assert_eq!(frame.price, None);
        assert_eq!(frame.from_symbol, None);
        assert_eq!(frame.message, None);
        assert_eq!(frame.parameter, None);
    }
}
