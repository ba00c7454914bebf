//! Core types for the ticker price feed
//!
//! This crate holds everything that does not need an async runtime:
//! ticker symbols and their subscription topics, the outbound and
//! inbound wire formats, and the decoder that turns raw frames into
//! price events.

pub mod decoder;
pub mod error;
pub mod protocol;
pub mod ticker;

pub use decoder::{decode_frame, decode_value, DecodedFrame};
pub use error::{TickerError, TickerResult};
pub use protocol::{InboundFrame, OutboundFrame, SubscriptionAction};
pub use ticker::{SubscriptionTopic, Ticker};
