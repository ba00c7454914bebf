//! Ticker symbols and the subscription topics derived from them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregate index the feed prices come from
pub const EXCHANGE_AGGREGATE: &str = "CCCAGG";

/// Currency every ticker is quoted in
pub const QUOTE_CURRENCY: &str = "USD";

/// Channel id of the aggregate-index price stream
pub const AGGREGATE_INDEX_CHANNEL: &str = "5";

/// Separator between topic segments
const TOPIC_DELIMITER: char = '~';

/// Position of the instrument inside `<channel>~<aggregate>~<instrument>~<quote>`
const TOPIC_INSTRUMENT_INDEX: usize = 2;

/// Symbol identifying a tradeable instrument (e.g. "BTC")
///
/// Taken verbatim: the feed echoes the symbol back in `FROMSYMBOL` and the
/// registry lookup is an exact match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ticker {
    fn from(symbol: &str) -> Self {
        Self(symbol.to_string())
    }
}

impl From<String> for Ticker {
    fn from(symbol: String) -> Self {
        Self(symbol)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Wire-level channel name for a ticker's price stream
///
/// Always derived from a [`Ticker`], never stored on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionTopic(String);

impl SubscriptionTopic {
    /// Build the topic `5~CCCAGG~<ticker>~USD`
    pub fn for_ticker(ticker: &Ticker) -> Self {
        Self(format!(
            "{AGGREGATE_INDEX_CHANNEL}{TOPIC_DELIMITER}{EXCHANGE_AGGREGATE}{TOPIC_DELIMITER}{ticker}{TOPIC_DELIMITER}{QUOTE_CURRENCY}"
        ))
    }

    /// Recover the instrument segment from a raw topic string
    ///
    /// Returns `None` when the topic has fewer than three segments.
    pub fn ticker(raw: &str) -> Option<Ticker> {
        raw.split(TOPIC_DELIMITER)
            .nth(TOPIC_INSTRUMENT_INDEX)
            .map(Ticker::from)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Ticker> for SubscriptionTopic {
    fn from(ticker: &Ticker) -> Self {
        Self::for_ticker(ticker)
    }
}
