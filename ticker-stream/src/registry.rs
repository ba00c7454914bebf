//! Subscription registry
//!
//! Maps each ticker to the callbacks interested in its price. A ticker in
//! the registry always has at least one callback; the whole entry is the
//! unit of removal.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use rust_decimal::Decimal;
use ticker_core::Ticker;
use tracing::{debug, warn};

/// Callback invoked with each new price for a ticker
pub type PriceCallback = Arc<dyn Fn(Decimal) + Send + Sync>;

/// Ticker -> callbacks, in registration order
#[derive(Default)]
pub struct SubscriptionRegistry {
    subscriptions: HashMap<Ticker, Vec<PriceCallback>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback for a ticker, creating the entry if needed
    pub fn register(&mut self, ticker: Ticker, callback: PriceCallback) {
        let callbacks = self.subscriptions.entry(ticker.clone()).or_default();
        callbacks.push(callback);

        debug!(
            "[Ticker WS] Registered callback for {} ({} total)",
            ticker,
            callbacks.len()
        );
    }

    /// Drop every callback for a ticker
    ///
    /// Returns how many callbacks were removed.
    pub fn unregister(&mut self, ticker: &Ticker) -> usize {
        let removed = self
            .subscriptions
            .remove(ticker)
            .map(|callbacks| callbacks.len())
            .unwrap_or(0);

        debug!("[Ticker WS] Removed {} callbacks for {}", removed, ticker);
        removed
    }

    /// Snapshot of the callbacks for a ticker (empty if unknown)
    pub fn callbacks(&self, ticker: &Ticker) -> Vec<PriceCallback> {
        self.subscriptions.get(ticker).cloned().unwrap_or_default()
    }

    /// Invoke every callback for a ticker with `price`
    ///
    /// Returns the number of callbacks that completed.
    pub fn dispatch(&self, ticker: &Ticker, price: Decimal) -> usize {
        fan_out(&self.callbacks(ticker), ticker, price)
    }

    pub fn contains(&self, ticker: &Ticker) -> bool {
        self.subscriptions.contains_key(ticker)
    }

    pub fn callback_count(&self, ticker: &Ticker) -> usize {
        self.subscriptions
            .get(ticker)
            .map(|callbacks| callbacks.len())
            .unwrap_or(0)
    }

    pub fn tickers(&self) -> Vec<Ticker> {
        self.subscriptions.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl std::fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("tickers", &self.subscriptions.len())
            .finish()
    }
}

/// Call each callback in order, isolating panics
///
/// A panicking callback is logged and skipped; the rest still run.
pub(crate) fn fan_out(callbacks: &[PriceCallback], ticker: &Ticker, price: Decimal) -> usize {
    let mut completed = 0;
    for callback in callbacks {
        match catch_unwind(AssertUnwindSafe(|| callback(price))) {
            Ok(()) => completed += 1,
            Err(_) => warn!("[Ticker WS] Price callback for {} panicked", ticker),
        }
    }
    completed
}
