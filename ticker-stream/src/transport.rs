//! Transport seam between the multiplexer and the streaming connection

use ticker_core::TickerResult;

/// Lifecycle of the single streaming connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Connect in progress, frames must be held back
    Connecting,
    /// Connection accepts outbound frames
    Open,
    /// Connection is gone and will not come back
    Closed,
}

/// Outbound half of the streaming connection
///
/// Inbound frames and the readiness transition are pushed into the
/// multiplexer by whoever drives the connection, so the trait only covers
/// what the multiplexer asks of it.
///
/// `send` is called while the multiplexer holds its state lock: it must not
/// block and must not call back into the multiplexer.
pub trait Transport: Send + Sync {
    /// Whether the connection can take a frame right now
    fn is_ready(&self) -> bool;

    /// Hand a serialized frame to the connection
    ///
    /// Only called after `is_ready` returned true.
    fn send(&self, frame: String) -> TickerResult<()>;
}
