//! Outbound frame queue
//!
//! Holds subscription commands issued before the connection is ready and
//! releases them, in order, on the readiness transition.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::transport::Transport;

/// Frames waiting for the connection to become ready
#[derive(Debug, Default)]
pub struct OutboundQueue {
    pending: VecDeque<String>,
    /// Set while a flush is owed to the pending frames
    flush_armed: bool,
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `frame` now if the transport is ready, otherwise hold it
    ///
    /// A frame is only sent directly when nothing is waiting ahead of it,
    /// so a readiness transition that has not been flushed yet cannot
    /// reorder frames.
    pub fn enqueue_or_send<T: Transport + ?Sized>(&mut self, transport: &T, frame: String) {
        if transport.is_ready() && self.pending.is_empty() {
            send_frame(transport, frame);
            return;
        }

        self.pending.push_back(frame);
        if !self.flush_armed {
            self.flush_armed = true;
            debug!("[Ticker WS] Connection not ready, holding frames until open");
        }
        debug!("[Ticker WS] Queued frame ({} pending)", self.pending.len());
    }

    /// Send every held frame in FIFO order and clear the queue
    ///
    /// Returns the number of frames handed to the transport. A second call
    /// without new frames in between is a no-op.
    pub fn flush<T: Transport + ?Sized>(&mut self, transport: &T) -> usize {
        if !self.flush_armed {
            return 0;
        }
        self.flush_armed = false;

        let count = self.pending.len();
        for frame in self.pending.drain(..) {
            send_frame(transport, frame);
        }

        debug!("[Ticker WS] Flushed {} queued frames", count);
        count
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_flush_armed(&self) -> bool {
        self.flush_armed
    }
}

fn send_frame<T: Transport + ?Sized>(transport: &T, frame: String) {
    if let Err(e) = transport.send(frame) {
        warn!("[Ticker WS] Failed to send frame: {}", e);
    }
}
