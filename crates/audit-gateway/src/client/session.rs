//! Per-connection session state shared by the read loop and heartbeat task

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

/// State of the current gateway session
#[derive(Debug)]
pub struct SessionState {
    /// Last dispatch sequence number
    sequence: Mutex<Option<u64>>,

    /// Whether the last heartbeat was acknowledged
    heartbeat_acked: AtomicBool,

    /// READY received
    ready: AtomicBool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            sequence: Mutex::new(None),
            heartbeat_acked: AtomicBool::new(true),
            ready: AtomicBool::new(false),
        }
    }

    pub fn sequence(&self) -> Option<u64> {
        *self.sequence.lock()
    }

    /// Record a dispatch sequence; older numbers never overwrite newer ones
    pub fn observe_sequence(&self, sequence: u64) {
        let mut current = self.sequence.lock();
        if current.map_or(true, |s| sequence > s) {
            *current = Some(sequence);
        }
    }

    pub fn ack_heartbeat(&self) {
        self.heartbeat_acked.store(true, Ordering::Release);
    }

    /// Consume the ACK flag before sending the next heartbeat
    ///
    /// Returns `false` when the previous heartbeat was never acknowledged.
    pub fn take_heartbeat_ack(&self) -> bool {
        self.heartbeat_acked.swap(false, Ordering::AcqRel)
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}
