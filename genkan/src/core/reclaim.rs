use std::time::{Duration, Instant};

/// Delay between entering the background and the deferred memory flush.
pub const FLUSH_DELAY: Duration = Duration::from_secs(5);

/// At most one outstanding deferred flush, armed on PAUSE and cancelled by
/// the dispatcher on any later event. The main loop derives its receive
/// timeout from `fires_at` and performs the flush when the deadline passes.
#[derive(Debug, Default)]
pub struct FlushTimer {
    deadline: Option<Instant>,
}

impl FlushTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the flush. No-op while already armed.
    pub fn arm(&mut self, now: Instant) {
        if self.deadline.is_none() {
            self.deadline = Some(now + FLUSH_DELAY);
        }
    }

    /// Cancel any scheduled flush. Idempotent; cancellation is terminal,
    /// the timer is never resumed.
    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn fires_at(&self) -> Option<Instant> {
        self.deadline
    }

    /// If the deadline has passed, disarm and report that the flush action
    /// should run now. One-shot: a fired timer never fires again.
    pub fn take_fired(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(at) if at <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
