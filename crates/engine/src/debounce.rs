//! Coalescing policy for bursty filter input.
//!
//! A burst of keystrokes must yield at most one view recompute, and the
//! recompute must use the latest value: edits are superseded, never
//! dropped without a replacement. The policy lives at the interface
//! boundary; the filtering algorithm itself stays synchronous.

use std::time::{Duration, Instant};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEdit {
    pub column: String,
    pub value: String,
}

#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<FilterEdit>,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            deadline: None,
        }
    }

    /// Record an edit and restart the quiet period. A newer edit replaces
    /// the pending one.
    pub fn submit(&mut self, column: &str, value: &str, now: Instant) {
        self.pending = Some(FilterEdit {
            column: column.to_string(),
            value: value.to_string(),
        });
        self.deadline = Some(now + self.quiet);
    }

    /// Yield the pending edit once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<FilterEdit> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Yield the pending edit immediately (e.g. when a run boundary must
    /// not lose the latest input).
    pub fn flush(&mut self) -> Option<FilterEdit> {
        self.deadline = None;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
