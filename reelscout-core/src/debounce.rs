//! Debounce stage for rate-limiting downstream work.
//!
//! Pure timer logic driven by an injected clock. Callers feed raw values in
//! with [`Debouncer::push`] and ask [`Debouncer::poll`] whether the latest
//! value has been quiet long enough to emit. Using `tokio::time::Instant`
//! keeps the stage deterministic under tokio's paused test clock.

use std::time::Duration;

use tokio::time::Instant;

/// Emits a value only after it has stopped changing for a quiet interval.
///
/// Every push restarts the timer, so a burst of updates produces at most one
/// emission carrying the final value. Values equal to the last emitted one
/// are swallowed: the debounced value did not change, so nothing downstream
/// needs to react.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet_interval: Duration,
    settled: T,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    last_change: Instant,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// Creates a debouncer whose settled value starts as `initial`.
    pub fn new(initial: T, quiet_interval: Duration) -> Self {
        Self {
            quiet_interval,
            settled: initial,
            pending: None,
        }
    }

    /// Records a new raw value observed at `now` and restarts the quiet timer.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            last_change: now,
        });
    }

    /// Instant at which the pending value settles, if any value is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending
            .as_ref()
            .map(|pending| pending.last_change + self.quiet_interval)
    }

    /// Returns the pending value once it has been quiet for the full interval
    /// and differs from the current settled value.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }

        let pending = self.pending.take()?;
        if pending.value == self.settled {
            return None;
        }

        self.settled = pending.value.clone();
        Some(pending.value)
    }
}
