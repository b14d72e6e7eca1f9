//! Debouncing of rapidly changing values.
//!
//! [`DebounceTimer`] owns the countdown as a pinned [`Sleep`]; dropping or
//! cancelling the timer deregisters it, so a torn-down owner can never see a
//! late update. The countdown only advances while the owner awaits
//! [`DebounceTimer::elapsed`], which makes it safe to race in `tokio::select!`.

use std::pin::Pin;
use std::time::Duration;

use tokio::time::{sleep, Instant, Sleep};

/// Delays propagation of an observed value until it has stayed unchanged
/// for the requested quiescence interval.
pub struct DebounceTimer<T> {
    observed: T,
    debounced: T,
    delay: Duration,
    countdown: Option<Pin<Box<Sleep>>>,
}

impl<T: Clone + PartialEq> DebounceTimer<T> {
    /// Starts settled on `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            observed: initial.clone(),
            debounced: initial,
            delay: Duration::ZERO,
            countdown: None,
        }
    }

    /// Records `value` and returns the current debounced value.
    ///
    /// A value different from the last observed one restarts the countdown at
    /// `delay`. A zero delay commits immediately. Must be called from within a
    /// Tokio runtime when `delay` is non-zero.
    pub fn observe(&mut self, value: T, delay: Duration) -> &T {
        if value == self.observed {
            return &self.debounced;
        }
        self.observed = value;
        self.delay = delay;
        if delay.is_zero() {
            self.countdown = None;
            self.debounced = self.observed.clone();
            return &self.debounced;
        }
        let deadline = Instant::now() + delay;
        match self.countdown.as_mut() {
            Some(countdown) => countdown.as_mut().reset(deadline),
            None => self.countdown = Some(Box::pin(sleep(delay))),
        }
        &self.debounced
    }

    /// Waits for the pending countdown and commits the observed value.
    ///
    /// Returns the new debounced value, or `None` when the countdown ran out
    /// without changing it (the value moved away and back). Never resolves
    /// while nothing is pending. Cancel-safe.
    pub async fn elapsed(&mut self) -> Option<T> {
        match self.countdown.as_mut() {
            Some(countdown) => countdown.as_mut().await,
            None => std::future::pending::<()>().await,
        }
        self.countdown = None;
        if self.debounced == self.observed {
            return None;
        }
        self.debounced = self.observed.clone();
        Some(self.debounced.clone())
    }

    /// Drops any pending countdown. The debounced value is left as is.
    /// Calling it again, or with nothing pending, does nothing.
    pub fn cancel(&mut self) {
        self.countdown = None;
    }

    /// Settles both the observed and debounced value on `value` at once.
    pub fn reset(&mut self, value: T) {
        self.cancel();
        self.observed = value.clone();
        self.debounced = value;
    }

    pub fn is_pending(&self) -> bool {
        self.countdown.is_some()
    }

    /// Last value passed to [`DebounceTimer::observe`].
    pub fn observed(&self) -> &T {
        &self.observed
    }

    /// Value as of the last completed quiescence interval.
    pub fn value(&self) -> &T {
        &self.debounced
    }

    /// Delay used by the most recent restart.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Read-only view of a debounced search box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchDebounce {
    /// The debounced term the backend is queried with.
    pub query: String,
    /// The raw term differs from the debounced one.
    pub is_searching: bool,
    pub has_query: bool,
    pub has_debounced_query: bool,
}

impl SearchDebounce {
    pub fn from_timer(timer: &DebounceTimer<String>) -> Self {
        Self {
            query: timer.value().clone(),
            is_searching: timer.observed() != timer.value(),
            has_query: !timer.observed().trim().is_empty(),
            has_debounced_query: !timer.value().trim().is_empty(),
        }
    }
}
