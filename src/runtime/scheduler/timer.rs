//! Timer identifiers and the delayed-value producer.

use std::time::Duration;

use tokio::task;
use tokio::time;

use super::deferred::{deferred, Deferred};

/// Unique timer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl TimerId {
    /// Get the inner value.
    #[inline]
    pub fn inner(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TimerId {
    fn from(val: u64) -> Self {
        Self(val)
    }
}

impl std::fmt::Display for TimerId {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

/// Timer state.
///
/// Finished timers are not remembered individually; whether one fired or
/// was cleared only shows up in the scheduler stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Waiting for its deadline.
    Pending,
    /// Fired or cleared.
    Finished,
}

/// Timer ID generator.
#[derive(Debug)]
pub struct TimerIdGenerator {
    next_id: u64,
}

impl TimerIdGenerator {
    /// Create a new timer ID generator. IDs start at 1.
    #[inline]
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Generate the next timer ID.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        TimerId(id)
    }

    /// Whether `id` was handed out by this generator.
    #[inline]
    pub fn issued(
        &self,
        id: TimerId,
    ) -> bool {
        id.0 >= 1 && id.0 < self.next_id
    }
}

impl Default for TimerIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Produce `value` after `duration_ms` milliseconds.
///
/// Returns immediately; the handle resolves on a later turn of the current
/// `LocalSet` once the deadline has passed. There is no way to cancel it.
/// If the runtime shuts down first the handle is abandoned.
///
/// # Panics
///
/// if called outside of a `LocalSet`.
pub fn delay<T: 'static>(
    duration_ms: u64,
    value: T,
) -> Deferred<T> {
    let (resolver, handle) = deferred();
    task::spawn_local(async move {
        time::sleep(Duration::from_millis(duration_ms)).await;
        resolver.resolve(value);
    });
    handle
}
