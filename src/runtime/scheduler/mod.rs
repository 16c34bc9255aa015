//! Cooperative timer scheduler
//!
//! Everything here runs on one thread: a current-thread tokio runtime driving
//! a `LocalSet`. Synchronous script code runs to completion, timers and
//! continuations run as later turns of the same loop.
//!
//! ```text
//! script ── set_timeout / delay ──▶ spawn_local(sleep → callback)
//!                                   │
//! EventLoop::run ── block_on(script) ─┴─▶ drain LocalSet until idle
//! ```

pub mod deferred;
pub mod timer;

pub use deferred::{deferred, Deferred, DeferredState, Resolver};
pub use timer::{delay, TimerId, TimerIdGenerator, TimerState};

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use tokio::runtime;
use tokio::task::{self, JoinHandle, LocalSet};
use tokio::time;
use tracing::debug;

/// Scheduler statistics snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Total timers scheduled.
    pub timers_scheduled: usize,
    /// Timers whose callback ran.
    pub timers_fired: usize,
    /// Timers cleared before their deadline.
    pub timers_cancelled: usize,
    /// Continuations run through [`Scheduler::then`].
    pub continuations_run: usize,
}

impl SchedulerStats {
    /// Timers neither fired nor cancelled.
    pub fn outstanding(&self) -> usize {
        self.timers_scheduled - self.timers_fired - self.timers_cancelled
    }
}

#[derive(Debug, Default)]
struct SchedulerInner {
    ids: TimerIdGenerator,
    // pending timers only; entries leave on fire or cancel
    timers: HashMap<TimerId, JoinHandle<()>>,
    stats: SchedulerStats,
}

/// Handle to the timer table of one event loop.
///
/// Clones share the same table. Not `Send`: timers belong to the thread that
/// runs the loop.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Scheduler {
    /// Create an empty scheduler.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` once after `duration_ms` milliseconds.
    ///
    /// # Panics
    ///
    /// if called outside of a `LocalSet`.
    pub fn set_timeout<F>(
        &self,
        duration_ms: u64,
        callback: F,
    ) -> TimerId
    where
        F: FnOnce() + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.ids.next();
        let this = self.clone();
        let task = task::spawn_local(async move {
            time::sleep(Duration::from_millis(duration_ms)).await;
            if this.mark_fired(id) {
                callback();
            }
        });
        inner.timers.insert(id, task);
        inner.stats.timers_scheduled += 1;
        debug!("{} scheduled in {}ms", id, duration_ms);
        id
    }

    /// Cancel a pending timer. Returns false if it already fired, was already
    /// cancelled or never existed.
    pub fn clear_timeout(
        &self,
        id: TimerId,
    ) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(task) = inner.timers.remove(&id) else {
            return false;
        };
        task.abort();
        inner.stats.timers_cancelled += 1;
        debug!("{} cancelled", id);
        true
    }

    /// Scheduled counterpart of [`delay`], counted in the stats.
    pub fn delay<T: 'static>(
        &self,
        duration_ms: u64,
        value: T,
    ) -> Deferred<T> {
        let (resolver, handle) = deferred();
        self.set_timeout(duration_ms, move || resolver.resolve(value));
        handle
    }

    /// Attach a continuation that is counted in the stats.
    pub fn then<T, U, F>(
        &self,
        source: &Deferred<T>,
        f: F,
    ) -> Deferred<U>
    where
        T: Clone + 'static,
        U: 'static,
        F: FnOnce(T) -> U + 'static,
    {
        let this = self.clone();
        source.then(move |value| {
            this.inner.borrow_mut().stats.continuations_run += 1;
            f(value)
        })
    }

    /// State of a timer created by this scheduler, `None` for ids it never
    /// handed out.
    pub fn timer_state(
        &self,
        id: TimerId,
    ) -> Option<TimerState> {
        let inner = self.inner.borrow();
        if inner.timers.contains_key(&id) {
            Some(TimerState::Pending)
        } else if inner.ids.issued(id) {
            Some(TimerState::Finished)
        } else {
            None
        }
    }

    /// Number of timers still waiting for their deadline.
    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Statistics snapshot.
    pub fn stats(&self) -> SchedulerStats {
        self.inner.borrow().stats
    }

    fn mark_fired(
        &self,
        id: TimerId,
    ) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.timers.remove(&id).is_none() {
            return false;
        }
        inner.stats.timers_fired += 1;
        debug!("{} fired", id);
        true
    }
}

/// Single-threaded event loop: a current-thread runtime plus a `LocalSet`.
pub struct EventLoop {
    runtime: runtime::Runtime,
    local: LocalSet,
    scheduler: Scheduler,
}

impl EventLoop {
    /// Build the runtime with timers enabled.
    pub fn new() -> io::Result<Self> {
        let runtime = runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        Ok(Self {
            runtime,
            local: LocalSet::new(),
            scheduler: Scheduler::new(),
        })
    }

    /// Scheduler bound to this loop.
    pub fn scheduler(&self) -> Scheduler {
        self.scheduler.clone()
    }

    /// Run `script` to completion, then keep turning the loop until every
    /// timer and continuation it left behind has finished.
    pub fn run<Fut>(
        self,
        script: Fut,
    ) -> Fut::Output
    where
        Fut: Future,
    {
        let Self { runtime, local, .. } = self;
        let output = local.block_on(&runtime, script);
        debug!("script body finished, draining event loop");
        runtime.block_on(local);
        output
    }

    /// Like [`EventLoop::run`] for scripts that can fail. A failing script
    /// ends the run at once: whatever it scheduled is dropped unrun.
    pub fn try_run<Fut, T, E>(
        self,
        script: Fut,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        let Self { runtime, local, .. } = self;
        let output = local.block_on(&runtime, script)?;
        debug!("script body finished, draining event loop");
        runtime.block_on(local);
        Ok(output)
    }
}

impl std::fmt::Debug for EventLoop {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
