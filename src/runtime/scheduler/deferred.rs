//! Single-assignment deferred values
//!
//! A [`Deferred`] is the read side of a value that does not exist yet. The
//! matching [`Resolver`] is consumed by [`Resolver::resolve`], so a handle
//! goes from `Pending` to `Resolved` at most once and never back. Every
//! observer, whether it attached before or after resolution, sees the same
//! value.

use std::fmt;

use tokio::sync::watch;
use tokio::task;

/// Deferred state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredState {
    /// No value yet.
    Pending,
    /// Value is available.
    Resolved,
}

/// Read side of a deferred value. Cheap to clone, clones observe the same value.
pub struct Deferred<T> {
    rx: watch::Receiver<Option<T>>,
}

/// Write side of a deferred value.
pub struct Resolver<T> {
    tx: watch::Sender<Option<T>>,
}

/// Create a pending deferred value and its resolver.
pub fn deferred<T>() -> (Resolver<T>, Deferred<T>) {
    let (tx, rx) = watch::channel(None);
    (Resolver { tx }, Deferred { rx })
}

impl<T> Resolver<T> {
    /// Resolve the deferred value. Consumes the resolver.
    pub fn resolve(
        self,
        value: T,
    ) {
        // send_replace stores the value even when nobody observes it yet
        self.tx.send_replace(Some(value));
    }

    /// Whether any handle is still around to observe the value.
    pub fn is_observed(&self) -> bool {
        !self.tx.is_closed()
    }
}

impl<T> Deferred<T> {
    /// A handle that is already resolved.
    pub fn resolved(value: T) -> Self {
        let (tx, rx) = watch::channel(Some(value));
        drop(tx);
        Self { rx }
    }

    /// Current state.
    pub fn state(&self) -> DeferredState {
        if self.rx.borrow().is_some() {
            DeferredState::Resolved
        } else {
            DeferredState::Pending
        }
    }

    /// The resolver was dropped without resolving, the value will never arrive.
    pub fn is_abandoned(&self) -> bool {
        self.rx.borrow().is_none() && self.rx.has_changed().is_err()
    }
}

impl<T: Clone> Deferred<T> {
    /// Read the value without waiting.
    pub fn peek(&self) -> Option<T> {
        self.rx.borrow().clone()
    }

    /// Wait for resolution.
    ///
    /// Returns `None` if the handle was abandoned.
    pub async fn wait(&self) -> Option<T> {
        let mut rx = self.rx.clone();
        let value = match rx.wait_for(Option::is_some).await {
            Ok(value) => (*value).clone(),
            Err(_) => None,
        };
        value
    }
}

impl<T: Clone + 'static> Deferred<T> {
    /// Attach a continuation.
    ///
    /// The continuation runs as its own task on the current `LocalSet` once
    /// this handle resolves; its return value resolves the returned handle.
    /// An abandoned handle never runs the continuation and abandons the
    /// returned handle in turn.
    ///
    /// # Panics
    ///
    /// if called outside of a `LocalSet`.
    pub fn then<U, F>(
        &self,
        f: F,
    ) -> Deferred<U>
    where
        U: 'static,
        F: FnOnce(T) -> U + 'static,
    {
        let (resolver, next) = deferred();
        let source = self.clone();
        task::spawn_local(async move {
            if let Some(value) = source.wait().await {
                resolver.resolve(f(value));
            }
        });
        next
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("observed", &self.is_observed())
            .finish_non_exhaustive()
    }
}
