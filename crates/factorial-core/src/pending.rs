//! Write-once result cells with attach-observer semantics.
//!
//! A [`PendingResult`] is the handle every strategy hands back to its caller:
//! a not-yet-available integer outcome that resolves exactly once, to a value
//! or to a failure. Observers may attach before or after resolution and all
//! of them see the same outcome. The continuation strategy is built on
//! [`PendingResult::map_on`], which registers a transformation without
//! blocking the registering worker.

use crate::{Error, Result, pool::manager::WorkerPool};
use parking_lot::Mutex;
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll, Waker},
};

type Callback = Box<dyn FnOnce(&Result<u64>) + Send>;

enum State {
    Pending {
        wakers: Vec<Waker>,
        callbacks: Vec<Callback>,
    },
    Resolved(Result<u64>),
}

struct Shared {
    state: Mutex<State>,
}

impl Shared {
    /// Stores the outcome and fires all registered observers.
    ///
    /// Only the first resolution is kept; later attempts are ignored.
    /// Callbacks run after the lock is released.
    fn resolve(&self, outcome: Result<u64>) {
        let fired = {
            let mut state = self.state.lock();
            match &mut *state {
                State::Pending { wakers, callbacks } => {
                    let wakers = std::mem::take(wakers);
                    let callbacks = std::mem::take(callbacks);
                    *state = State::Resolved(outcome.clone());
                    Some((wakers, callbacks))
                }
                State::Resolved(_) => None,
            }
        };

        if let Some((wakers, callbacks)) = fired {
            for callback in callbacks {
                callback(&outcome);
            }
            for waker in wakers {
                waker.wake();
            }
        }
    }
}

/// A write-once handle for an eventual integer outcome.
///
/// Cloning produces another observer of the same cell. The handle implements
/// [`Future`], so callers can `.await` it directly; it can also register
/// synchronous observers via [`PendingResult::on_resolved`].
#[must_use = "a pending result does nothing unless awaited or observed"]
#[derive(Clone)]
pub struct PendingResult {
    shared: Arc<Shared>,
}

/// The resolving half of a [`PendingResult`].
///
/// Owned by exactly one in-flight computation. Resolving consumes the
/// resolver; dropping it unresolved resolves the cell to
/// [`Error::Abandoned`] so observers never hang on a lost computation.
pub struct Resolver {
    shared: Arc<Shared>,
    resolved: bool,
}

impl PendingResult {
    /// Creates an unresolved cell, returning the resolving and observing
    /// halves.
    pub fn pair() -> (Resolver, Self) {
        let shared = Arc::new(Shared {
            state: Mutex::new(State::Pending {
                wakers: Vec::new(),
                callbacks: Vec::new(),
            }),
        });
        (
            Resolver {
                shared: Arc::clone(&shared),
                resolved: false,
            },
            Self { shared },
        )
    }

    /// An already-resolved successful result.
    pub fn ready(value: u64) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::Resolved(Ok(value))),
            }),
        }
    }

    /// An already-resolved failure.
    pub fn failed(error: Error) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::Resolved(Err(error))),
            }),
        }
    }

    /// Registers an observer for the outcome.
    ///
    /// If the cell is already resolved the callback fires immediately on the
    /// calling task, otherwise it fires on whichever task resolves the cell.
    pub fn on_resolved(&self, callback: impl FnOnce(&Result<u64>) + Send + 'static) {
        let mut callback = Some(callback);
        let stored = {
            let mut state = self.shared.state.lock();
            match &mut *state {
                State::Pending { callbacks, .. } => {
                    callbacks.push(Box::new(callback.take().expect("callback taken once")));
                    None
                }
                State::Resolved(outcome) => Some(outcome.clone()),
            }
        };

        if let Some(outcome) = stored {
            callback.take().expect("callback taken once")(&outcome);
        }
    }

    /// Registers a continuation `value -> transform(value)` and returns the
    /// transformed handle without blocking the registering task.
    ///
    /// When the dependency resolves successfully, the transformation itself
    /// is submitted to `pool` as a regular job, so resumption re-enters pool
    /// scheduling on any free slot. A failed dependency skips the
    /// transformation and forwards the failure unchanged.
    pub fn map_on(
        &self,
        pool: &Arc<WorkerPool>,
        transform: impl FnOnce(u64) -> u64 + Send + 'static,
    ) -> PendingResult {
        let (resolver, out) = PendingResult::pair();
        let pool = Arc::clone(pool);

        self.on_resolved(move |outcome| match outcome {
            Err(e) => resolver.resolve(Err(e.clone())),
            Ok(value) => {
                let value = *value;
                tokio::spawn(async move {
                    // If the pool refuses the job, the resolver is dropped
                    // inside it and observers see `Abandoned`.
                    let _ = pool
                        .submit(Box::pin(async move {
                            resolver.resolve(Ok(transform(value)));
                        }))
                        .await;
                });
            }
        });

        out
    }
}

impl Future for PendingResult {
    type Output = Result<u64>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.shared.state.lock();
        match &mut *state {
            State::Resolved(outcome) => Poll::Ready(outcome.clone()),
            State::Pending { wakers, .. } => {
                if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}

impl Resolver {
    /// Resolves the cell. The first resolution wins; this consumes the
    /// resolver.
    pub fn resolve(mut self, outcome: Result<u64>) {
        self.resolved = true;
        self.shared.resolve(outcome);
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        if !self.resolved {
            self.shared.resolve(Err(Error::Abandoned));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn resolves_every_observer_with_the_same_outcome() {
        let (resolver, pending) = PendingResult::pair();
        let early = pending.clone();

        resolver.resolve(Ok(24));

        let late = pending.clone();
        assert_eq!(pending.await, Ok(24));
        assert_eq!(early.await, Ok(24));
        assert_eq!(late.await, Ok(24));
    }

    #[tokio::test]
    async fn first_resolution_wins() {
        let (resolver, pending) = PendingResult::pair();
        let cell = pending.clone();
        resolver.resolve(Ok(1));

        // A late observer still sees the original outcome.
        cell.on_resolved(|outcome| assert_eq!(*outcome, Ok(1)));
        assert_eq!(pending.await, Ok(1));
    }

    #[tokio::test]
    async fn callbacks_attached_after_resolution_fire_immediately() {
        let pending = PendingResult::ready(7);
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        pending.on_resolved(move |outcome| {
            assert_eq!(*outcome, Ok(7));
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dropped_resolver_resolves_to_abandoned() {
        let (resolver, pending) = PendingResult::pair();
        drop(resolver);
        assert_eq!(pending.await, Err(Error::Abandoned));
    }

    #[tokio::test]
    async fn pre_resolved_failure_is_observable() {
        let pending = PendingResult::failed(Error::ServiceShutdown);
        assert_eq!(pending.await, Err(Error::ServiceShutdown));
    }
}
