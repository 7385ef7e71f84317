//! A time-shift stage for sequences.
//!
//! [`Delayed`] is deliberately a standalone adapter that knows nothing about
//! tokens, parsing, or folding: it speaks only the [`Stream`] protocol, so it
//! can be interposed between any producer and any consumer. The composite
//! strategy uses it to shift when elements become available without changing
//! membership, order, or the fold result.

use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll, ready},
    time::Duration,
};
use futures::Stream;
use pin_project_lite::pin_project;
use tokio::time::Sleep;

pin_project! {
    /// A stream adapter that holds back every element of `inner` until a
    /// fixed delay has elapsed, then passes elements through unchanged.
    #[must_use = "streams do nothing unless polled"]
    pub struct Delayed<S> {
        #[pin]
        inner: S,
        #[pin]
        sleep: Sleep,
        elapsed: bool,
    }
}

impl<S> Delayed<S> {
    /// Wraps `inner`, delaying the availability of its elements by `delay`.
    ///
    /// The delay clock starts when the adapter is constructed, not at first
    /// poll.
    pub fn new(inner: S, delay: Duration) -> Self {
        Self {
            inner,
            sleep: tokio::time::sleep(delay),
            elapsed: false,
        }
    }
}

impl<S: Stream> Stream for Delayed<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if !*this.elapsed {
            ready!(this.sleep.poll(cx));
            *this.elapsed = true;
        }

        this.inner.poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
