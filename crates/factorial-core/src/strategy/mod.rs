//! The four factorial computation strategies.
//!
//! All four share one shape: given `n`, produce `n!` by composing partial
//! results, differing only in how the "recursive" sub-result is obtained and
//! in who holds a pool slot while waiting for it.
//!
//! ## Structure
//!
//! - [`blocking`] - synchronous recursive self-call (the anti-pattern).
//! - [`continuation`] - registered transformation on a pending handle.
//! - [`streamed`] - one token stream folded locally, with an optional delay
//!   stage interposed for the composite variant.

mod blocking;
mod continuation;
mod streamed;

#[cfg(test)]
mod tests;

use crate::{pool::manager::WorkerPool, remote::RemoteCall};
use core::time::Duration;
use std::sync::Arc;

/// Time bounds applied to outbound calls and stream pipelines.
#[derive(Clone, Copy, Debug)]
pub struct Limits {
    /// Upper bound for a single outbound self-call (modes A and B).
    pub call_timeout: Duration,
    /// Upper bound for a full fetch-and-fold stream pipeline.
    pub pipeline_timeout: Duration,
    /// Fixed shift applied by the composite strategy's delay stage.
    pub stream_delay: Duration,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(10),
            pipeline_timeout: Duration::from_secs(10),
            stream_delay: Duration::from_secs(2),
        }
    }
}

/// Dispatches factorial computations onto the shared worker pool.
///
/// Owns the pool handle, the outbound [`RemoteCall`] capability, and the
/// configured time bounds. One engine serves every inbound request; each
/// computation runs as a pool job and reports through a
/// [`crate::PendingResult`].
pub struct FactorialEngine {
    pool: Arc<WorkerPool>,
    client: Arc<dyn RemoteCall>,
    limits: Limits,
}

impl FactorialEngine {
    pub fn new(pool: Arc<WorkerPool>, client: Arc<dyn RemoteCall>, limits: Limits) -> Self {
        Self {
            pool,
            client,
            limits,
        }
    }

    /// The shared execution-slot pool.
    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    /// The configured time bounds.
    pub fn limits(&self) -> Limits {
        self.limits
    }
}
