//! The blocking strategy: synchronous recursive self-calls.
//!
//! This is the anti-pattern the whole demonstration exists for, reproduced
//! faithfully rather than fixed. Each recursion level occupies a pool slot
//! for the entire duration of its nested call, so a chain of depth `d`
//! needs `d` simultaneously occupied slots. Once depth exceeds pool
//! capacity the deepest call sits in a worker queue behind a blocked job,
//! its caller's call bound fires, and the failure cascades up through every
//! level. There is no recovery path and no deadlock detection; the only
//! exit is the cascading timeouts.

use super::FactorialEngine;
use crate::{PendingResult, Result};
use std::sync::Arc;

impl FactorialEngine {
    /// Computes `n!` by synchronously waiting for the nested self-call.
    ///
    /// The nested wait happens inside the submitted job, so this
    /// invocation's slot stays occupied until the result for `n - 1`
    /// arrives or the call bound fires. `n <= 1` resolves to `1` without an
    /// outbound call.
    pub async fn blocking(&self, n: u64) -> Result<u64> {
        let (resolver, out) = PendingResult::pair();
        let client = Arc::clone(&self.client);

        self.pool
            .submit(Box::pin(async move {
                if n <= 1 {
                    resolver.resolve(Ok(1));
                    return;
                }

                // Slot held across this await; that is the defect on display.
                let nested = client.call(n - 1).await;
                resolver.resolve(nested.map(|v| v.wrapping_mul(n)));
            }))
            .await?;

        out.await
    }
}
