//! The continuation strategy: register a transformation, release the slot.
//!
//! Instead of waiting for the nested result, the pool job obtains a pending
//! handle for `(n - 1)!`, registers `* n` on it, and returns immediately.
//! Slot occupancy is therefore bounded by the jobs actively executing
//! logic, not by recursion depth, which removes the deadlock of the
//! blocking strategy at the same depths.

use super::FactorialEngine;
use crate::{PendingResult, Result};
use std::sync::Arc;

impl FactorialEngine {
    /// Computes `n!` without blocking any worker on the nested call.
    ///
    /// Returns a handle that resolves once the whole chain has resolved.
    /// The registering worker is free to serve other requests as soon as
    /// the transformation is attached. If the dependency resolves to a
    /// failure, the transformation is skipped and the failure is forwarded
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Fails immediately if the pool refuses the registration job (shutdown
    /// or closed worker channel).
    pub async fn continuation(&self, n: u64) -> Result<PendingResult> {
        if n <= 1 {
            return Ok(PendingResult::ready(1));
        }

        let (resolver, out) = PendingResult::pair();
        let client = Arc::clone(&self.client);
        let pool = Arc::clone(&self.pool);

        self.pool
            .submit(Box::pin(async move {
                // Registration is the only work done on this slot.
                let dependency = client.call_async(n - 1);
                let transformed = dependency.map_on(&pool, move |v| v.wrapping_mul(n));
                transformed.on_resolved(move |outcome| resolver.resolve(outcome.clone()));
            }))
            .await?;

        Ok(out)
    }
}
