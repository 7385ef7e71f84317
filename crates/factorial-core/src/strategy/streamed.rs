//! The stream strategies: one call, one fold.
//!
//! A single outbound call fetches the sequence `1..n`, which is folded
//! locally under an overall pipeline bound. Recursion depth disappears as a
//! resource-pressure variable: whatever `n` is, the computation occupies one
//! pool slot while fold work is active. The composite variant interposes the
//! [`Delayed`] stage before the fold, shifting element availability without
//! changing the result.

use super::FactorialEngine;
use crate::{
    Error, PendingResult, Result,
    seq::{delayed::Delayed, product_of},
};
use core::time::Duration;
use futures::StreamExt;
use std::sync::Arc;
use tokio::time::timeout;

impl FactorialEngine {
    /// Computes `n!` by folding one streamed sequence of `n` tokens.
    ///
    /// Exactly one outbound call is issued for any `n >= 2`; `n <= 1`
    /// resolves to `1` without any call. The full fetch-and-fold pipeline
    /// is bounded by the configured pipeline timeout.
    pub async fn streamed(&self, n: u64) -> Result<u64> {
        self.run_pipeline(n, None).await
    }

    /// Same pipeline as [`FactorialEngine::streamed`] with a fixed delay
    /// stage interposed between producer and fold.
    ///
    /// The delay shifts when elements become available but not membership,
    /// ordering, or the fold result.
    pub async fn streamed_delayed(&self, n: u64) -> Result<u64> {
        self.run_pipeline(n, Some(self.limits.stream_delay)).await
    }

    async fn run_pipeline(&self, n: u64, delay: Option<Duration>) -> Result<u64> {
        if n <= 1 {
            return Ok(1);
        }

        let (resolver, out) = PendingResult::pair();
        let client = Arc::clone(&self.client);
        let bound = self.limits.pipeline_timeout;

        self.pool
            .submit(Box::pin(async move {
                let pipeline = async move {
                    let seq = client.call_stream(n);
                    let seq = match delay {
                        Some(shift) => Delayed::new(seq, shift).boxed(),
                        None => seq,
                    };
                    product_of(seq).await
                };

                let outcome = match timeout(bound, pipeline).await {
                    Ok(folded) => folded,
                    Err(_) => Err(Error::Timeout { bound }),
                };
                resolver.resolve(outcome);
            }))
            .await?;

        out.await
    }
}
