//! Number sequences and the stages that fold them into a factorial.
//!
//! A [`NumberSequence`] is a finite, ordered, lazily produced stream of
//! textual integer tokens, consumed exactly once. The pull protocol is
//! [`futures::Stream`], which is what lets independently written stages (the
//! [`delayed::Delayed`] adapter, the fold in [`product_of`]) compose without
//! knowing each other's internals.

pub mod delayed;


use crate::{Error, Result};
use futures::{StreamExt, TryStreamExt, stream::BoxStream};

/// A finite, ordered, non-restartable stream of integer tokens.
///
/// An `Err` item carries a transport or timeout failure from the producer
/// and terminates consumption.
pub type NumberSequence = BoxStream<'static, Result<String>>;

/// Produces the tokens `"1"` through `"n"` in ascending order.
///
/// For `n` of zero the sequence is empty.
pub fn range_tokens(n: u64) -> NumberSequence {
    futures::stream::iter((1..=n).map(|v| Ok(v.to_string()))).boxed()
}

/// Folds a sequence into the product of its parseable, positive elements.
///
/// Each token is parsed to an integer; an unparseable token is substituted
/// with `0` (logged, never surfaced) rather than aborting the fold.
/// Non-positive values are filtered out, and the remainder is multiplied in
/// production order. A sequence that yields no elements after filtering
/// reduces to `0`.
///
/// # Errors
///
/// An `Err` item from the producer (transport failure, upstream timeout)
/// aborts the fold and is returned as-is.
pub async fn product_of(seq: NumberSequence) -> Result<u64> {
    let folded = seq
        .try_filter_map(|token| async move {
            let value = match token.trim().parse::<i64>() {
                Ok(v) => v,
                Err(_) => {
                    let fault = Error::MalformedToken { token };
                    tracing::warn!("substituting 0 for sequence element: {fault}");
                    0
                }
            };
            Ok((value > 0).then_some(value as u64))
        })
        .try_fold(None::<u64>, |acc, value| async move {
            // 21! overflows u64; wrap rather than panic on large arguments.
            Ok(Some(acc.unwrap_or(1).wrapping_mul(value)))
        })
        .await?;

    Ok(folded.unwrap_or(0))
}
