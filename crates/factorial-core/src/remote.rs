//! The outbound self-call capability.
//!
//! The strategies never talk to a transport directly; they go through
//! [`RemoteCall`], which issues one call to the service's own endpoint and
//! hands back the result in one of three shapes. The server crate implements
//! this over HTTP; tests implement it with an in-process loopback that
//! routes calls back through the engine so pool-contention semantics are
//! preserved.

use crate::{PendingResult, Result, seq::NumberSequence};
use futures::future::BoxFuture;

/// One outbound call to the configured factorial endpoint.
///
/// Every call is bounded by the implementation's configured timeout;
/// exceeding it fails the returned value, handle, or sequence with
/// [`crate::Error::Timeout`] rather than leaving it unresolved. Failed calls
/// surface immediately; there are no retries.
pub trait RemoteCall: Send + Sync + 'static {
    /// Mode A: resolve the factorial of `arg` synchronously.
    ///
    /// "Synchronously" is a statement about the caller, not the transport:
    /// a task that awaits the returned future from inside a pool job holds
    /// its slot for the whole duration of the call.
    fn call(&self, arg: u64) -> BoxFuture<'static, Result<u64>>;

    /// Mode B: request the factorial of `arg`, returning a handle that
    /// resolves when the remote computation finishes.
    fn call_async(&self, arg: u64) -> PendingResult;

    /// Mode C: request the token sequence `1..arg` as a single call.
    fn call_stream(&self, arg: u64) -> NumberSequence;
}
