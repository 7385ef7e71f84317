//! Error types for the factorial demonstration service.
//!
//! This module defines the central `Error` enum, which captures every failure
//! the strategies can observe. Errors are `Clone` because a resolved outcome
//! is fanned out to every observer of a [`crate::PendingResult`].
//!
//! ## Error Cases
//! - `Timeout`: An outbound call or a full stream pipeline exceeded its
//!   configured bound.
//! - `Upstream`: A nested self-call answered with an error status. This is
//!   how a deeper recursion level's timeout surfaces to its caller.
//! - `Transport`: The outbound connection or body transfer failed.
//! - `MalformedToken`: A sequence token failed integer parsing. Recovered
//!   inline by fault substitution and never surfaced to the caller.
//! - `ChannelError`: An internal communication failure between tasks or
//!   workers.
//! - `InvalidRequest`: The request argument was malformed or exceeded bounds.
//! - `ServiceShutdown`: A request arrived while the pool was draining.
//! - `Abandoned`: A computation was dropped before producing its outcome.

use core::time::Duration;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the factorial service.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// An outbound call or pipeline exceeded its time bound.
    #[error("timed out after {bound:?}")]
    Timeout { bound: Duration },

    /// A nested self-call answered with a non-success status.
    #[error("upstream call failed with status {status}")]
    Upstream { status: u16 },

    /// The outbound connection or body transfer failed.
    #[error("transport error: {context}")]
    Transport { context: String },

    /// A sequence token was not a valid integer.
    #[error("malformed token: {token:?}")]
    MalformedToken { token: String },

    /// Internal channel send/receive failure (e.g., closed or full channel).
    #[error("channel error: {context}")]
    ChannelError { context: String },

    /// The request was invalid or exceeded constraints.
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// The service is in the process of shutting down.
    #[error("service is shutting down")]
    ServiceShutdown,

    /// The computation was dropped before it resolved.
    #[error("computation abandoned before completion")]
    Abandoned,
}
