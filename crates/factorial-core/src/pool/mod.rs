//! Fixed-capacity worker pool shared by every computation.
//!
//! The pool is the only shared mutable resource in the system. Whether a
//! strategy deadlocks or not depends entirely on whether it holds a pool slot
//! while waiting for a dependency, so slot accounting is made explicit here:
//! a slot is occupied for exactly as long as its submitted task is running.
//!
//! ## Structure
//!
//! - [`manager`] - the [`manager::WorkerPool`] handle: dispatch and shutdown.
//! - [`worker`] - the per-slot task loop and the [`worker::Job`] type.

pub mod manager;
pub mod worker;
