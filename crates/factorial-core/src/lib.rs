#![doc = include_str!("../README.md")]

mod error;
mod pending;
pub mod pool;
mod remote;
pub mod seq;
pub mod strategy;

pub use error::{Error, Result};
pub use pending::{PendingResult, Resolver};
pub use pool::manager::WorkerPool;
pub use remote::RemoteCall;
pub use seq::{NumberSequence, product_of, range_tokens};
pub use strategy::{FactorialEngine, Limits};
