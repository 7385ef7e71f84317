//! HTTP surface and process plumbing for the factorial service.
//!
//! ## Structure
//!
//! - [`config`] - CLI/env arguments and the validated server configuration.
//! - [`client`] - the outbound [`factorial_core::RemoteCall`] over HTTP.
//! - [`http`] - the axum router and per-strategy handlers.
//! - [`telemetry`] - tracing subscriber setup.

pub mod client;
pub mod config;
pub mod http;
pub mod telemetry;
