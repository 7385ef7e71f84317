//! Process configuration.
//!
//! Arguments come from the command line with environment-variable fallbacks
//! (and `.env` via dotenvy in `main`). The only required piece of external
//! configuration is the outbound target URL, which defaults to the service's
//! own listen address so a single process recurses into itself.

use clap::Parser;
use core::time::Duration;
use factorial_core::{Error, Limits};

/// Command-line arguments for the factorial service.
#[derive(Parser, Debug)]
#[command(name = "factorial-server", version, about)]
pub struct CliArgs {
    /// Address to bind the HTTP listener to.
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:8080")]
    pub listen_addr: String,

    /// Base URL for outbound self-calls. Defaults to this service's own
    /// address.
    #[arg(long, env = "CLIENT_URL")]
    pub client_url: Option<String>,

    /// Number of worker-pool slots. Recursion deeper than this deadlocks
    /// the blocking endpoint, which is the point of the demo.
    #[arg(long, env = "POOL_CAPACITY", default_value_t = 5)]
    pub pool_capacity: usize,

    /// Upper bound, in seconds, for each outbound call and for a full
    /// stream pipeline.
    #[arg(long, env = "CALL_TIMEOUT_SECS", default_value_t = 10)]
    pub call_timeout_secs: u64,

    /// Fixed delay, in seconds, applied by the composite stream endpoint.
    #[arg(long, env = "STREAM_DELAY_SECS", default_value_t = 2)]
    pub stream_delay_secs: u64,
}

/// Validated runtime configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub client_url: String,
    pub pool_capacity: usize,
    pub limits: Limits,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = Error;

    fn try_from(args: CliArgs) -> Result<Self, Error> {
        if args.pool_capacity == 0 {
            return Err(Error::InvalidRequest {
                reason: "pool capacity must be at least 1".to_string(),
            });
        }

        let client_url = args
            .client_url
            .unwrap_or_else(|| format!("http://{}", args.listen_addr));
        let bound = Duration::from_secs(args.call_timeout_secs);

        Ok(Self {
            listen_addr: args.listen_addr,
            client_url,
            pool_capacity: args.pool_capacity,
            limits: Limits {
                call_timeout: bound,
                pipeline_timeout: bound,
                stream_delay: Duration::from_secs(args.stream_delay_secs),
            },
        })
    }
}
