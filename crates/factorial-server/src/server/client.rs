//! Outbound self-calls over HTTP.
//!
//! [`HttpRemoteCall`] implements [`RemoteCall`] against the configured base
//! URL, which by default is the service's own address: a call issued here
//! arrives back at our own inbound endpoints one recursion level deeper.
//! Every request carries the configured per-call timeout; there are no
//! retries.

use core::time::Duration;
use factorial_core::{Error, NumberSequence, PendingResult, RemoteCall, Result};
use futures::{StreamExt, TryStreamExt, future::BoxFuture};
use std::io;
use tokio::io::AsyncBufReadExt;
use tokio_stream::wrappers::LinesStream;
use tokio_util::io::StreamReader;

/// HTTP implementation of the outbound call capability.
pub struct HttpRemoteCall {
    client: reqwest::Client,
    base_url: String,
    call_timeout: Duration,
}

impl HttpRemoteCall {
    /// Builds a client whose requests are all bounded by `call_timeout`.
    pub fn new(base_url: String, call_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(call_timeout)
            .build()
            .map_err(|e| Error::Transport {
                context: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            call_timeout,
        })
    }

    async fn fetch_value(
        client: reqwest::Client,
        url: String,
        bound: Duration,
    ) -> Result<u64> {
        let resp = client
            .get(&url)
            .send()
            .await
            .map_err(|e| classify(&e, bound))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Upstream {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| classify(&e, bound))?;
        body.trim().parse().map_err(|_| Error::Transport {
            context: format!("non-numeric response body: {body:?}"),
        })
    }
}

/// Maps a reqwest failure into our taxonomy, separating the client-side
/// timeout from other transport faults.
fn classify(e: &reqwest::Error, bound: Duration) -> Error {
    if e.is_timeout() {
        Error::Timeout { bound }
    } else {
        Error::Transport {
            context: e.to_string(),
        }
    }
}

impl RemoteCall for HttpRemoteCall {
    fn call(&self, arg: u64) -> BoxFuture<'static, Result<u64>> {
        let url = format!("{}/factorial/{arg}", self.base_url);
        Box::pin(Self::fetch_value(
            self.client.clone(),
            url,
            self.call_timeout,
        ))
    }

    fn call_async(&self, arg: u64) -> PendingResult {
        let url = format!("{}/factorial/async/{arg}", self.base_url);
        let fetch = Self::fetch_value(self.client.clone(), url, self.call_timeout);

        // The transfer runs on a plain runtime task; no pool slot is held
        // while the response is pending.
        let (resolver, out) = PendingResult::pair();
        tokio::spawn(async move {
            resolver.resolve(fetch.await);
        });
        out
    }

    fn call_stream(&self, arg: u64) -> NumberSequence {
        let url = format!("{}/factorial/numbers/{arg}", self.base_url);
        let client = self.client.clone();
        let bound = self.call_timeout;

        // The request is issued lazily on first poll; the body arrives as
        // newline-delimited tokens, one element per line.
        futures::stream::once(async move {
            let resp = client
                .get(&url)
                .send()
                .await
                .map_err(|e| classify(&e, bound))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(Error::Upstream {
                    status: status.as_u16(),
                });
            }

            let bytes = resp.bytes_stream().map_err(io::Error::other);
            let lines = LinesStream::new(StreamReader::new(bytes).lines());
            Ok(lines.map(move |line| {
                line.map_err(|e| classify_io(&e, bound))
            }))
        })
        .flat_map(|opened| match opened {
            Ok(tokens) => tokens.boxed(),
            Err(e) => futures::stream::once(async move { Err(e) }).boxed(),
        })
        .boxed()
    }
}

/// Body-read failures come back as `io::Error` once wrapped in a
/// `StreamReader`; a mid-body timeout still has to surface as `Timeout`.
fn classify_io(e: &io::Error, bound: Duration) -> Error {
    let timed_out = e.kind() == io::ErrorKind::TimedOut
        || e.get_ref()
            .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
            .is_some_and(reqwest::Error::is_timeout);

    if timed_out {
        Error::Timeout { bound }
    } else {
        Error::Transport {
            context: e.to_string(),
        }
    }
}
