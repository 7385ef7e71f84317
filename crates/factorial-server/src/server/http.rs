//! Inbound HTTP surface.
//!
//! Four read-only factorial endpoints, one per strategy, each taking a
//! single integer path argument and answering plain text: the computed
//! value on success, an error status with no partial value on failure. A
//! fifth endpoint serves the token sequence the stream strategies fetch.

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use factorial_core::{Error, FactorialEngine, range_tokens};
use futures::StreamExt;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
struct AppState {
    engine: Arc<FactorialEngine>,
}

/// Builds the service router.
pub fn router(engine: Arc<FactorialEngine>) -> Router {
    Router::new()
        .route("/factorial/{arg}", get(blocking))
        .route("/factorial/async/{arg}", get(continuation))
        .route("/factorial/stream/{arg}", get(streamed))
        .route("/factorial/stream/delayed/{arg}", get(streamed_delayed))
        .route("/factorial/numbers/{arg}", get(numbers))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { engine })
}

/// Error wrapper carrying the status-code mapping for responses.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            Error::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Error::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Error::ServiceShutdown => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::warn!("request failed: {}", self.0);
        (status, self.0.to_string()).into_response()
    }
}

async fn blocking(
    State(state): State<AppState>,
    Path(arg): Path<u64>,
) -> Result<String, ApiError> {
    Ok(state.engine.blocking(arg).await?.to_string())
}

async fn continuation(
    State(state): State<AppState>,
    Path(arg): Path<u64>,
) -> Result<String, ApiError> {
    let pending = state.engine.continuation(arg).await?;
    Ok(pending.await?.to_string())
}

async fn streamed(
    State(state): State<AppState>,
    Path(arg): Path<u64>,
) -> Result<String, ApiError> {
    Ok(state.engine.streamed(arg).await?.to_string())
}

async fn streamed_delayed(
    State(state): State<AppState>,
    Path(arg): Path<u64>,
) -> Result<String, ApiError> {
    Ok(state.engine.streamed_delayed(arg).await?.to_string())
}

/// Streams the tokens `1..arg`, newline-delimited, one per element.
async fn numbers(Path(arg): Path<u64>) -> Response {
    let tokens = range_tokens(arg).map(|tok| tok.map(|t| format!("{t}\n")));
    Body::from_stream(tokens).into_response()
}

#[cfg(test)]
mod tests {
    use super::router;
    use crate::server::client::HttpRemoteCall;
    use factorial_core::{FactorialEngine, Limits, WorkerPool};
    use std::sync::Arc;
    use tokio::net::TcpListener;

    /// Serves the full router on an ephemeral port with the outbound client
    /// pointed back at itself, the same wiring `main` produces.
    async fn serve(capacity: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let limits = Limits::default();
        let pool = WorkerPool::start(capacity);
        let client = HttpRemoteCall::new(base.clone(), limits.call_timeout).unwrap();
        let engine = Arc::new(FactorialEngine::new(pool, Arc::new(client), limits));

        let app = router(engine);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        base
    }

    #[tokio::test]
    async fn recursive_endpoints_compute_over_real_loopback() {
        let base = serve(5).await;
        let http = reqwest::Client::new();

        // Depth 4 fits the 5-slot pool.
        let blocking = http.get(format!("{base}/factorial/4")).send().await.unwrap();
        assert_eq!(blocking.text().await.unwrap(), "24");

        // Depth past capacity is fine for the continuation endpoint.
        let cont = http
            .get(format!("{base}/factorial/async/6"))
            .send()
            .await
            .unwrap();
        assert_eq!(cont.text().await.unwrap(), "720");
    }

    #[tokio::test]
    async fn stream_endpoints_fold_the_numbers_endpoint() {
        let base = serve(5).await;
        let http = reqwest::Client::new();

        let numbers = http
            .get(format!("{base}/factorial/numbers/3"))
            .send()
            .await
            .unwrap();
        assert_eq!(numbers.text().await.unwrap(), "1\n2\n3\n");

        let streamed = http
            .get(format!("{base}/factorial/stream/5"))
            .send()
            .await
            .unwrap();
        assert_eq!(streamed.text().await.unwrap(), "120");
    }
}
