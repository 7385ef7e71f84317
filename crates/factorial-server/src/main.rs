#![doc = include_str!("../README.md")]

mod server;

use clap::Parser;
use factorial_core::{FactorialEngine, WorkerPool};
use server::client::HttpRemoteCall;
use server::config::{CliArgs, ServerConfig};
use server::telemetry::init_tracing;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    init_tracing();

    let pool = WorkerPool::start(config.pool_capacity);
    let client = HttpRemoteCall::new(config.client_url.clone(), config.limits.call_timeout)?;
    let engine = Arc::new(FactorialEngine::new(
        Arc::clone(&pool),
        Arc::new(client),
        config.limits,
    ));

    let app = server::http::router(Arc::clone(&engine));
    let listener = TcpListener::bind(&config.listen_addr).await?;

    tracing::info!(
        "serving factorial endpoints on {} with {} pool slots, self-call target {}",
        config.listen_addr,
        config.pool_capacity,
        config.client_url
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    engine.pool().shutdown().await;
    tracing::info!("service shut down successfully");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("received SIGTERM signal");
        },
    }

    tracing::info!("shutdown signal received, terminating gracefully...");
}
