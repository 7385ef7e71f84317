//! The process-wide pool of execution slots.
//!
//! This module defines [`WorkerPool`], which owns a fixed set of worker
//! tasks and distributes [`Job`]s across them round-robin. Capacity is fixed
//! at startup and never resized; tests configure small capacities to
//! reproduce the recursive-call deadlock deterministically.
//!
//! Each worker listens on its own bounded [`mpsc::Receiver`] with a buffer of
//! one, so at most one job can queue behind the job a worker is currently
//! driving. A job submitted while every worker is occupied waits in a buffer
//! until a slot frees up.

use super::worker::{Job, worker_loop};
use crate::{Error, Result};
use core::time::Duration;
use futures::future::BoxFuture;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::{
    sync::{mpsc, oneshot},
    time::timeout,
};
use tokio_util::sync::CancellationToken;

/// A cooperative pool of asynchronous workers with fixed capacity.
///
/// Work is distributed in round-robin fashion and the pool supports
/// graceful, cancellable shutdown.
pub struct WorkerPool {
    workers: Vec<mpsc::Sender<Job>>,
    next_worker: AtomicUsize,
    shutdown_token: CancellationToken,
}

impl WorkerPool {
    /// Spawns `capacity` worker tasks and returns the pool handle.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; a pool with no slots cannot run
    /// anything. Callers validate configured capacities before reaching
    /// this point.
    pub fn start(capacity: usize) -> Arc<Self> {
        assert!(capacity > 0, "worker pool capacity must be at least 1");

        let mut workers = Vec::with_capacity(capacity);
        for worker_id in 0..capacity {
            let (tx, rx) = mpsc::channel(1);
            workers.push(tx);
            tokio::spawn(worker_loop(worker_id, rx));
        }

        Arc::new(Self {
            workers,
            next_worker: AtomicUsize::new(0),
            shutdown_token: CancellationToken::new(),
        })
    }

    /// The fixed number of execution slots.
    pub fn capacity(&self) -> usize {
        self.workers.len()
    }

    /// Returns the index of the next worker to receive work (round-robin).
    ///
    /// Uses a relaxed atomic increment to minimize contention.
    fn next_worker_index(&self) -> usize {
        self.next_worker.fetch_add(1, Ordering::Relaxed) % self.workers.len()
    }

    /// Submits a task to the next worker in the pool.
    ///
    /// The call completes once the job is accepted into the worker's queue,
    /// not once it runs. If the targeted worker's buffer is full, this waits
    /// for space.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The pool is shutting down (`shutdown_token` was cancelled).
    /// - The worker's channel is closed.
    pub async fn submit(&self, task: BoxFuture<'static, ()>) -> Result<()> {
        if self.shutdown_token.is_cancelled() {
            return Err(Error::ServiceShutdown);
        }

        let worker_idx = self.next_worker_index();
        let worker = &self.workers[worker_idx];

        match worker.send(Job::Run { task }).await {
            Ok(()) => Ok(()),
            Err(_) => Err(Error::ChannelError {
                context: format!("worker {worker_idx} channel closed"),
            }),
        }
    }

    /// Gracefully shuts down all workers in the pool.
    ///
    /// - Cancels the shared [`CancellationToken`] to refuse new work.
    /// - Sends a [`Job::Shutdown`] to each worker.
    /// - Waits (up to 3 seconds per worker) for shutdown acknowledgements.
    pub async fn shutdown(&self) {
        tracing::debug!("refusing new work via shutdown token");
        self.shutdown_token.cancel();

        tracing::debug!("notifying all workers to shut down");
        let mut shutdown_handles = Vec::with_capacity(self.workers.len());

        for (i, worker) in self.workers.iter().enumerate() {
            let (tx, rx) = oneshot::channel();
            if let Err(e) = worker.send(Job::Shutdown { response: tx }).await {
                tracing::error!("failed to send shutdown to worker {i}: {e}");
            } else {
                shutdown_handles.push((i, rx));
            }
        }

        let waits = shutdown_handles.into_iter().map(|(i, rx)| async move {
            match timeout(Duration::from_secs(3), rx).await {
                Ok(Ok(())) => {
                    tracing::trace!("worker {i} shutdown acknowledged");
                }
                Ok(Err(e)) => {
                    tracing::error!("worker {i} dropped its shutdown ack: {e}");
                }
                Err(_) => {
                    tracing::warn!("worker {i} shutdown timed out");
                }
            }
        });

        futures::future::join_all(waits).await;

        tracing::info!("worker pool shutdown complete");
    }
}
