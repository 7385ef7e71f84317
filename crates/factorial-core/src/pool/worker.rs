use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};

/// A unit of work dispatched to a pool worker.
pub enum Job {
    /// A computation the worker drives to completion.
    ///
    /// The worker's slot is occupied until the future finishes, including
    /// any time the future spends awaiting a dependency. A task that waits
    /// synchronously for a nested call therefore holds its slot for the
    /// whole wait, which is exactly the behavior the blocking strategy
    /// demonstrates.
    Run { task: BoxFuture<'static, ()> },

    /// Signals the worker to stop and acknowledge shutdown.
    Shutdown { response: oneshot::Sender<()> },
}

/// Worker task responsible for processing [`Job`] messages.
///
/// Each worker represents one execution slot. It listens on its own bounded
/// MPSC channel and runs jobs one at a time until a shutdown signal is
/// received. Designed to be spawned as a Tokio task.
pub async fn worker_loop(worker_id: usize, mut rx: mpsc::Receiver<Job>) {
    tracing::trace!("worker {worker_id} started");

    while let Some(job) = rx.recv().await {
        match job {
            Job::Run { task } => task.await,
            Job::Shutdown { response } => {
                tracing::debug!("worker {worker_id} received shutdown signal");

                if response.send(()).is_err() {
                    tracing::error!("worker {worker_id} failed to acknowledge shutdown");
                }
                break;
            }
        }
    }

    tracing::trace!("worker {worker_id} stopped");
}
