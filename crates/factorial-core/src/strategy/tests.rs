use super::{FactorialEngine, Limits};
use crate::{
    Error, PendingResult, Result,
    pool::manager::WorkerPool,
    remote::RemoteCall,
    seq::{NumberSequence, range_tokens},
};
use core::time::Duration;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::time::Instant;

/// In-process stand-in for the HTTP transport.
///
/// Modes A and B route straight back into the engine, so nested calls
/// contend on the same pool the way real loopback requests would. Mode C
/// produces the range locally. Every mode counts as one outbound call.
#[derive(Default)]
struct Loopback {
    engine: Mutex<Option<Arc<FactorialEngine>>>,
    calls: AtomicUsize,
}

impl Loopback {
    fn wire(&self, engine: Arc<FactorialEngine>) {
        *self.engine.lock() = Some(engine);
    }

    fn engine(&self) -> Arc<FactorialEngine> {
        self.engine.lock().clone().expect("engine not wired")
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RemoteCall for Loopback {
    fn call(&self, arg: u64) -> BoxFuture<'static, Result<u64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let engine = self.engine();
        let bound = engine.limits().call_timeout;

        Box::pin(async move {
            match tokio::time::timeout(bound, engine.blocking(arg)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(Error::Timeout { bound }),
            }
        })
    }

    fn call_async(&self, arg: u64) -> PendingResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let engine = self.engine();
        let bound = engine.limits().call_timeout;
        let (resolver, out) = PendingResult::pair();

        tokio::spawn(async move {
            let nested = async {
                match engine.continuation(arg).await {
                    Ok(pending) => pending.await,
                    Err(e) => Err(e),
                }
            };
            let outcome = match tokio::time::timeout(bound, nested).await {
                Ok(outcome) => outcome,
                Err(_) => Err(Error::Timeout { bound }),
            };
            resolver.resolve(outcome);
        });

        out
    }

    fn call_stream(&self, arg: u64) -> NumberSequence {
        self.calls.fetch_add(1, Ordering::SeqCst);
        range_tokens(arg)
    }
}

fn engine(capacity: usize, limits: Limits) -> (Arc<FactorialEngine>, Arc<Loopback>) {
    let loopback = Arc::new(Loopback::default());
    let pool = WorkerPool::start(capacity);
    let engine = Arc::new(FactorialEngine::new(
        pool,
        Arc::clone(&loopback) as Arc<dyn RemoteCall>,
        limits,
    ));
    loopback.wire(Arc::clone(&engine));
    (engine, loopback)
}

#[tokio::test]
async fn base_cases_issue_no_outbound_call() {
    let (engine, loopback) = engine(2, Limits::default());

    for n in [0, 1] {
        assert_eq!(engine.blocking(n).await, Ok(1));
        assert_eq!(engine.continuation(n).await.unwrap().await, Ok(1));
        assert_eq!(engine.streamed(n).await, Ok(1));
        assert_eq!(engine.streamed_delayed(n).await, Ok(1));
    }

    assert_eq!(loopback.calls(), 0);
}

#[tokio::test]
async fn blocking_and_continuation_agree_within_pool_capacity() {
    // Depth 5 exactly fits a pool of 5 slots.
    let (engine, _) = engine(5, Limits::default());

    assert_eq!(engine.blocking(5).await, Ok(120));
    assert_eq!(engine.continuation(5).await.unwrap().await, Ok(120));
}

#[tokio::test(start_paused = true)]
async fn blocking_deadlocks_past_pool_capacity_and_times_out() {
    let limits = Limits::default();
    let (engine, _) = engine(5, limits);
    let started = Instant::now();

    // Depth 8 against 5 slots: the deepest level never gets a slot, its
    // caller's call bound fires, and the failure cascades up every level.
    let outcome = engine.blocking(8).await;

    assert_eq!(
        outcome,
        Err(Error::Timeout {
            bound: limits.call_timeout
        })
    );
    assert!(started.elapsed() >= limits.call_timeout);
}

#[tokio::test]
async fn continuation_survives_depth_past_pool_capacity() {
    let (engine, _) = engine(5, Limits::default());

    // Same depth that deadlocks the blocking strategy.
    let pending = engine.continuation(8).await.unwrap();
    assert_eq!(pending.await, Ok(40320));
}

#[tokio::test]
async fn streamed_issues_exactly_one_outbound_call() {
    let (engine, loopback) = engine(5, Limits::default());

    assert_eq!(engine.streamed(5).await, Ok(120));
    assert_eq!(loopback.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn composite_matches_streamed_and_only_adds_latency() {
    let limits = Limits::default();
    let (engine, loopback) = engine(5, limits);

    let plain = engine.streamed(6).await;

    let started = Instant::now();
    let delayed = engine.streamed_delayed(6).await;

    assert_eq!(plain, Ok(720));
    assert_eq!(delayed, plain);
    assert!(started.elapsed() >= limits.stream_delay);
    assert_eq!(loopback.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn pipeline_exceeding_its_bound_resolves_to_timeout() {
    // Delay stage longer than the pipeline bound: the fold can never finish.
    let limits = Limits {
        pipeline_timeout: Duration::from_secs(1),
        stream_delay: Duration::from_secs(2),
        ..Limits::default()
    };
    let (engine, _) = engine(2, limits);

    assert_eq!(
        engine.streamed_delayed(4).await,
        Err(Error::Timeout {
            bound: limits.pipeline_timeout
        })
    );
}

#[tokio::test]
async fn continuation_forwards_dependency_failure_unchanged() {
    struct FailingClient;

    impl RemoteCall for FailingClient {
        fn call(&self, _arg: u64) -> BoxFuture<'static, Result<u64>> {
            Box::pin(async { Err(Error::Upstream { status: 500 }) })
        }

        fn call_async(&self, _arg: u64) -> PendingResult {
            PendingResult::failed(Error::Upstream { status: 500 })
        }

        fn call_stream(&self, _arg: u64) -> NumberSequence {
            range_tokens(0)
        }
    }

    let pool = WorkerPool::start(2);
    let engine = FactorialEngine::new(pool, Arc::new(FailingClient), Limits::default());

    // The `* n` transformation is skipped; the failure arrives as-is.
    let pending = engine.continuation(4).await.unwrap();
    assert_eq!(pending.await, Err(Error::Upstream { status: 500 }));
}
