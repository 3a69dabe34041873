//! Bounded worker pool for running probes concurrently
//!
//! A fixed set of worker tasks pull items from a shared queue and push their
//! results onto a channel. The returned stream yields results in completion
//! order and ends once every item has been processed.

use crate::proxy::checker::Probe;
use crate::proxy::models::{Candidate, ProbeOutcome};
use futures::stream::{self, Stream, StreamExt};
use futures::FutureExt;
use std::collections::VecDeque;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::{trace, warn};

/// Run `task` over every item with at most `cap` calls in flight.
///
/// `cap == 0` is treated as 1. Must be called from within a tokio runtime.
/// `task` must not panic: a panicking call loses its output and its worker.
pub fn run_bounded<T, O, F, Fut>(
    items: Vec<T>,
    cap: usize,
    task: F,
) -> impl Stream<Item = O> + Send + 'static
where
    T: Send + 'static,
    O: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = O> + Send + 'static,
{
    let workers = cap.max(1).min(items.len());
    let queue = Arc::new(Mutex::new(VecDeque::from(items)));
    let task = Arc::new(task);
    let (tx, mut rx) = mpsc::unbounded_channel();

    for worker in 0..workers {
        let queue = Arc::clone(&queue);
        let task = Arc::clone(&task);
        let tx = tx.clone();
        tokio::spawn(async move {
            loop {
                let next = queue
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front();
                let Some(item) = next else { break };

                let output = task(item).await;
                // Receiver gone means nobody is listening anymore
                if tx.send(output).is_err() {
                    break;
                }
            }
            trace!(worker, "worker finished");
        });
    }

    // Only the workers hold senders now, so the stream ends when they do
    drop(tx);

    stream::poll_fn(move |cx| rx.poll_recv(cx))
}

/// Probe every candidate with at most `worker_cap` probes in flight.
///
/// Outcomes are yielded as soon as they are produced, so their order follows
/// probe latency rather than input order. A prober that panics still yields
/// a failed outcome for that candidate.
pub fn run_all<P>(
    candidates: Vec<Candidate>,
    worker_cap: usize,
    prober: Arc<P>,
) -> impl Stream<Item = ProbeOutcome> + Send + 'static
where
    P: Probe + ?Sized + 'static,
{
    run_bounded(candidates, worker_cap, move |candidate: Candidate| {
        let prober = Arc::clone(&prober);
        async move {
            let result = AssertUnwindSafe(prober.probe(&candidate))
                .catch_unwind()
                .await;
            match result {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(proxy = %candidate, "prober panicked");
                    ProbeOutcome::failed(candidate, "probe panicked".to_string())
                }
            }
        }
    })
}

/// Drain a result stream into a vector, keeping arrival order
pub async fn collect_all<S, O>(results: S) -> Vec<O>
where
    S: Stream<Item = O>,
{
    results.collect().await
}
