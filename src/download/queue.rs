// src/download/queue.rs
// =============================================================================
// A serial callback queue: the context download results are delivered on.
//
// Fetches finish in any order on whatever worker thread happens to poll
// them. Callers usually want their callbacks to run somewhere predictable
// instead (one after another, never concurrently). A DeliveryQueue is that
// place:
// - jobs are sent over an unbounded channel
// - a single task, spawned on the runtime handle you pass in, drains the
//   channel and runs the jobs one at a time, in the order they arrived
// - while a job runs, DeliveryQueue::current() returns this queue's id
//
// Rust concepts:
// - mpsc channels: many producers (fetch tasks), one consumer (the drain task)
// - Box<dyn FnOnce()>: type-erased one-shot jobs
// - thread_local!: per-thread state, used to report the running queue
// =============================================================================

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CURRENT_QUEUE: Cell<Option<QueueId>> = const { Cell::new(None) };
}

/// Identifies one DeliveryQueue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueId(u64);

/// Runs submitted jobs serially on a task of the given runtime
#[derive(Debug, Clone)]
pub struct DeliveryQueue {
    id: QueueId,
    sender: mpsc::UnboundedSender<Job>,
}

impl DeliveryQueue {
    // Creates the queue and spawns its drain task on `handle`
    //
    // The task lives until every clone of the queue has been dropped
    pub fn new(handle: &Handle) -> Self {
        let id = QueueId(NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed));
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();

        handle.spawn(async move {
            while let Some(job) = receiver.recv().await {
                let _running = RunningGuard::enter(id);
                // A panicking callback must not take the other callbacks down with it
                if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                    warn!(queue = id.0, "delivery job panicked");
                }
            }
            debug!(queue = id.0, "delivery queue closed");
        });

        DeliveryQueue { id, sender }
    }

    pub fn id(&self) -> QueueId {
        self.id
    }

    /// Schedules `job` to run after every job submitted before it
    pub fn dispatch<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.sender.send(Box::new(job)).is_err() {
            // Only happens once the runtime that owned the drain task is gone
            warn!(queue = self.id.0, "delivery queue is closed, dropping job");
        }
    }

    /// The queue whose job is running on this thread right now, if any
    pub fn current() -> Option<QueueId> {
        CURRENT_QUEUE.with(|current| current.get())
    }
}

// Marks a queue as running for the lifetime of the guard
struct RunningGuard {
    previous: Option<QueueId>,
}

impl RunningGuard {
    fn enter(id: QueueId) -> Self {
        let previous = CURRENT_QUEUE.with(|current| current.replace(Some(id)));
        RunningGuard { previous }
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        CURRENT_QUEUE.with(|current| current.set(self.previous));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_runs_jobs_in_submission_order() {
        let queue = DeliveryQueue::new(&Handle::current());
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..100 {
            let seen = Arc::clone(&seen);
            queue.dispatch(move || seen.lock().unwrap().push(i));
        }

        let (done_tx, done_rx) = oneshot::channel();
        queue.dispatch(move || {
            let _ = done_tx.send(());
        });
        done_rx.await.unwrap();

        assert_eq!(*seen.lock().unwrap(), (0..100).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_reports_current_queue_only_inside_jobs() {
        let queue = DeliveryQueue::new(&Handle::current());
        let other = DeliveryQueue::new(&Handle::current());
        assert_ne!(queue.id(), other.id());
        assert_eq!(DeliveryQueue::current(), None);

        let (tx, rx) = oneshot::channel();
        queue.dispatch(move || {
            let _ = tx.send(DeliveryQueue::current());
        });
        assert_eq!(rx.await.unwrap(), Some(queue.id()));
        assert_eq!(DeliveryQueue::current(), None);
    }

    #[tokio::test]
    async fn test_survives_a_panicking_job() {
        let queue = DeliveryQueue::new(&Handle::current());
        queue.dispatch(|| panic!("boom"));

        let (tx, rx) = oneshot::channel();
        queue.dispatch(move || {
            let _ = tx.send(42);
        });
        assert_eq!(rx.await.unwrap(), 42);
    }
}
