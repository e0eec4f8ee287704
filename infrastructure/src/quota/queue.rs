//! Adapter-owned FIFO call queue
//!
//! One instance serializes every call bound for one backend, across all
//! pipelines. The queue is owned by its adapter instance, never ambient
//! global state, so separate adapters (e.g. under test) never share one.

use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

#[derive(Debug, Default)]
struct SlotState {
    last_settled: Option<Instant>,
}

/// Strict FIFO scheduler with minimum spacing between settled calls.
#[derive(Debug)]
pub struct CallQueue {
    slot: Mutex<SlotState>,
    min_spacing: Duration,
}

impl CallQueue {
    pub fn new(min_spacing: Duration) -> Self {
        Self {
            slot: Mutex::new(SlotState::default()),
            min_spacing,
        }
    }

    /// Run `call` as the next call in the queue.
    ///
    /// The call begins only once every previously enqueued call has settled
    /// (tokio's mutex queues waiters in FIFO order), and only after the
    /// minimum spacing since the previous call settled has elapsed.
    pub async fn run<T, F, Fut>(&self, call: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(last) = slot.last_settled {
            let since = last.elapsed();
            if since < self.min_spacing {
                sleep(self.min_spacing - since).await;
            }
        }

        let output = call().await;
        slot.last_settled = Some(Instant::now());
        output
    }
}
