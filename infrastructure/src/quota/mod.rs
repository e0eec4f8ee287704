//! Quota-aware adapter stack
//!
//! Makes a rate-limited backend usable under aggressive limits without
//! exposing retry policy to callers: strict FIFO serialization per backend,
//! pre-call spacing, hint-aware retry with backoff, and model fallback.

mod adapter;
mod queue;
mod router;

pub use adapter::{QuotaAwareBackend, RetryPolicy};
pub use queue::CallQueue;
pub use router::QuotaRouter;
