//! Infrastructure layer for debate-arena
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the HTTP model gateway, the quota-aware adapter stack
//! in front of it, configuration loading, and transcript logging.

pub mod config;
pub mod gateway;
pub mod logging;
pub mod providers;
pub mod quota;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use gateway::{CredentialStore, GatewayConfig, HttpGateway};
pub use logging::JsonlTranscriptLogger;
pub use quota::{CallQueue, QuotaAwareBackend, QuotaRouter, RetryPolicy};
