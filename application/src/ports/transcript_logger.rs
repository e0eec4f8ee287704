//! Transcript logging port
//!
//! Fire-and-forget sink for run events. Logging must never fail a run, so
//! the interface is infallible and implementations swallow their own IO
//! errors.

use serde_json::Value;

/// One loggable event with a free-form JSON payload
#[derive(Debug, Clone)]
pub struct TranscriptEvent {
    pub event_type: &'static str,
    pub payload: Value,
}

impl TranscriptEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for per-run transcript events
pub trait TranscriptLogger: Send + Sync {
    fn log(&self, event: TranscriptEvent);
}

/// No-op logger used when transcript logging is disabled
pub struct NoTranscriptLog;

impl TranscriptLogger for NoTranscriptLog {
    fn log(&self, _event: TranscriptEvent) {}
}
