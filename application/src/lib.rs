//! Application layer for debate-arena
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It orchestrates domain logic without knowing anything
//! about HTTP transports, config files, or terminals.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{
    ConditionFlow, ConditionPlan, ExecutionParams, ModelCatalog, ModelChain, RunMode,
    default_conditions,
};
pub use ports::model_gateway::{CallParams, GatewayError, ModelGateway};
pub use ports::progress::{NoProgress, ProgressNotifier};
pub use ports::transcript_logger::{NoTranscriptLog, TranscriptEvent, TranscriptLogger};
pub use use_cases::run_condition::RunConditionUseCase;
pub use use_cases::run_debate::{DebateOutcome, RunDebateUseCase};
pub use use_cases::run_experiment::{ExperimentInput, RunExperimentUseCase};
pub use use_cases::shared::ConditionError;
