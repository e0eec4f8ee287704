//! Shared types for the condition use cases

use crate::ports::model_gateway::GatewayError;
use arena_domain::DomainError;
use thiserror::Error;

/// Errors a condition pipeline can fail with.
///
/// These are never caught inside the pipeline itself; they propagate to the
/// coordinator, which turns them into visible placeholder results.
#[derive(Error, Debug)]
pub enum ConditionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
