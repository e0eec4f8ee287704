//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Debate roster is empty")]
    EmptyRoster,

    #[error("Blind order is not a permutation of the label set")]
    InvalidBlindOrder,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
