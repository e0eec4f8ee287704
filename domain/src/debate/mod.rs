//! Debate entities: agents and transcripts

pub mod agent;
pub mod transcript;
