//! Execution loop control parameters

use crate::ports::model_gateway::CallParams;
use arena_domain::DomainError;

/// How the four condition pipelines are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Each condition settles, success or failure, before the next starts
    #[default]
    Serial,
    /// All four started together, each independently awaited
    Concurrent,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Serial => "serial",
            RunMode::Concurrent => "concurrent",
        }
    }
}

impl std::str::FromStr for RunMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "serial" => Ok(RunMode::Serial),
            "concurrent" => Ok(RunMode::Concurrent),
            other => Err(DomainError::InvalidConfiguration(format!(
                "unknown run mode '{other}' (expected 'serial' or 'concurrent')"
            ))),
        }
    }
}

/// Parameters controlling one experiment execution
#[derive(Debug, Clone)]
pub struct ExecutionParams {
    /// Debate rounds before synthesis
    pub rounds: u32,
    /// Condition scheduling mode
    pub mode: RunMode,
    /// Sampling temperature for every call
    pub temperature: f32,
    /// Token cap for every call
    pub max_tokens: u32,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            rounds: 2,
            mode: RunMode::Serial,
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

impl ExecutionParams {
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds.max(1);
        self
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Per-call sampling parameters derived from these settings
    pub fn call_params(&self) -> CallParams {
        CallParams::new(self.temperature, self.max_tokens)
    }
}
