//! Progress notification port
//!
//! Defines the interface for reporting progress during an experiment run.

use arena_domain::ConditionId;

/// Callback for progress updates during experiment execution
///
/// Implementations live in the presentation layer and can display progress
/// in various ways (console bars, plain logs, ...).
pub trait ProgressNotifier: Send + Sync {
    /// Called when a condition pipeline starts
    fn on_condition_start(&self, condition: &ConditionId);

    /// Called when a debate round starts within a condition
    fn on_round_start(&self, condition: &ConditionId, round: u32, rounds: u32);

    /// Called when one agent turn (or single call) settles
    fn on_turn_complete(&self, condition: &ConditionId, agent: &str, success: bool);

    /// Called when a condition pipeline settles, success or failure
    fn on_condition_complete(&self, condition: &ConditionId, success: bool);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_condition_start(&self, _condition: &ConditionId) {}
    fn on_round_start(&self, _condition: &ConditionId, _round: u32, _rounds: u32) {}
    fn on_turn_complete(&self, _condition: &ConditionId, _agent: &str, _success: bool) {}
    fn on_condition_complete(&self, _condition: &ConditionId, _success: bool) {}
}
