//! Progress reporting for experiment execution

use arena_application::ProgressNotifier;
use arena_domain::ConditionId;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;

/// Reports progress with one spinner per condition pipeline
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<ConditionId, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_condition_start(&self, condition: &ConditionId) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(condition.label().to_string());
        pb.set_message("starting...");
        self.bars.lock().unwrap().insert(*condition, pb);
    }

    fn on_round_start(&self, condition: &ConditionId, round: u32, rounds: u32) {
        if let Some(pb) = self.bars.lock().unwrap().get(condition) {
            pb.set_message(format!("round {round}/{rounds}"));
        }
    }

    fn on_turn_complete(&self, condition: &ConditionId, agent: &str, success: bool) {
        if let Some(pb) = self.bars.lock().unwrap().get(condition) {
            let status = if success {
                format!("{} {}", "v".green(), agent)
            } else {
                format!("{} {}", "x".red(), agent)
            };
            pb.set_message(status);
            pb.tick();
        }
    }

    fn on_condition_complete(&self, condition: &ConditionId, success: bool) {
        if let Some(pb) = self.bars.lock().unwrap().remove(condition) {
            if success {
                pb.finish_with_message(format!("{}", "done".green()));
            } else {
                pb.finish_with_message(format!("{}", "failed".red()));
            }
        }
    }
}
