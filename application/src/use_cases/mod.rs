//! Use cases orchestrating the experiment flow

pub mod run_condition;
pub mod run_debate;
pub mod run_experiment;
pub mod shared;
