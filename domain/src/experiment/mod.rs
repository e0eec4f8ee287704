//! Experiment value objects: conditions, blinding, runs

pub mod blinding;
pub mod condition;
pub mod run;
