//! Application configuration: execution parameters, model catalog, and the
//! four canonical condition plans.

mod catalog;
mod conditions;
mod execution_params;

pub use catalog::{ModelCatalog, ModelChain};
pub use conditions::{ConditionFlow, ConditionPlan, default_conditions};
pub use execution_params::{ExecutionParams, RunMode};
