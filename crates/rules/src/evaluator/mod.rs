//! Rule evaluator: predicates, AND-ed condition groups and the partition engine.
//!
//! Evaluation runs in three layers:
//! - **Predicate**: one compiled `(column, pattern, mode)` test against a record.
//! - **ConditionGroup**: predicates AND-ed per row; applying a group splits a
//!   row set into `(matched, unmatched)`.
//! - **PartitionEngine**: splits off duplicates, then folds the remaining pool
//!   through the groups in declared order. Earlier groups claim rows first.
//!
//! Configuration problems never abort a run: bad conditions are dropped at
//! compile time with a warning, and conditions on columns the table lacks
//! abstain (evaluate to true) at apply time.

mod dedup;
mod engine;
mod error;
mod group;
mod predicate;

pub use dedup::split_duplicates;
pub use engine::{PartitionCounts, PartitionEngine, PartitionOutcome};
pub use error::ConfigError;
pub use group::{post_filter, ConditionGroup};
pub use predicate::{evaluate, Predicate};
