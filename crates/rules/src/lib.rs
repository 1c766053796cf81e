//! Declarative row-partitioning rules for monitoring-check tables.
//!
//! This crate provides:
//! - YAML-based rule documents (`PartitionConfig`, `EnrichmentConfig`) with serde deserialization
//! - Filesystem loader for rule directories
//! - Validation with structured errors and "did you mean" suggestions
//! - The evaluator: predicates, AND-ed condition groups, duplicate split,
//!   the sequential partition engine and the post-filter

pub mod evaluator;
pub mod loader;
pub mod schema;
pub mod validation;
