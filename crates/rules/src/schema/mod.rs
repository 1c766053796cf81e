//! YAML DSL schema types with serde deserialization.
//!
//! Defines the type hierarchy for rule documents:
//! - `RuleEnvelope`: lightweight first-pass header (apiVersion, kind, metadata)
//! - `RuleDocument`: enum dispatching to kind-specific types
//! - `PartitionRule`: ordered condition groups that split a table into partitions
//! - `EnrichmentRule`: DNS lookup settings plus the post-filter conditions

mod condition;
mod document;
mod enrichment;
mod envelope;
mod kind;
mod metadata;
mod partition;

pub use condition::*;
pub use document::*;
pub use enrichment::*;
pub use envelope::*;
pub use kind::*;
pub use metadata::*;
pub use partition::*;
