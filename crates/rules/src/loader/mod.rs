//! Filesystem rule loader.
//!
//! Scans a rules directory for YAML documents and keeps them in memory keyed
//! by `metadata.id`. Supports all rule kinds via two-pass deserialization
//! (RuleEnvelope -> RuleDocument).

mod core;
mod error;


pub use self::core::RuleLoader;
pub use self::error::{LoadResult, LoadStatus, Result, RuleError};
