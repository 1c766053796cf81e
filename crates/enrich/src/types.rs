//! Core types for DNS enrichment.
//!
//! Defines the resolver trait, error enum, and result types used
//! across the enrichment subsystem.

use std::collections::HashMap;

use indexmap::IndexMap;

/// Abstraction over a DNS client.
///
/// [`crate::HickoryResolver`] implements this trait against real
/// nameservers. The enricher only depends on this trait, so tests can
/// substitute a canned resolver.
#[async_trait::async_trait]
pub trait RecordResolver: Send + Sync {
    /// Resolve one record type for one name.
    ///
    /// Returns the record values as text, in answer order.
    async fn resolve(&self, name: &str, record_type: &str) -> Result<Vec<String>, LookupError>;
}

/// Errors from a single `(name, record type)` lookup.
///
/// The enricher never lets these escape: each one becomes an empty
/// result for the pair that failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("no {record_type} records for '{name}'")]
    NoRecords { name: String, record_type: String },

    #[error("lookup timed out after {0}ms")]
    Timeout(u64),

    #[error("lookup failed: {0}")]
    Failed(String),
}

/// Resolved values for one key, by record type, in requested type order.
pub type KeyRecords = IndexMap<String, Vec<String>>;

/// Enrichment result: every requested key mapped to its records.
pub type Enrichment = HashMap<String, KeyRecords>;

/// Record set with every requested type present and empty.
pub(crate) fn empty_records(record_types: &[String]) -> KeyRecords {
    record_types
        .iter()
        .map(|t| (t.clone(), Vec::new()))
        .collect()
}
