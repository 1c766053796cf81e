//! Multi-kind rule document container and accessors.

use super::{CommonMetadata, EnrichmentRule, PartitionRule, RuleKind};

/// A fully deserialized rule of any supported kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleDocument {
    /// Condition groups that split a table into partitions.
    Partition(PartitionRule),
    /// DNS enrichment plus post-filter.
    Enrichment(EnrichmentRule),
}

impl RuleDocument {
    /// Get the rule's metadata regardless of kind.
    pub fn metadata(&self) -> &CommonMetadata {
        match self {
            RuleDocument::Partition(rule) => &rule.metadata,
            RuleDocument::Enrichment(rule) => &rule.metadata,
        }
    }

    /// Get the rule kind.
    pub fn kind(&self) -> RuleKind {
        match self {
            RuleDocument::Partition(_) => RuleKind::PartitionConfig,
            RuleDocument::Enrichment(_) => RuleKind::EnrichmentConfig,
        }
    }

    pub fn as_partition(&self) -> Option<&PartitionRule> {
        match self {
            RuleDocument::Partition(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn as_enrichment(&self) -> Option<&EnrichmentRule> {
        match self {
            RuleDocument::Enrichment(rule) => Some(rule),
            _ => None,
        }
    }
}
