//! Enrichment rule: DNS lookups for a partition plus a post-filter over the results.

use serde::{Deserialize, Serialize};

use super::partition::default_key_column;
use super::{CommonMetadata, ConditionSpec};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EnrichmentRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: EnrichmentSpec,
}

/// DNS enrichment settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EnrichmentSpec {
    #[serde(default = "default_key_column")]
    pub key_column: String,
    /// Record types to resolve; each becomes an output column of the same name.
    #[serde(default = "default_record_types")]
    pub record_types: Vec<String>,
    #[serde(default = "default_nameservers")]
    pub nameservers: Vec<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Joins multiple resolved values in one cell.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Post-filter conditions over the enriched columns.
    #[serde(default)]
    pub conditions: Vec<ConditionSpec>,
}

impl Default for EnrichmentSpec {
    fn default() -> Self {
        Self {
            key_column: default_key_column(),
            record_types: default_record_types(),
            nameservers: default_nameservers(),
            timeout_ms: default_timeout_ms(),
            max_concurrency: default_max_concurrency(),
            separator: default_separator(),
            conditions: Vec::new(),
        }
    }
}

fn default_record_types() -> Vec<String> {
    vec!["CNAME".to_string(), "A".to_string(), "NS".to_string()]
}

fn default_nameservers() -> Vec<String> {
    vec!["8.8.8.8".to_string(), "1.1.1.1".to_string()]
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_concurrency() -> usize {
    10
}

fn default_separator() -> String {
    ";".to_string()
}
