//! Partition rule: ordered condition groups applied to a check table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::metadata::default_true;
use super::{CommonMetadata, ConditionSpec};

/// Splits a table into named partitions, first matching group wins.
///
/// ```yaml
/// apiVersion: v1
/// kind: PartitionConfig
/// metadata:
///   id: check-triage
///   name: Check triage
/// spec:
///   key_column: Hostname
///   groups:
///     paused:
///       - [Status, paused, contains]
///     test:
///       - [Hostname, "test|uat|stage", contains]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartitionRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: PartitionSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartitionSpec {
    /// Column used for duplicate detection.
    #[serde(default = "default_key_column")]
    pub key_column: String,
    /// Write the remainder partition.
    #[serde(default = "default_true")]
    pub save_remainder: bool,
    /// Group name → AND-ed conditions, in priority order.
    #[serde(default)]
    pub groups: IndexMap<String, Vec<ConditionSpec>>,
}

pub(crate) fn default_key_column() -> String {
    "Hostname".to_string()
}
