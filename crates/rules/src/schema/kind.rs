//! Rule kind enum for two-pass deserialization dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported rule kinds for two-pass deserialization dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    PartitionConfig,
    EnrichmentConfig,
}

impl RuleKind {
    pub const ALL: &'static [&'static str] = &["PartitionConfig", "EnrichmentConfig"];
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::PartitionConfig => write!(f, "PartitionConfig"),
            RuleKind::EnrichmentConfig => write!(f, "EnrichmentConfig"),
        }
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PartitionConfig" => Ok(RuleKind::PartitionConfig),
            "EnrichmentConfig" => Ok(RuleKind::EnrichmentConfig),
            other => Err(format!("unknown rule kind: '{}'", other)),
        }
    }
}
