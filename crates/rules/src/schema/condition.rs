//! Column conditions: the `(column, pattern, mode)` triples that make up a group.
//!
//! Conditions stay loosely typed at deserialization time so that one bad
//! entry does not reject the whole document. They are compiled into typed
//! predicates by [`crate::evaluator::Predicate::compile`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::evaluator::ConfigError;

/// A condition as written in YAML.
///
/// Either a three-element sequence:
/// ```yaml
/// - [Hostname, "test|uat", contains]
/// ```
/// or a mapping:
/// ```yaml
/// - { column: Status, pattern: paused, mode: contains }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ConditionSpec {
    Tuple(Vec<serde_yaml::Value>),
    Fields {
        column: String,
        #[serde(default)]
        pattern: String,
        mode: String,
    },
}

/// A condition with its shape checked but its mode and pattern not yet compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCondition {
    pub column: String,
    pub pattern: String,
    pub mode: String,
}

impl ConditionSpec {
    /// Build a spec from string parts.
    pub fn new(column: &str, pattern: &str, mode: &str) -> Self {
        ConditionSpec::Fields {
            column: column.to_string(),
            pattern: pattern.to_string(),
            mode: mode.to_string(),
        }
    }

    /// Check the shape: exactly three scalar parts.
    pub fn normalize(&self) -> Result<RawCondition, ConfigError> {
        match self {
            ConditionSpec::Fields {
                column,
                pattern,
                mode,
            } => Ok(RawCondition {
                column: column.clone(),
                pattern: pattern.clone(),
                mode: mode.clone(),
            }),
            ConditionSpec::Tuple(parts) => {
                if parts.len() != 3 {
                    return Err(ConfigError::Arity { found: parts.len() });
                }
                let mut strings = Vec::with_capacity(3);
                for (index, part) in parts.iter().enumerate() {
                    strings.push(scalar_to_string(part).ok_or(ConfigError::NonScalar { index })?);
                }
                let mode = strings.pop().unwrap_or_default();
                let pattern = strings.pop().unwrap_or_default();
                let column = strings.pop().unwrap_or_default();
                Ok(RawCondition {
                    column,
                    pattern,
                    mode,
                })
            }
        }
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        _ => None,
    }
}

/// How a predicate tests its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateMode {
    /// Case-insensitive regex search over the cell text.
    Contains,
    NotContains,
    /// Null, or blank after trimming.
    IsEmpty,
    NotEmpty,
}

impl PredicateMode {
    pub const ALL: &'static [&'static str] = &["contains", "not_contains", "is_empty", "not_empty"];

    /// Whether the pattern takes part in evaluation.
    pub fn uses_pattern(self) -> bool {
        matches!(self, PredicateMode::Contains | PredicateMode::NotContains)
    }
}

impl fmt::Display for PredicateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateMode::Contains => write!(f, "contains"),
            PredicateMode::NotContains => write!(f, "not_contains"),
            PredicateMode::IsEmpty => write!(f, "is_empty"),
            PredicateMode::NotEmpty => write!(f, "not_empty"),
        }
    }
}

impl FromStr for PredicateMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "contains" => Ok(PredicateMode::Contains),
            "not_contains" => Ok(PredicateMode::NotContains),
            "is_empty" => Ok(PredicateMode::IsEmpty),
            "not_empty" => Ok(PredicateMode::NotEmpty),
            other => Err(format!("unsupported mode: '{}'", other)),
        }
    }
}
