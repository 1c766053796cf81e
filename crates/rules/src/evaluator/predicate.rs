//! Single-column predicates.

use regex::{Regex, RegexBuilder};

use checksift_core::Record;

use crate::schema::{ConditionSpec, PredicateMode};

use super::ConfigError;

/// A compiled `(column, pattern, mode)` test.
#[derive(Debug, Clone)]
pub struct Predicate {
    pub column: String,
    pub pattern: String,
    pub mode: PredicateMode,
    /// Present for `contains` / `not_contains`.
    regex: Option<Regex>,
}

impl Predicate {
    /// Build a predicate from its parts. The pattern is compiled as a
    /// case-insensitive regex for the pattern-using modes and ignored otherwise.
    pub fn new(column: &str, pattern: &str, mode: PredicateMode) -> Result<Self, ConfigError> {
        if column.is_empty() {
            return Err(ConfigError::EmptyColumn);
        }
        let regex = if mode.uses_pattern() {
            let compiled = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
            Some(compiled)
        } else {
            None
        };
        Ok(Self {
            column: column.to_string(),
            pattern: pattern.to_string(),
            mode,
            regex,
        })
    }

    /// Compile a YAML condition.
    pub fn compile(spec: &ConditionSpec) -> Result<Self, ConfigError> {
        let raw = spec.normalize()?;
        let mode: PredicateMode = raw
            .mode
            .parse()
            .map_err(|_| ConfigError::UnknownMode(raw.mode.clone()))?;
        Self::new(&raw.column, &raw.pattern, mode)
    }

    /// Evaluate against one record. Never fails.
    ///
    /// A record without the column abstains (returns true).
    pub fn evaluate(&self, record: &Record) -> bool {
        if !record.has_column(&self.column) {
            return true;
        }
        let value = record.get(&self.column);
        match self.mode {
            PredicateMode::Contains => self.search(value),
            PredicateMode::NotContains => !self.search(value),
            PredicateMode::IsEmpty => is_blank(value),
            PredicateMode::NotEmpty => !is_blank(value),
        }
    }

    fn search(&self, value: Option<&str>) -> bool {
        match &self.regex {
            Some(re) => re.is_match(value.unwrap_or("")),
            None => true,
        }
    }
}

/// Free-function form of [`Predicate::evaluate`].
pub fn evaluate(record: &Record, predicate: &Predicate) -> bool {
    predicate.evaluate(record)
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}
