//! Rule validation with structured errors and suggestions.
//!
//! Validates rule documents up front so that problems surface before a run:
//! envelope and metadata, partition groups, enrichment settings and every
//! condition. Returns a [`ValidationResult`] with errors (the document is
//! unusable as written) and warnings (advisory).
//!
//! The evaluator stays lenient regardless: it skips what this module would
//! flag as an error. Validation is how those problems get reported early.

mod condition_checks;
mod config_checks;

pub mod fuzzy;

use crate::schema::*;
use serde::{Deserialize, Serialize};

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON-path-like location, e.g. `"spec.groups.test[1].mode"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a parsed [`PartitionRule`].
pub fn validate_partition_rule(rule: &PartitionRule) -> ValidationResult {
    let mut result = ValidationResult::new();
    config_checks::validate_header(&rule.api_version, &rule.kind, RuleKind::PartitionConfig, &rule.metadata, &mut result);
    config_checks::validate_partition_spec(&rule.spec, &mut result);
    result
}

/// Validate a parsed [`EnrichmentRule`].
pub fn validate_enrichment_rule(rule: &EnrichmentRule) -> ValidationResult {
    let mut result = ValidationResult::new();
    config_checks::validate_header(&rule.api_version, &rule.kind, RuleKind::EnrichmentConfig, &rule.metadata, &mut result);
    config_checks::validate_enrichment_spec(&rule.spec, &mut result);
    result
}

/// Validate any [`RuleDocument`] variant, dispatching to the appropriate validator.
pub fn validate_document(doc: &RuleDocument) -> ValidationResult {
    match doc {
        RuleDocument::Partition(rule) => validate_partition_rule(rule),
        RuleDocument::Enrichment(rule) => validate_enrichment_rule(rule),
    }
}

/// Parse raw YAML and validate. Returns parse errors merged with validation errors.
pub fn validate_yaml(yaml: &str) -> ValidationResult {
    match parse_document(yaml) {
        Ok(doc) => validate_document(&doc),
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("", format!("YAML parse error: {e}"));
            result
        }
    }
}

#[cfg(test)]
mod tests;
