//! Condition validation: shape, mode, pattern and redundancy.

use std::collections::HashSet;

use crate::evaluator::{ConfigError, Predicate};
use crate::schema::{ConditionSpec, PredicateMode};

use super::fuzzy::fuzzy_match;
use super::ValidationResult;

pub(super) fn validate_conditions(conditions: &[ConditionSpec], path: &str, result: &mut ValidationResult) {
    if conditions.is_empty() {
        result.warn(path, "No conditions: every row reaching this group matches");
        return;
    }

    let mut seen = HashSet::new();

    for (i, spec) in conditions.iter().enumerate() {
        let at = format!("{path}[{i}]");

        let raw = match spec.normalize() {
            Ok(raw) => raw,
            Err(e) => {
                result.error(&at, e.to_string());
                continue;
            }
        };

        let mode = match raw.mode.parse::<PredicateMode>() {
            Ok(mode) => mode,
            Err(_) => {
                let msg = format!("Unsupported mode '{}'", raw.mode);
                match fuzzy_match(&raw.mode, PredicateMode::ALL) {
                    Some(s) => result.error_with_suggestion(format!("{at}.mode"), msg, format!("Did you mean '{s}'?")),
                    None => result.error(
                        format!("{at}.mode"),
                        format!("{msg}; expected one of: {}", PredicateMode::ALL.join(", ")),
                    ),
                }
                continue;
            }
        };

        match Predicate::new(&raw.column, &raw.pattern, mode) {
            Ok(_) => {}
            Err(ConfigError::EmptyColumn) => {
                result.error(format!("{at}.column"), "Column must not be empty");
                continue;
            }
            Err(e) => {
                result.error(format!("{at}.pattern"), e.to_string());
                continue;
            }
        }

        if mode.uses_pattern() && raw.pattern.is_empty() {
            result.warn(format!("{at}.pattern"), format!("Empty pattern: '{mode}' is constant for every row"));
        }
        if !mode.uses_pattern() && !raw.pattern.is_empty() {
            result.warn(format!("{at}.pattern"), format!("Pattern is ignored for mode '{mode}'"));
        }

        if !seen.insert((raw.column.clone(), raw.pattern.clone(), mode)) {
            result.warn(&at, "Duplicate condition");
        }
    }
}
