//! Header, partition and enrichment settings validation.

use std::net::{IpAddr, SocketAddr};

use crate::schema::*;

use super::condition_checks::validate_conditions;
use super::fuzzy::{fuzzy_match, is_kebab_case};
use super::ValidationResult;

/// Record types the resolver can be asked for.
pub(crate) const VALID_RECORD_TYPES: &[&str] = &[
    "A", "AAAA", "CAA", "CNAME", "MX", "NS", "PTR", "SOA", "SRV", "TXT",
];

pub(super) fn validate_header(
    api_version: &str,
    kind: &str,
    expected: RuleKind,
    metadata: &CommonMetadata,
    result: &mut ValidationResult,
) {
    if api_version != "v1" {
        result.error("apiVersion", format!("apiVersion must be 'v1', got '{api_version}'"));
    }

    if kind != expected.to_string() {
        result.error("kind", format!("kind must be '{expected}', got '{kind}'"));
    }

    if !is_kebab_case(&metadata.id) {
        result.error(
            "metadata.id",
            format!(
                "id must be kebab-case (lowercase alphanumeric + hyphens), got '{}'",
                metadata.id
            ),
        );
    }

    if metadata.name.trim().is_empty() {
        result.error("metadata.name", "name must not be empty");
    }

    if !metadata.enabled {
        result.warn("metadata.enabled", "Rule is disabled and will not run");
    }
}

pub(super) fn validate_partition_spec(spec: &PartitionSpec, result: &mut ValidationResult) {
    if spec.key_column.trim().is_empty() {
        result.error("spec.key_column", "key_column must not be empty");
    }

    if spec.groups.is_empty() {
        result.warn("spec.groups", "No groups: every unique row ends up in the remainder");
    }

    for (name, conditions) in &spec.groups {
        let path = format!("spec.groups.{name}");
        if name.trim().is_empty() {
            result.error(&path, "Group name must not be empty");
            continue;
        }
        // Group names become output file names.
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            result.error(&path, format!("Group name '{name}' is not usable as a file name"));
            continue;
        }
        validate_conditions(conditions, &path, result);
    }
}

pub(super) fn validate_enrichment_spec(spec: &EnrichmentSpec, result: &mut ValidationResult) {
    if spec.key_column.trim().is_empty() {
        result.error("spec.key_column", "key_column must not be empty");
    }

    if spec.record_types.is_empty() {
        result.error("spec.record_types", "At least one record type is required");
    }
    for (i, rt) in spec.record_types.iter().enumerate() {
        if !VALID_RECORD_TYPES.contains(&rt.to_uppercase().as_str()) {
            let path = format!("spec.record_types[{i}]");
            match fuzzy_match(rt, VALID_RECORD_TYPES) {
                Some(s) => result.error_with_suggestion(&path, format!("Unknown record type '{rt}'"), format!("Did you mean '{s}'?")),
                None => result.error(&path, format!("Unknown record type '{rt}'")),
            }
        }
    }

    if spec.nameservers.is_empty() {
        result.error("spec.nameservers", "At least one nameserver is required");
    } else if spec.nameservers.len() == 1 {
        result.warn("spec.nameservers", "Only one nameserver: lookups have no fallback");
    }
    for (i, ns) in spec.nameservers.iter().enumerate() {
        if ns.parse::<IpAddr>().is_err() && ns.parse::<SocketAddr>().is_err() {
            result.error(
                format!("spec.nameservers[{i}]"),
                format!("'{ns}' is not an IP address or ip:port"),
            );
        }
    }

    if spec.timeout_ms == 0 {
        result.error("spec.timeout_ms", "timeout_ms must be greater than 0");
    }
    if spec.max_concurrency == 0 {
        result.error("spec.max_concurrency", "max_concurrency must be at least 1");
    }
    if spec.separator.is_empty() {
        result.warn("spec.separator", "Empty separator: multiple records run together in one cell");
    }

    validate_conditions(&spec.conditions, "spec.conditions", result);
}
