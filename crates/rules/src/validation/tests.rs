//! Tests for rule validation.

use super::*;

const PARTITION_YAML: &str = r#"
apiVersion: v1
kind: PartitionConfig
metadata:
  id: check-triage
  name: Check Triage
spec:
  groups:
    paused:
      - [Status, paused, contains]
      - ["Last Check Time (UTC)", "", is_empty]
    test:
      - [Hostname, "test|uat", contains]
"#;

const ENRICHMENT_YAML: &str = r#"
apiVersion: v1
kind: EnrichmentConfig
metadata:
  id: dxp-dns
  name: DXP DNS
spec:
  conditions:
    - [CNAME, dxcloud, contains]
"#;

fn error_paths(result: &ValidationResult) -> Vec<&str> {
    result.errors.iter().map(|e| e.path.as_str()).collect()
}

fn warning_paths(result: &ValidationResult) -> Vec<&str> {
    result.warnings.iter().map(|w| w.path.as_str()).collect()
}

#[test]
fn valid_documents_pass() {
    let result = validate_yaml(PARTITION_YAML);
    assert!(result.valid, "{:?}", result.errors);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);

    let result = validate_yaml(ENRICHMENT_YAML);
    assert!(result.valid, "{:?}", result.errors);
}

#[test]
fn unknown_mode_gets_suggestion() {
    let yaml = PARTITION_YAML.replace("[Status, paused, contains]", "[Status, paused, contain]");
    let result = validate_yaml(&yaml);
    assert!(!result.valid);
    let err = &result.errors[0];
    assert_eq!(err.path, "spec.groups.paused[0].mode");
    assert_eq!(err.suggestion.as_deref(), Some("Did you mean 'contains'?"));
}

#[test]
fn wrong_arity_and_bad_regex_are_errors() {
    let yaml = PARTITION_YAML
        .replace("[Status, paused, contains]", "[Status, paused]")
        .replace("\"test|uat\"", "\"(test\"");
    let result = validate_yaml(&yaml);
    assert_eq!(
        error_paths(&result),
        vec!["spec.groups.paused[0]", "spec.groups.test[0].pattern"]
    );
}

#[test]
fn ignored_pattern_and_duplicates_warn() {
    let yaml = PARTITION_YAML.replace(
        "[\"Last Check Time (UTC)\", \"\", is_empty]",
        "[\"Last Check Time (UTC)\", \"x\", is_empty]\n      - [Status, paused, contains]",
    );
    let result = validate_yaml(&yaml);
    assert!(result.valid);
    assert_eq!(
        warning_paths(&result),
        vec!["spec.groups.paused[1].pattern", "spec.groups.paused[2]"]
    );
}

#[test]
fn empty_group_warns() {
    let yaml = format!("{PARTITION_YAML}    everything: []\n");
    let result = validate_yaml(&yaml);
    assert!(result.valid);
    assert_eq!(warning_paths(&result), vec!["spec.groups.everything"]);
}

#[test]
fn group_name_must_be_a_file_name() {
    let yaml = PARTITION_YAML.replace("    test:", "    \"a/b\":");
    let result = validate_yaml(&yaml);
    assert_eq!(error_paths(&result), vec!["spec.groups.a/b"]);
}

#[test]
fn header_checks() {
    let yaml = PARTITION_YAML
        .replace("apiVersion: v1", "apiVersion: v2")
        .replace("id: check-triage", "id: Check_Triage");
    let result = validate_yaml(&yaml);
    assert_eq!(error_paths(&result), vec!["apiVersion", "metadata.id"]);
}

#[test]
fn enrichment_settings_are_checked() {
    let yaml = ENRICHMENT_YAML.replace(
        "spec:\n",
        "spec:\n  record_types: [CNAM, A]\n  nameservers: [\"8.8.8.8\", \"not-an-ip\"]\n  max_concurrency: 0\n",
    );
    let result = validate_yaml(&yaml);
    assert_eq!(
        error_paths(&result),
        vec!["spec.record_types[0]", "spec.nameservers[1]", "spec.max_concurrency"]
    );
    assert_eq!(result.errors[0].suggestion.as_deref(), Some("Did you mean 'CNAME'?"));
}

#[test]
fn single_nameserver_warns() {
    let yaml = ENRICHMENT_YAML.replace("spec:\n", "spec:\n  nameservers: [\"1.1.1.1:53\"]\n");
    let result = validate_yaml(&yaml);
    assert!(result.valid);
    assert_eq!(warning_paths(&result), vec!["spec.nameservers"]);
}

#[test]
fn parse_failure_is_reported() {
    let result = validate_yaml("not: [valid");
    assert!(!result.valid);
    assert_eq!(result.errors[0].path, "");
}
