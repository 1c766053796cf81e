pub mod enrich;
pub mod partition;
pub mod run;
pub mod validate;

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::warn;

use checksift_rules::loader::RuleLoader;
use checksift_rules::schema::{CommonMetadata, EnrichmentRule, PartitionRule, RuleDocument};
use checksift_rules::validation::{validate_enrichment_rule, validate_partition_rule, ValidationResult};

/// Resolve a `PartitionConfig` reference: an existing file path, or an id
/// looked up in `rules_dir`.
///
/// Disabled and invalid rules are refused.
pub fn load_partition_rule(reference: &str, rules_dir: &Path) -> Result<PartitionRule> {
    let rule = match load_file(reference)? {
        Some(RuleDocument::Partition(rule)) => rule,
        Some(other) => bail!(
            "rule '{}' is a {}, not a PartitionConfig",
            other.metadata().id,
            other.kind()
        ),
        None => scan(rules_dir)?.partition_rule(reference)?.clone(),
    };
    ensure_runnable(&rule.metadata, &validate_partition_rule(&rule))?;
    Ok(rule)
}

/// Resolve an `EnrichmentConfig` reference the same way as
/// [`load_partition_rule`].
pub fn load_enrichment_rule(reference: &str, rules_dir: &Path) -> Result<EnrichmentRule> {
    let rule = match load_file(reference)? {
        Some(RuleDocument::Enrichment(rule)) => rule,
        Some(other) => bail!(
            "rule '{}' is a {}, not an EnrichmentConfig",
            other.metadata().id,
            other.kind()
        ),
        None => scan(rules_dir)?.enrichment_rule(reference)?.clone(),
    };
    ensure_runnable(&rule.metadata, &validate_enrichment_rule(&rule))?;
    Ok(rule)
}

fn load_file(reference: &str) -> Result<Option<RuleDocument>> {
    let path = Path::new(reference);
    if !path.is_file() {
        return Ok(None);
    }
    let doc = RuleLoader::load_file(path)
        .with_context(|| format!("failed to load rule file {}", path.display()))?;
    Ok(Some(doc))
}

fn scan(rules_dir: &Path) -> Result<RuleLoader> {
    let mut loader = RuleLoader::new(rules_dir.to_path_buf());
    loader
        .load_all()
        .with_context(|| format!("failed to scan rules directory {}", rules_dir.display()))?;
    Ok(loader)
}

fn ensure_runnable(metadata: &CommonMetadata, validation: &ValidationResult) -> Result<()> {
    let id = &metadata.id;
    if !metadata.enabled {
        bail!("rule '{id}' is disabled (enabled: false); enable it to run it");
    }
    if !validation.valid {
        let problems: Vec<String> = validation
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        bail!("rule '{id}' is invalid: {}", problems.join("; "));
    }
    for w in &validation.warnings {
        warn!(rule = %id, path = %w.path, "{}", w.message);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    use checksift_core::config::IoConfig;
    use checksift_enrich::{LookupError, RecordResolver};

    pub const CHECKS_CSV: &str = "\
Hostname,Status,Tags,Last Check Time (UTC)
a.test.com,active,,2024-05-01
a.test.com,paused,,
b.prod.com,active,dxc,2024-05-01
shop.example.com,paused,,
www.example.com,active,web,2024-05-01
";

    pub const PARTITION_RULE: &str = r#"
apiVersion: v1
kind: PartitionConfig
metadata:
  id: triage
  name: Triage
spec:
  groups:
    paused_tobe_enable:
      - [Status, paused, contains]
      - ["Last Check Time (UTC)", "", is_empty]
    test:
      - [Hostname, "test|uat", contains]
    everweb:
      - [Tags, "dxc|dxp", not_contains]
"#;

    pub const ENRICHMENT_RULE: &str = r#"
apiVersion: v1
kind: EnrichmentConfig
metadata:
  id: dxp-dns
  name: DXP DNS
spec:
  record_types: [CNAME, A]
  conditions:
    - [CNAME, dxcloud, contains]
"#;

    pub fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn io(output_dir: &Path, rules_dir: &Path) -> IoConfig {
        IoConfig {
            output_dir: output_dir.to_path_buf(),
            rules_dir: rules_dir.to_path_buf(),
            delimiter: b',',
        }
    }

    /// Resolver with fixed CNAME answers; every other lookup is NXDOMAIN.
    pub struct CnameResolver(pub HashMap<String, String>);

    impl CnameResolver {
        pub fn new(pairs: &[(&str, &str)]) -> Self {
            Self(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    #[async_trait::async_trait]
    impl RecordResolver for CnameResolver {
        async fn resolve(&self, name: &str, record_type: &str) -> Result<Vec<String>, LookupError> {
            match (record_type, self.0.get(name)) {
                ("CNAME", Some(target)) => Ok(vec![target.clone()]),
                _ => Err(LookupError::NoRecords {
                    name: name.to_string(),
                    record_type: record_type.to_string(),
                }),
            }
        }
    }
}
