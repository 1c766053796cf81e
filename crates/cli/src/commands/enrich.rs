use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use checksift_core::config::IoConfig;
use checksift_core::table::{read_table, write_table};
use checksift_core::RowSet;
use checksift_enrich::{join, lookup_keys, DnsEnricher, HickoryResolver, RecordResolver};
use checksift_rules::evaluator::{post_filter, ConditionGroup};
use checksift_rules::schema::EnrichmentRule;

use crate::report::{EnrichmentReport, EnrichmentStatus};

/// One enrichment rule ready to run: resolver, enricher and post-filter.
pub struct EnrichStage {
    rule_id: String,
    key_column: String,
    separator: String,
    enricher: DnsEnricher,
    filter: ConditionGroup,
}

impl EnrichStage {
    pub fn new(rule: &EnrichmentRule, resolver: Arc<dyn RecordResolver>) -> Self {
        Self {
            rule_id: rule.metadata.id.clone(),
            key_column: rule.spec.key_column.clone(),
            separator: rule.spec.separator.clone(),
            enricher: DnsEnricher::from_spec(resolver, &rule.spec),
            filter: ConditionGroup::compile(rule.metadata.id.clone(), &rule.spec.conditions),
        }
    }

    /// Build a stage that resolves against the rule's nameservers.
    pub fn with_dns(rule: &EnrichmentRule) -> Result<Self> {
        let resolver = HickoryResolver::from_spec(&rule.spec)
            .with_context(|| format!("invalid resolver settings in rule '{}'", rule.metadata.id))?;
        Ok(Self::new(rule, Arc::new(resolver)))
    }

    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// Enrich `rows`, filter them, and write `dns_<label>`,
    /// `filtered_dns_<label>` and `residual_dns_<label>`.
    pub async fn run(&self, label: &str, rows: RowSet, io: &IoConfig) -> Result<EnrichmentReport> {
        let started = Instant::now();
        let row_count = rows.len();

        if !rows.has_column(&self.key_column) {
            warn!(input = %label, column = %self.key_column, "key column not found, no lookups will be made");
        }

        let keys: Vec<String> = lookup_keys(&rows, &self.key_column)
            .into_iter()
            .map(str::to_string)
            .collect();
        info!(input = %label, rows = row_count, keys = keys.len(), "resolving");

        let enrichment = self.enricher.enrich(&keys).await;
        let resolved_keys = enrichment
            .values()
            .filter(|records| records.values().any(|v| !v.is_empty()))
            .count();

        let enriched = join(
            rows,
            &enrichment,
            &self.key_column,
            self.enricher.record_types(),
            &self.separator,
        );

        let mut outputs = Vec::with_capacity(3);
        outputs.push(write_output(io, &format!("dns_{label}"), &enriched)?);

        let (matched, residual) = post_filter(enriched, &self.filter);
        outputs.push(write_output(io, &format!("filtered_dns_{label}"), &matched)?);
        outputs.push(write_output(io, &format!("residual_dns_{label}"), &residual)?);

        Ok(EnrichmentReport {
            rule_id: self.rule_id.clone(),
            input: label.to_string(),
            status: EnrichmentStatus::Completed,
            rows: row_count,
            keys: keys.len(),
            resolved_keys,
            matched: matched.len(),
            residual: residual.len(),
            outputs,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}

/// Execute the `enrich` command over several input tables.
///
/// A missing or unreadable input is reported and skipped; the others still run.
pub async fn execute(inputs: &[PathBuf], stage: &EnrichStage, io: &IoConfig) -> Result<Vec<EnrichmentReport>> {
    let mut reports = Vec::with_capacity(inputs.len());
    for input in inputs {
        let label = input_label(input);

        if !input.is_file() {
            error!(input = %input.display(), "input file not found, skipping");
            reports.push(EnrichmentReport::skipped(stage.rule_id(), label, "file not found"));
            continue;
        }

        let rows = match read_table(input, io.delimiter) {
            Ok(rows) => rows,
            Err(e) => {
                error!(input = %input.display(), error = %e, "failed to read input, skipping");
                reports.push(EnrichmentReport::skipped(stage.rule_id(), label, e.to_string()));
                continue;
            }
        };

        reports.push(stage.run(&label, rows, io).await?);
    }
    Ok(reports)
}

fn input_label(input: &Path) -> String {
    input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}

fn write_output(io: &IoConfig, file_name: &str, rows: &RowSet) -> Result<PathBuf> {
    let path = io.output_dir.join(file_name);
    write_table(&path, rows, io.delimiter)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), rows = rows.len(), "wrote enrichment output");
    Ok(path)
}
