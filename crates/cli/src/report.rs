//! Machine-readable summary of one invocation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use checksift_rules::evaluator::PartitionCounts;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<PartitionReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enrichment: Vec<EnrichmentReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartitionReport {
    pub rule_id: String,
    pub input: PathBuf,
    pub rows_read: usize,
    pub counts: PartitionCounts,
    pub outputs: Vec<PathBuf>,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentReport {
    pub rule_id: String,
    /// Input file name, or `<group>_checks.csv` for an in-memory partition.
    pub input: String,
    pub status: EnrichmentStatus,
    pub rows: usize,
    pub keys: usize,
    pub resolved_keys: usize,
    pub matched: usize,
    pub residual: usize,
    pub outputs: Vec<PathBuf>,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EnrichmentStatus {
    Completed,
    Skipped { reason: String },
}

impl EnrichmentReport {
    pub fn skipped(rule_id: &str, input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            input: input.into(),
            status: EnrichmentStatus::Skipped {
                reason: reason.into(),
            },
            rows: 0,
            keys: 0,
            resolved_keys: 0,
            matched: 0,
            residual: 0,
            outputs: Vec::new(),
            elapsed_ms: 0,
        }
    }
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            elapsed_ms: 0,
            partition: None,
            enrichment: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        let now = Utc::now();
        self.elapsed_ms = (now - self.started_at).num_milliseconds().max(0) as u64;
        self.finished_at = Some(now);
    }

    pub fn log_summary(&self) {
        if let Some(p) = &self.partition {
            info!(
                rule = %p.rule_id,
                rows_read = p.rows_read,
                duplicates = p.counts.duplicates,
                remainder = p.counts.remainder,
                elapsed_ms = p.elapsed_ms,
                "partition summary"
            );
            for (name, rows) in &p.counts.partitions {
                info!(partition = %name, rows, "  partition");
            }
        }
        for e in &self.enrichment {
            match &e.status {
                EnrichmentStatus::Completed => info!(
                    input = %e.input,
                    rows = e.rows,
                    keys = e.keys,
                    resolved_keys = e.resolved_keys,
                    matched = e.matched,
                    residual = e.residual,
                    elapsed_ms = e.elapsed_ms,
                    "enrichment summary"
                ),
                EnrichmentStatus::Skipped { reason } => {
                    info!(input = %e.input, reason = %reason, "enrichment skipped")
                }
            }
        }
        info!(elapsed_ms = self.elapsed_ms, "run finished");
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "wrote run report");
        Ok(())
    }
}
