use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use tracing::info;

use checksift_core::config::IoConfig;
use checksift_core::table::{read_table, write_table};
use checksift_core::RowSet;
use checksift_rules::evaluator::{PartitionEngine, PartitionOutcome};
use checksift_rules::schema::PartitionRule;

use crate::report::PartitionReport;

pub const DUPLICATES_FILE: &str = "duplicates.csv";
pub const REMAINDER_FILE: &str = "remainings.csv";

/// File a group's partition is written to.
///
/// Names that would leave the output directory are rejected.
pub fn partition_file_name(group: &str) -> Result<String> {
    if group.trim().is_empty() || group == "." || group == ".." || group.contains(['/', '\\']) {
        bail!("group name '{group}' cannot be used as an output file name");
    }
    Ok(format!("{group}_checks.csv"))
}

pub struct PartitionRun {
    pub outcome: PartitionOutcome,
    pub report: PartitionReport,
}

/// Execute the `partition` command: split `input` with `rule` and write
/// every partition to the output directory.
///
/// An unreadable input ends the command before any file is written.
pub fn execute(input: &Path, rule: &PartitionRule, io: &IoConfig) -> Result<PartitionRun> {
    let started = Instant::now();

    // Checked before reading so a bad name writes nothing.
    for name in rule.spec.groups.keys() {
        partition_file_name(name)?;
    }

    let rows = read_table(input, io.delimiter)
        .with_context(|| format!("failed to read input table {}", input.display()))?;
    let rows_read = rows.len();
    info!(input = %input.display(), rows = rows_read, rule = %rule.metadata.id, "partitioning");

    let engine = PartitionEngine::from_rule(rule);
    let outcome = engine.run(rows);

    let mut outputs = Vec::new();
    outputs.push(write_partition(io, DUPLICATES_FILE, &outcome.duplicates)?);
    for (name, rows) in &outcome.partitions {
        outputs.push(write_partition(io, &partition_file_name(name)?, rows)?);
    }
    if rule.spec.save_remainder {
        outputs.push(write_partition(io, REMAINDER_FILE, &outcome.remainder)?);
    }

    let report = PartitionReport {
        rule_id: rule.metadata.id.clone(),
        input: input.to_path_buf(),
        rows_read,
        counts: outcome.counts(),
        outputs,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    Ok(PartitionRun { outcome, report })
}

fn write_partition(io: &IoConfig, file_name: &str, rows: &RowSet) -> Result<PathBuf> {
    let path = io.output_dir.join(file_name);
    write_table(&path, rows, io.delimiter)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), rows = rows.len(), "wrote partition");
    Ok(path)
}
