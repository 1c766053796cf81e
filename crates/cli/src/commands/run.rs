use std::path::Path;

use anyhow::Result;
use tracing::warn;

use checksift_core::config::IoConfig;
use checksift_rules::schema::PartitionRule;

use super::enrich::EnrichStage;
use super::partition::{self, partition_file_name};
use crate::report::{EnrichmentReport, PartitionReport};

/// Execute the `run` command: partition `input`, then enrich each partition
/// named in `enrich` straight from memory.
///
/// Enriched partitions are labelled by their partition file name, so group
/// `everweb` produces `dns_everweb_checks.csv` and friends.
pub async fn execute(
    input: &Path,
    rule: &PartitionRule,
    stage: Option<&EnrichStage>,
    enrich: &[String],
    io: &IoConfig,
) -> Result<(PartitionReport, Vec<EnrichmentReport>)> {
    let partition::PartitionRun { mut outcome, report } = partition::execute(input, rule, io)?;

    let mut enrichment = Vec::new();
    let Some(stage) = stage else {
        if !enrich.is_empty() {
            warn!(partitions = ?enrich, "no enrichment rule given, skipping enrichment");
        }
        return Ok((report, enrichment));
    };

    for name in enrich {
        let label = partition_file_name(name)?;
        match outcome.partitions.shift_remove(name.as_str()) {
            Some(rows) => enrichment.push(stage.run(&label, rows, io).await?),
            None => {
                warn!(partition = %name, "no partition with this name, skipping enrichment");
                enrichment.push(EnrichmentReport::skipped(
                    stage.rule_id(),
                    label,
                    format!("no partition named '{name}'"),
                ));
            }
        }
    }

    Ok((report, enrichment))
}
