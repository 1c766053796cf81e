mod cli;
mod commands;
mod report;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use tracing::info;

use checksift_core::config::{load_dotenv, parse_delimiter, IoConfig};
use checksift_core::Config;

use crate::cli::{CliArgs, Command};
use crate::commands::enrich::EnrichStage;
use crate::report::RunReport;

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so clap's `env =` defaults can see it
    load_dotenv();
    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .with_target(false)
        .init();

    let mut config = Config::from_env();
    config.io = apply_overrides(config.io, &args)?;
    config.log_summary();
    let io = config.io;

    let mut report = RunReport::start();

    match &args.command {
        Command::Partition { input, rule } => {
            let rule = commands::load_partition_rule(rule, &io.rules_dir)?;
            let run = commands::partition::execute(input, &rule, &io)?;
            report.partition = Some(run.report);
        }
        Command::Enrich { inputs, rule } => {
            let rule = commands::load_enrichment_rule(rule, &io.rules_dir)?;
            let stage = EnrichStage::with_dns(&rule)?;
            report.enrichment = commands::enrich::execute(inputs, &stage, &io).await?;
        }
        Command::Run {
            input,
            partition_rule,
            enrich_rule,
            enrich,
        } => {
            if !enrich.is_empty() && enrich_rule.is_none() {
                bail!("--enrich needs --enrich-rule");
            }
            let partition_rule = commands::load_partition_rule(partition_rule, &io.rules_dir)?;
            let stage = match enrich_rule {
                Some(reference) => {
                    let rule = commands::load_enrichment_rule(reference, &io.rules_dir)?;
                    Some(EnrichStage::with_dns(&rule)?)
                }
                None => None,
            };
            let (partition, enrichment) =
                commands::run::execute(input, &partition_rule, stage.as_ref(), enrich, &io).await?;
            report.partition = Some(partition);
            report.enrichment = enrichment;
        }
        Command::Validate { paths } => {
            return commands::validate::execute(paths, &io.rules_dir);
        }
    }

    report.finish();
    report.log_summary();
    if let Some(path) = &args.report {
        report.write_json(path)?;
    }
    info!(output_dir = %io.output_dir.display(), "done");
    Ok(())
}

/// Command-line flags take precedence over the environment.
fn apply_overrides(mut io: IoConfig, args: &CliArgs) -> Result<IoConfig> {
    if let Some(dir) = &args.output_dir {
        io.output_dir = dir.clone();
    }
    if let Some(dir) = &args.rules_dir {
        io.rules_dir = dir.clone();
    }
    if let Some(d) = &args.delimiter {
        io.delimiter = parse_delimiter(d)
            .ok_or_else(|| anyhow!("invalid delimiter '{d}': expected one byte or 'tab'"))?;
    }
    Ok(io)
}
