use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Split monitoring-check exports into partitions and filter them by DNS.
///
/// Rules are YAML documents (`PartitionConfig`, `EnrichmentConfig`) looked
/// up by id in the rules directory, or given directly as a file path.
#[derive(Parser, Debug)]
#[command(name = "checksift", version)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Directory partition and enrichment files are written to
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Directory scanned for rule documents
    #[arg(long, global = true)]
    pub rules_dir: Option<PathBuf>,

    /// Field delimiter for input and output tables (`,` `;` `tab` ...)
    #[arg(long, global = true)]
    pub delimiter: Option<String>,

    /// Write a JSON run report to this path
    #[arg(long, global = true)]
    pub report: Option<PathBuf>,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, env = "CHECKSIFT_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split a table into duplicates, one file per group, and the remainder
    Partition {
        /// Input table
        input: PathBuf,
        /// PartitionConfig id or path
        #[arg(long, env = "CHECKSIFT_PARTITION_RULE")]
        rule: String,
    },
    /// Resolve DNS records for each table and filter on the results
    Enrich {
        /// Input tables; missing files are reported and skipped
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// EnrichmentConfig id or path
        #[arg(long, env = "CHECKSIFT_ENRICH_RULE")]
        rule: String,
    },
    /// Partition a table, then enrich selected partitions
    Run {
        /// Input table
        input: PathBuf,
        /// PartitionConfig id or path
        #[arg(long, env = "CHECKSIFT_PARTITION_RULE")]
        partition_rule: String,
        /// EnrichmentConfig id or path
        #[arg(long, env = "CHECKSIFT_ENRICH_RULE")]
        enrich_rule: Option<String>,
        /// Partition names to enrich (comma separated)
        #[arg(long, value_delimiter = ',')]
        enrich: Vec<String>,
    },
    /// Validate rule files or directories and print the results as JSON
    Validate {
        /// Rule files or directories (default: the rules directory)
        paths: Vec<PathBuf>,
    },
}
