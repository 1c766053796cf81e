use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub io: IoConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `CHECKSIFT_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("CHECKSIFT_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        Self {
            io: IoConfig::from_env_profiled(&p),
            profile: p,
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  io:  output_dir={}, rules_dir={}, delimiter={:?}",
            self.io.output_dir.display(),
            self.io.rules_dir.display(),
            self.io.delimiter as char
        );
    }
}

// ── Table I/O ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoConfig {
    /// Where partition files are written (created if absent).
    pub output_dir: PathBuf,
    /// Directory scanned for rule documents.
    pub rules_dir: PathBuf,
    /// Field delimiter for both input and output tables.
    pub delimiter: u8,
}

impl IoConfig {
    fn from_env_profiled(p: &str) -> Self {
        let delimiter = profiled_env_opt(p, "CHECKSIFT_DELIMITER")
            .and_then(|d| parse_delimiter(&d))
            .unwrap_or(b',');
        Self {
            output_dir: PathBuf::from(profiled_env_or(p, "CHECKSIFT_OUTPUT_DIR", "output")),
            rules_dir: PathBuf::from(profiled_env_or(p, "CHECKSIFT_RULES_DIR", "data/rules")),
            delimiter,
        }
    }
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            rules_dir: PathBuf::from("data/rules"),
            delimiter: b',',
        }
    }
}

/// Parse a single-byte delimiter. Accepts `\t` / `tab` for tab.
pub fn parse_delimiter(s: &str) -> Option<u8> {
    match s {
        "\\t" | "tab" | "\t" => Some(b'\t'),
        _ if s.len() == 1 => s.bytes().next(),
        _ => None,
    }
}
