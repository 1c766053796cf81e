use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use checksift_rules::validation::{validate_yaml, ValidationResult};

#[derive(Debug, Serialize)]
pub struct FileValidation {
    pub path: PathBuf,
    #[serde(flatten)]
    pub result: ValidationResult,
}

/// Execute the `validate` command: print one JSON entry per rule file and
/// fail when any of them is invalid.
pub fn execute(paths: &[PathBuf], rules_dir: &Path) -> Result<()> {
    let results = validate_paths(paths, rules_dir)?;
    println!("{}", serde_json::to_string_pretty(&results)?);

    let invalid = results.iter().filter(|f| !f.result.valid).count();
    info!(files = results.len(), invalid, "validation finished");
    if invalid > 0 {
        bail!("{} of {} rule files are invalid", invalid, results.len());
    }
    Ok(())
}

/// Validate every rule file under `paths` (the rules directory when empty).
pub fn validate_paths(paths: &[PathBuf], rules_dir: &Path) -> Result<Vec<FileValidation>> {
    let roots: Vec<PathBuf> = if paths.is_empty() {
        vec![rules_dir.to_path_buf()]
    } else {
        paths.to_vec()
    };

    let mut files = Vec::new();
    for root in &roots {
        if root.is_dir() {
            collect_yaml(root, &mut files)?;
        } else if root.is_file() {
            files.push(root.clone());
        } else {
            bail!("no such file or directory: {}", root.display());
        }
    }
    if files.is_empty() {
        warn!("no rule files found");
    }

    files
        .into_iter()
        .map(|path| {
            let yaml = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let result = validate_yaml(&yaml);
            Ok(FileValidation { path, result })
        })
        .collect()
}

fn collect_yaml(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    for path in entries {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if hidden {
            continue;
        }
        if path.is_dir() {
            collect_yaml(&path, files)?;
        } else if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yml" | "yaml")
        ) {
            files.push(path);
        }
    }
    Ok(())
}
