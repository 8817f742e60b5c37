use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    pub source_name: String,
    pub path: PathBuf,
}

// Matching runs on the lossy name; `path` keeps the raw entry name so
// non-UTF-8 files still open.
pub fn locate_result_files(results_dir: &Path, token: &str) -> Result<Vec<ResultEntry>> {
    let entries = fs::read_dir(results_dir)
        .with_context(|| format!("results directory unavailable: {}", results_dir.display()))?;

    let mut located = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", results_dir.display()))?;
        let source_name = entry.file_name().to_string_lossy().into_owned();

        if source_name.contains(token) {
            located.push(ResultEntry {
                source_name,
                path: entry.path(),
            });
        } else {
            debug!(entry = %source_name, token, "skipping entry without selection token");
        }
    }

    Ok(located)
}
