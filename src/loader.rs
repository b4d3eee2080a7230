//! Snapshot loader.
//!
//! Reads every `client-info-*.json` style file in a directory, tags each client
//! record with the timestamp embedded in the file name and concatenates the
//! result into one [`SnapshotTable`].
//!
//! A file that cannot be read or is not valid JSON is logged and skipped; the
//! run continues with the remaining files. A file that is valid JSON but whose
//! records do not carry the expected fields aborts the load.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::DateTime;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::models::{ClientRecord, RawClientRecord, SnapshotTable, SnapshotTime};

// ---

/// Fatal loader errors. Per-file parse failures are not errors; they are
/// logged and counted in [`LoadReport::files_skipped`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid snapshot pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("malformed client record in {}: {source}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of a directory load.
#[derive(Debug, Default)]
pub struct LoadReport {
    // ---
    pub table: SnapshotTable,
    pub files_found: usize,
    pub files_loaded: usize,
    pub files_skipped: usize,
}

fn timestamp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\d{4}-\d{2}-\d{2}T\d{2}_\d{2}_\d{2}\+\d{2}_\d{2}")
            .unwrap_or_else(|e| unreachable!("static regex is valid: {e}"))
    })
}

/// Extract the snapshot timestamp from a file name such as
/// `client-info-2025-04-03T14_30_00+02_00.json`.
///
/// Underscores stand in for the colons of the time and offset parts.
pub fn parse_snapshot_timestamp(file_name: &str) -> Option<SnapshotTime> {
    // ---
    let matched = timestamp_pattern().find(file_name)?;
    let rfc3339 = matched.as_str().replace('_', ":");
    DateTime::parse_from_rfc3339(&rfc3339).ok()
}

/// Find the files matching `pattern` directly inside `dir`, sorted by path.
pub fn discover_snapshot_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, LoadError> {
    // ---
    let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());
    let full = format!("{}/{}", escaped_dir.trim_end_matches('/'), pattern);

    let entries = glob::glob(&full).map_err(|source| LoadError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                None
            }
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Load all snapshot files matching `pattern` inside `dir`.
///
/// The returned table is in file order; callers sort it by timestamp.
pub fn load_snapshots(dir: &Path, pattern: &str) -> Result<LoadReport, LoadError> {
    // ---
    let files = discover_snapshot_files(dir, pattern)?;
    info!("Found {} snapshot files in {}", files.len(), dir.display());

    let mut report = LoadReport {
        files_found: files.len(),
        ..LoadReport::default()
    };

    for path in &files {
        match load_snapshot_file(path)? {
            Some(records) => {
                report.files_loaded += 1;
                debug!("Loaded {} records from {}", records.len(), path.display());
                report.table.extend(records);
            }
            None => report.files_skipped += 1,
        }
    }

    info!(
        "Loaded {} records from {} files ({} skipped)",
        report.table.len(),
        report.files_loaded,
        report.files_skipped
    );
    Ok(report)
}

/// Parse one snapshot file. `Ok(None)` means the file was skipped.
fn load_snapshot_file(path: &Path) -> Result<Option<Vec<ClientRecord>>, LoadError> {
    // ---
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let Some(timestamp) = parse_snapshot_timestamp(&file_name) else {
        warn!("No snapshot timestamp in file name {}, skipping", path.display());
        return Ok(None);
    };

    // The handle is closed before the records are processed.
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            error!("Error loading {}: {}", path.display(), e);
            return Ok(None);
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(e) => {
            error!("Error loading {}: {}", path.display(), e);
            return Ok(None);
        }
    };

    // Only an array of objects is a snapshot; anything else is a broken file
    let is_snapshot = value
        .as_array()
        .is_some_and(|rows| rows.iter().all(serde_json::Value::is_object));
    if !is_snapshot {
        error!("Error loading {}: expected an array of client records", path.display());
        return Ok(None);
    }

    let raw: Vec<RawClientRecord> =
        serde_json::from_value(value).map_err(|source| LoadError::MalformedRecord {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Some(raw.into_iter().map(|r| r.at(timestamp)).collect()))
}
