//! Configuration loader for `campus-wififlow`.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

use crate::pipeline::{AllowList, DuplicatePolicy, PipelineOptions, TimelineBasis, DEFAULT_BUILDINGS};
use crate::visual::SceneStyle;

/// Parse an optional environment variable into `$ty` with a default value.
macro_rules! parse_env {
    ($lookup:expr, $var_name:expr, $ty:ty, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional boolean environment variable (`1/true/yes`, `0/false/no`).
macro_rules! parse_env_bool {
    ($lookup:expr, $var_name:expr, $default:expr) => {
        match $lookup($var_name).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None => $default,
            Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") => false,
            Some(other) => bail!("Invalid {}: expected true or false, got '{}'", $var_name, other),
        }
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the run.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Directory holding the snapshot files (searched non-recursively).
    pub snapshot_dir: PathBuf,

    /// File name pattern of snapshot files.
    pub snapshot_glob: String,

    /// Building codes whose flows are kept.
    pub buildings: Vec<String>,

    /// Let access point names outside the `AP-<CODE>` convention match a code.
    pub match_fallback_buildings: bool,

    /// Keep only the first row per device and snapshot before joining.
    pub dedup_snapshot_rows: bool,

    /// Timestamps that make up the frame timeline.
    pub frame_timeline: TimelineBasis,

    /// Seed of the node layout.
    pub layout_seed: u64,

    /// Edge width at which edges saturate to the highlight colour.
    pub edge_width_cap: f64,

    /// Port of the HTTP viewer.
    pub viewer_port: u16,

    /// Start the HTTP viewer once the pipeline has run.
    pub serve_viewer: bool,

    /// Write every frame as SVG into this directory.
    pub export_dir: Option<PathBuf>,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `SNAPSHOT_DIR` – snapshot directory (default: `data`, relative to the
///   working directory)
/// - `SNAPSHOT_GLOB` – file pattern (default: `client-info-*.json`)
/// - `BUILDINGS` – comma-separated building codes (default: the campus list)
/// - `MATCH_FALLBACK_BUILDINGS` – default: false
/// - `DEDUP_SNAPSHOT_ROWS` – default: false
/// - `FRAME_TIMELINE` – `endpoints` or `destination` (default: endpoints)
/// - `LAYOUT_SEED` – default: 42
/// - `EDGE_WIDTH_CAP` – default: 13
/// - `VIEWER_PORT` – default: 8080
/// - `SERVE_VIEWER` – default: true
/// - `EXPORT_DIR` – unset by default
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    load_from(|name| env::var(name).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_from<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let snapshot_dir = PathBuf::from(lookup("SNAPSHOT_DIR").unwrap_or_else(|| "data".into()));
    let snapshot_glob = lookup("SNAPSHOT_GLOB").unwrap_or_else(|| "client-info-*.json".into());

    let buildings = match lookup("BUILDINGS") {
        Some(list) => parse_buildings(&list)?,
        None => DEFAULT_BUILDINGS.iter().map(|c| c.to_string()).collect(),
    };

    let frame_timeline = match lookup("FRAME_TIMELINE").as_deref().map(str::trim) {
        None | Some("endpoints") => TimelineBasis::MovementEndpoints,
        Some("destination") => TimelineBasis::DestinationOnly,
        Some(other) => bail!(
            "Invalid FRAME_TIMELINE: expected endpoints or destination, got '{}'",
            other
        ),
    };

    let match_fallback_buildings = parse_env_bool!(lookup, "MATCH_FALLBACK_BUILDINGS", false);
    let dedup_snapshot_rows = parse_env_bool!(lookup, "DEDUP_SNAPSHOT_ROWS", false);
    let layout_seed = parse_env!(lookup, "LAYOUT_SEED", u64, 42);
    let edge_width_cap = parse_env!(lookup, "EDGE_WIDTH_CAP", f64, 13.0);
    let viewer_port = parse_env!(lookup, "VIEWER_PORT", u16, 8080);
    let serve_viewer = parse_env_bool!(lookup, "SERVE_VIEWER", true);
    let export_dir = lookup("EXPORT_DIR")
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);

    if edge_width_cap.is_nan() || edge_width_cap < 1.0 {
        bail!("Invalid EDGE_WIDTH_CAP: must be at least 1, got {}", edge_width_cap);
    }

    Ok(Config {
        snapshot_dir,
        snapshot_glob,
        buildings,
        match_fallback_buildings,
        dedup_snapshot_rows,
        frame_timeline,
        layout_seed,
        edge_width_cap,
        viewer_port,
        serve_viewer,
        export_dir,
    })
}

fn parse_buildings(list: &str) -> Result<Vec<String>> {
    // ---
    let codes: Vec<String> = list
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    if codes.is_empty() {
        bail!("BUILDINGS must name at least one building code");
    }
    Ok(codes)
}

impl Config {
    // ---
    pub fn pipeline_options(&self) -> PipelineOptions {
        // ---
        PipelineOptions {
            allow: AllowList::new(self.buildings.iter().cloned(), self.match_fallback_buildings),
            duplicates: if self.dedup_snapshot_rows {
                DuplicatePolicy::FirstPerSnapshot
            } else {
                DuplicatePolicy::Preserve
            },
            timeline: self.frame_timeline,
        }
    }

    pub fn scene_style(&self) -> SceneStyle {
        SceneStyle {
            edge_width_cap: self.edge_width_cap,
            ..SceneStyle::default()
        }
    }

    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  SNAPSHOT_DIR             : {}", self.snapshot_dir.display());
        tracing::info!("  SNAPSHOT_GLOB            : {}", self.snapshot_glob);
        tracing::info!("  BUILDINGS                : {}", self.buildings.join(","));
        tracing::info!("  MATCH_FALLBACK_BUILDINGS : {}", self.match_fallback_buildings);
        tracing::info!("  DEDUP_SNAPSHOT_ROWS      : {}", self.dedup_snapshot_rows);
        tracing::info!("  FRAME_TIMELINE           : {:?}", self.frame_timeline);
        tracing::info!("  LAYOUT_SEED              : {}", self.layout_seed);
        tracing::info!("  EDGE_WIDTH_CAP           : {}", self.edge_width_cap);
        tracing::info!("  VIEWER_PORT              : {}", self.viewer_port);
        tracing::info!("  SERVE_VIEWER             : {}", self.serve_viewer);
        match &self.export_dir {
            Some(dir) => tracing::info!("  EXPORT_DIR               : {}", dir.display()),
            None => tracing::info!("  EXPORT_DIR               : (disabled)"),
        }
    }
}
