//! Application entry point for `campus-wififlow`.
//!
//! This binary runs the whole batch analysis once and then shows it:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Loading every snapshot file and sorting the observations by time
//! - Running the movement → building → flow pipeline
//! - Computing the node layout once for all frames
//! - Optionally exporting every frame as SVG
//! - Binding the Axum viewer and serving the frames
//!
//! # Environment Variables
//! - `SNAPSHOT_DIR`, `SNAPSHOT_GLOB`, `BUILDINGS`, ... – see [`config`]
//! - `FLOW_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `FLOW_SPAN_EVENTS` (optional) – span event mode for tracing
//!
//! This module follows the Explicit Module Boundary Pattern (EMBP) by
//! delegating configuration parsing to `config`, the analysis to `pipeline`
//! and route registration to `routes`.
use std::{env, net::SocketAddr};

use anyhow::{Context, Result};
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use campus_wififlow::routes::{self, ViewerState};
use campus_wififlow::visual::spring_layout;
use campus_wififlow::{config, export, loader, pipeline};

// ---

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let report = loader::load_snapshots(&cfg.snapshot_dir, &cfg.snapshot_glob)
        .with_context(|| format!("Failed to load snapshots from {}", cfg.snapshot_dir.display()))?;
    let mut table = report.table;
    table.sort_by_timestamp();

    let output = pipeline::run(&table, &cfg.pipeline_options());
    let flows = output.flows;
    let layout = spring_layout(flows.nodes(), cfg.layout_seed);
    let style = cfg.scene_style();

    if let Some(dir) = &cfg.export_dir {
        export::write_frames(dir, &flows, &layout, &style)?;
    }

    if !cfg.serve_viewer {
        tracing::info!("Viewer disabled, done");
        return Ok(());
    }

    let app = routes::router(ViewerState { flows, layout, style });

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.viewer_port));
    tracing::info!("Viewer listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---

/// Initialize the global tracing subscriber for structured logging.
///
/// This function configures the [`tracing_subscriber`] with:
/// - Log target, file, and line number output enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY
/// - Span event emission mode controlled by the `FLOW_SPAN_EVENTS` env var:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Log level controlled by `RUST_LOG`, falling back to `FLOW_LOG_LEVEL`
///
/// This should be called once at startup before any logging macros are
/// invoked. It installs the subscriber globally for the lifetime of the process.
fn init_tracing() {
    // ---
    let span_events = match env::var("FLOW_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    // Determine if we should use colors
    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    // Use RUST_LOG if available, otherwise fall back to FLOW_LOG_LEVEL
    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("FLOW_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "debug",
        };
        EnvFilter::new(format!("{level},hyper=warn,tower=warn"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
