//! Optional on-disk export of every frame as an SVG file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::pipeline::FlowTable;
use crate::visual::{svg, FrameScene, Layout, SceneStyle};

// ---

/// Write `frame-NNNN.svg` for every frame into `dir`, creating it if needed.
///
/// Returns the written paths in frame order.
pub fn write_frames(dir: &Path, flows: &FlowTable, layout: &Layout, style: &SceneStyle) -> Result<Vec<PathBuf>> {
    // ---
    fs::create_dir_all(dir).with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(flows.frame_count());
    for index in 0..flows.frame_count() {
        let Some(scene) = FrameScene::build(flows, layout, index, style) else {
            continue;
        };
        let path = dir.join(format!("frame-{:04}.svg", index));
        fs::write(&path, svg::render(&scene)).with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    info!("Exported {} frames to {}", written.len(), dir.display());
    Ok(written)
}
