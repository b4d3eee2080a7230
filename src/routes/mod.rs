//! HTTP viewer for the precomputed flow frames (EMBP gateway).
//!
//! `main.rs` only sees [`router`] and [`ViewerState`]; the individual
//! endpoints live in sibling modules.

use std::sync::Arc;

use axum::Router;

use crate::pipeline::FlowTable;
use crate::visual::{Layout, SceneStyle};

mod frames;
mod health;

// ---

/// Immutable data shared by every request.
#[derive(Debug, Clone)]
pub struct ViewerState {
    pub flows: FlowTable,
    pub layout: Layout,
    pub style: SceneStyle,
}

pub fn router(state: ViewerState) -> Router {
    // ---
    Router::new()
        .merge(frames::router())
        .merge(health::router())
        .with_state(Arc::new(state))
}
