// src/routes/health.rs
//! Health check endpoint for the flow viewer.
//!
//! This module defines the `/health` route used by scripts and CI to verify
//! that the viewer is up and that the pipeline produced something to show.
//! It is a sibling module in the `routes` directory and follows the Explicit
//! Module Boundary Pattern (EMBP):
//! - Internal to this file: endpoint handler(s) and related types
//! - Exports to the gateway (`mod.rs`): a subrouter containing the `/health` route

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::ViewerState;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    frames: usize,
    buildings: usize,
}

/// Handle `GET /health`.
///
/// Reports the size of the precomputed flow table. Never recomputes anything.
async fn health(State(state): State<Arc<ViewerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        frames: state.flows.frame_count(),
        buildings: state.flows.nodes().len(),
    })
}

/// Create a subrouter containing the `/health` route.
pub fn router() -> Router<Arc<ViewerState>> {
    Router::new().route("/health", get(health))
}
