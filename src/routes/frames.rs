use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

use super::ViewerState;
use crate::models::SnapshotTime;
use crate::pipeline::Timeframe;
use crate::visual::{svg, FrameScene, Layout};

// ---

pub fn router() -> Router<Arc<ViewerState>> {
    // ---
    Router::new()
        .route("/", get(index_page))
        .route("/frames", get(summary))
        .route("/frames/{index}", get(frame_json))
        .route("/frames/{index}/svg", get(frame_svg))
}

/// Response body of `GET /frames`.
#[derive(Debug, Serialize)]
struct FramesSummary<'a> {
    frame_count: usize,
    nodes: &'a [String],
    layout: &'a Layout,
    timeframes: &'a [Timeframe<SnapshotTime>],
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn not_found(index: usize, frame_count: usize) -> Response {
    // ---
    let body = ErrorBody {
        error: format!("frame {} out of range (0..{})", index, frame_count),
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

fn build_scene(state: &ViewerState, index: usize) -> Option<FrameScene> {
    FrameScene::build(&state.flows, &state.layout, index, &state.style)
}

async fn summary(State(state): State<Arc<ViewerState>>) -> Response {
    // ---
    let body = FramesSummary {
        frame_count: state.flows.frame_count(),
        nodes: state.flows.nodes(),
        layout: &state.layout,
        timeframes: state.flows.timeframes(),
    };
    Json(body).into_response()
}

async fn frame_json(State(state): State<Arc<ViewerState>>, Path(index): Path<usize>) -> Response {
    // ---
    debug!("GET /frames/{}", index);
    match build_scene(&state, index) {
        Some(scene) => Json(scene).into_response(),
        None => not_found(index, state.flows.frame_count()),
    }
}

async fn frame_svg(State(state): State<Arc<ViewerState>>, Path(index): Path<usize>) -> Response {
    // ---
    debug!("GET /frames/{}/svg", index);
    match build_scene(&state, index) {
        Some(scene) => ([(header::CONTENT_TYPE, "image/svg+xml")], svg::render(&scene)).into_response(),
        None => not_found(index, state.flows.frame_count()),
    }
}

async fn index_page(State(state): State<Arc<ViewerState>>) -> Html<String> {
    Html(page(state.flows.frame_count()))
}

/// Viewer page: a frame slider that swaps the rendered SVG.
fn page(frame_count: usize) -> String {
    // ---
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <title>Campus WiFi flows</title>\n");
    html.push_str("    <style>body { font-family: sans-serif; margin: 20px; } ");
    html.push_str("#slider { width: 70%; } img { max-width: 100%; border: 1px solid #ddd; }</style>\n");
    html.push_str("</head>\n<body>\n");

    if frame_count == 0 {
        html.push_str("    <p>No frames: no inter-building movements were found.</p>\n");
    } else {
        html.push_str("    <div><img id=\"frame\" src=\"/frames/0/svg\" alt=\"flow graph\"></div>\n");
        html.push_str(&format!(
            "    <div>Frame <input id=\"slider\" type=\"range\" min=\"0\" max=\"{}\" step=\"1\" value=\"0\"> <span id=\"index\">0</span> / {}</div>\n",
            frame_count - 1,
            frame_count - 1
        ));
        html.push_str("    <script>\n");
        html.push_str("      const slider = document.getElementById('slider');\n");
        html.push_str("      slider.addEventListener('input', () => {\n");
        html.push_str("        document.getElementById('frame').src = '/frames/' + slider.value + '/svg';\n");
        html.push_str("        document.getElementById('index').textContent = slider.value;\n");
        html.push_str("      });\n");
        html.push_str("    </script>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_page_slider_range() {
        // ---
        let html = page(5);
        assert!(html.contains("min=\"0\" max=\"4\""));
        assert!(html.contains("/frames/0/svg"));
    }

    #[test]
    fn test_page_without_frames() {
        // ---
        let html = page(0);
        assert!(html.contains("No frames"));
        assert!(!html.contains("<input"));
    }
}
