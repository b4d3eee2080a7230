//! Per-frame drawing model.
//!
//! Turns one precomputed [`FlowFrame`] into sized nodes and styled edges. The
//! renderers (SVG, JSON) only place what is decided here.

use serde::Serialize;

use crate::pipeline::{FlowFrame, FlowTable};
use crate::visual::layout::{Layout, Point};

// ---

/// Sizing and colour rules shared by every frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneStyle {
    pub base_node_size: f64,
    pub node_size_per_device: f64,
    /// Devices per unit of edge width.
    pub devices_per_width: f64,
    pub min_edge_width: f64,
    /// Width at which an edge stops growing and switches to the highlight colour.
    pub edge_width_cap: f64,
    pub highlight_color: String,
    /// Curvature of each edge of a bidirectional pair.
    pub curve_offset: f64,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            base_node_size: 800.0,
            node_size_per_device: 50.0,
            devices_per_width: 3.5,
            min_edge_width: 1.0,
            edge_width_cap: 13.0,
            highlight_color: "#000000".to_string(),
            curve_offset: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeGlyph {
    pub name: String,
    pub position: Point,
    /// Marker area, in square points.
    pub size: f64,
    pub devices: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeGlyph {
    pub origin: String,
    pub destination: String,
    pub devices: usize,
    pub width: f64,
    pub color: String,
    pub saturated: bool,
    /// Signed curvature, 0 for a straight edge.
    pub curvature: f64,
    /// Label position along the edge, 0 = head, 1 = tail.
    pub label_position: f64,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameScene {
    // ---
    pub index: usize,
    pub frame_count: usize,
    pub title: String,
    pub total: usize,
    pub nodes: Vec<NodeGlyph>,
    pub edges: Vec<EdgeGlyph>,
}

impl FrameScene {
    // ---
    /// Build the scene for frame `index`, or `None` if there is no such frame.
    pub fn build(flows: &FlowTable, layout: &Layout, index: usize, style: &SceneStyle) -> Option<Self> {
        flows
            .frame(index)
            .map(|frame| Self::from_frame(&frame, flows, layout, style))
    }

    pub fn from_frame(frame: &FlowFrame, flows: &FlowTable, layout: &Layout, style: &SceneStyle) -> Self {
        // ---
        let nodes = flows
            .nodes()
            .iter()
            .map(|name| {
                let devices = frame.occupancy.get(name).copied().unwrap_or(0);
                NodeGlyph {
                    name: name.clone(),
                    position: layout.position(name).unwrap_or(Point { x: 0.0, y: 0.0 }),
                    size: style.base_node_size + devices as f64 * style.node_size_per_device,
                    devices,
                    label: format!("{}\n{}", name, devices),
                }
            })
            .collect();

        let max_devices = frame.edges.iter().map(|e| e.devices).max().unwrap_or(1).max(1);

        let edges = frame
            .edges
            .iter()
            .map(|edge| {
                let reversed = frame
                    .edges
                    .iter()
                    .any(|e| e.origin == edge.destination && e.destination == edge.origin);

                let mut width = (edge.devices as f64 / style.devices_per_width).max(style.min_edge_width);
                let mut color = reds(edge.devices as f64 / max_devices as f64);
                let saturated = width >= style.edge_width_cap;
                if saturated {
                    width = style.edge_width_cap;
                    color = style.highlight_color.clone();
                }

                EdgeGlyph {
                    origin: edge.origin.clone(),
                    destination: edge.destination.clone(),
                    devices: edge.devices,
                    width,
                    color,
                    saturated,
                    curvature: if reversed { style.curve_offset } else { 0.0 },
                    label_position: if reversed { 0.6 } else { 0.5 },
                }
            })
            .collect();

        let title = format!(
            "Movements between buildings ({} → {}) | Total: {} people",
            frame.timeframe.start, frame.timeframe.end, frame.total
        );

        Self {
            index: frame.index,
            frame_count: flows.frame_count(),
            title,
            total: frame.total,
            nodes,
            edges,
        }
    }
}

/// Sequential white → dark red colormap, `value` in `[0, 1]`.
pub fn reds(value: f64) -> String {
    // ---
    const STOPS: [(u8, u8, u8); 9] = [
        (0xff, 0xf5, 0xf0),
        (0xfe, 0xe0, 0xd2),
        (0xfc, 0xbb, 0xa1),
        (0xfc, 0x92, 0x72),
        (0xfb, 0x6a, 0x4a),
        (0xef, 0x3b, 0x2c),
        (0xcb, 0x18, 0x1d),
        (0xa5, 0x0f, 0x15),
        (0x67, 0x00, 0x0d),
    ];

    let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    let scaled = value * (STOPS.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(STOPS.len() - 2);
    let frac = scaled - lower as f64;

    let (r0, g0, b0) = STOPS[lower];
    let (r1, g1, b1) = STOPS[lower + 1];
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    format!("#{:02x}{:02x}{:02x}", mix(r0, r1), mix(g0, g1), mix(b0, b1))
}
