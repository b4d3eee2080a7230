//! SVG rendering of a [`FrameScene`].

use crate::visual::layout::Point;
use crate::visual::scene::{EdgeGlyph, FrameScene, NodeGlyph};

// ---

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 800.0;
const MARGIN: f64 = 110.0;
const TITLE_BAND: f64 = 50.0;
/// Pixels per typographic point at 100 dpi.
const PX_PER_PT: f64 = 100.0 / 72.0;

/// Escape text for SVG/HTML content and attributes.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn to_canvas(p: Point) -> (f64, f64) {
    let x = MARGIN + (p.x + 1.0) / 2.0 * (WIDTH - 2.0 * MARGIN);
    // SVG y grows downwards
    let y = TITLE_BAND + MARGIN + (1.0 - p.y) / 2.0 * (HEIGHT - TITLE_BAND - 2.0 * MARGIN);
    (x, y)
}

fn node_radius(node: &NodeGlyph) -> f64 {
    node.size.sqrt() / 2.0 * PX_PER_PT
}

/// Render a scene as a standalone SVG document.
pub fn render(scene: &FrameScene) -> String {
    // ---
    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = WIDTH,
        h = HEIGHT
    ));
    svg.push('\n');
    svg.push_str(r#"  <rect width="100%" height="100%" fill="white"/>"#);
    svg.push('\n');
    svg.push_str(&format!(
        r#"  <text x="{}" y="32" font-size="18" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        escape(&scene.title)
    ));
    svg.push('\n');

    for node in &scene.nodes {
        let (x, y) = to_canvas(node.position);
        svg.push_str(&format!(
            r##"  <circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="#87ceeb"/>"##,
            x,
            y,
            node_radius(node)
        ));
        svg.push('\n');
    }

    for edge in &scene.edges {
        if let Some(markup) = render_edge(scene, edge) {
            svg.push_str(&markup);
        }
    }

    for node in &scene.nodes {
        let (x, y) = to_canvas(node.position);
        svg.push_str(&format!(
            r#"  <text x="{:.1}" y="{:.1}" font-size="13" text-anchor="middle">"#,
            x,
            y - 3.0
        ));
        for (i, line) in node.label.lines().enumerate() {
            let dy = if i == 0 { 0.0 } else { 15.0 };
            svg.push_str(&format!(
                r#"<tspan x="{:.1}" dy="{}">{}</tspan>"#,
                x,
                dy,
                escape(line)
            ));
        }
        svg.push_str("</text>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

fn render_edge(scene: &FrameScene, edge: &EdgeGlyph) -> Option<String> {
    // ---
    let from = scene.nodes.iter().find(|n| n.name == edge.origin)?;
    let to = scene.nodes.iter().find(|n| n.name == edge.destination)?;

    let (x1, y1) = to_canvas(from.position);
    let (x2, y2) = to_canvas(to.position);
    let (dx, dy) = (x2 - x1, y2 - y1);

    // Control point of the quadratic curve, offset perpendicular to the chord
    let cx = (x1 + x2) / 2.0 + edge.curvature * dy;
    let cy = (y1 + y2) / 2.0 - edge.curvature * dx;

    // Trim both ends to the node boundaries
    let (sx, sy) = step_towards((x1, y1), (cx, cy), node_radius(from));
    let (ex, ey) = step_towards((x2, y2), (cx, cy), node_radius(to));

    let head = 10.0 + edge.width * 1.5;
    let (ux, uy) = unit(ex - cx, ey - cy)?;
    let (bx, by) = (ex - ux * head, ey - uy * head);
    let half = head * 0.45;

    let mut out = String::new();
    out.push_str(&format!(
        r#"  <path d="M {:.1} {:.1} Q {:.1} {:.1} {:.1} {:.1}" fill="none" stroke="{}" stroke-width="{:.2}"/>"#,
        sx,
        sy,
        cx,
        cy,
        bx,
        by,
        escape(&edge.color),
        edge.width * PX_PER_PT
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"  <polygon points="{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}" fill="{}"/>"#,
        ex,
        ey,
        bx - uy * half,
        by + ux * half,
        bx + uy * half,
        by - ux * half,
        escape(&edge.color)
    ));
    out.push('\n');

    // label_position counts from the head
    let t = 1.0 - edge.label_position;
    let lx = (1.0 - t).powi(2) * x1 + 2.0 * (1.0 - t) * t * cx + t * t * x2;
    let ly = (1.0 - t).powi(2) * y1 + 2.0 * (1.0 - t) * t * cy + t * t * y2;
    out.push_str(&format!(
        r#"  <text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle" paint-order="stroke" stroke="white" stroke-width="3">{}</text>"#,
        lx, ly, edge.devices
    ));
    out.push('\n');
    Some(out)
}

fn unit(dx: f64, dy: f64) -> Option<(f64, f64)> {
    let length = (dx * dx + dy * dy).sqrt();
    (length > f64::EPSILON).then(|| (dx / length, dy / length))
}

fn step_towards(from: (f64, f64), towards: (f64, f64), distance: f64) -> (f64, f64) {
    match unit(towards.0 - from.0, towards.1 - from.1) {
        Some((ux, uy)) => (from.0 + ux * distance, from.1 + uy * distance),
        None => from,
    }
}
