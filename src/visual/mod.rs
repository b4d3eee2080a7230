//! Visual side of the flow graph: node layout, per-frame scenes and SVG.

mod layout;
mod scene;
pub mod svg;

pub use layout::{spring_layout, Layout, Point};
pub use scene::{reds, EdgeGlyph, FrameScene, NodeGlyph, SceneStyle};
