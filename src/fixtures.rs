//! Design trees shared by unit tests.

use crate::tree::DesignTree;
use crate::types::{BoundingBox, Color, DesignNode, Effect, EffectKind, Fill, NodeKind, Offset};

pub fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> DesignNode {
    DesignNode::new(id, id, NodeKind::Rectangle, BoundingBox::new(x, y, w, h))
}

pub fn text(id: &str, content: &str, x: f64, y: f64, w: f64, h: f64) -> DesignNode {
    DesignNode::new(id, id, NodeKind::Text, BoundingBox::new(x, y, w, h)).with_characters(content)
}

pub fn frame(id: &str, name: &str, x: f64, y: f64, w: f64, h: f64) -> DesignNode {
    DesignNode::new(id, name, NodeKind::Frame, BoundingBox::new(x, y, w, h))
}

/// 120x40 blue button with a white "Submit" label.
pub fn button(id: &str, name: &str) -> DesignNode {
    frame(id, name, 0.0, 0.0, 120.0, 40.0)
        .with_corner_radius(8.0)
        .with_fill(Fill::solid(Color::rgb(37, 99, 235)))
        .with_child(
            text(&format!("{id}-label"), "Submit", 36.0, 10.0, 48.0, 20.0)
                .with_fill(Fill::solid(Color::rgb(255, 255, 255))),
        )
}

/// 400x60 frame with three 100x40 rectangles at x = 20, 140, 260 (y = 10).
pub fn toolbar_row() -> DesignNode {
    frame("frame", "Toolbar", 0.0, 0.0, 400.0, 60.0)
        .with_child(rect("r1", 20.0, 10.0, 100.0, 40.0))
        .with_child(rect("r2", 140.0, 10.0, 100.0, 40.0))
        .with_child(rect("r3", 260.0, 10.0, 100.0, 40.0))
}

/// Four 80x80 rectangles in a 2x2 grid.
pub fn grid_2x2() -> DesignNode {
    frame("grid", "Gallery", 0.0, 0.0, 200.0, 200.0)
        .with_child(rect("g1", 10.0, 10.0, 80.0, 80.0))
        .with_child(rect("g2", 110.0, 10.0, 80.0, 80.0))
        .with_child(rect("g3", 10.0, 110.0, 80.0, 80.0))
        .with_child(rect("g4", 110.0, 110.0, 80.0, 80.0))
}

/// White card with a shadow, heading text and a body rectangle.
pub fn card() -> DesignNode {
    frame("card", "Product Card", 40.0, 40.0, 320.0, 200.0)
        .with_corner_radius(12.0)
        .with_fill(Fill::solid(Color::rgb(255, 255, 255)))
        .with_effect(Effect {
            kind: EffectKind::DropShadow,
            radius: 8.0,
            color: Some(Color::rgb(0, 0, 0)),
            offset: Some(Offset { x: 0.0, y: 2.0 }),
        })
        .with_child(text("card-title", "Pro plan", 56.0, 56.0, 200.0, 24.0))
        .with_child(rect("card-body", 56.0, 96.0, 288.0, 120.0))
}

pub fn tree(root: DesignNode) -> DesignTree {
    DesignTree::new(root).expect("fixture tree should be valid")
}
