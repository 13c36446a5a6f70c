//! Design node model.
//!
//! Two shapes of the same tree live here:
//! - [`RawNode`] - the tree as delivered by the design source, every field optional
//! - [`DesignNode`] - the resolved tree, where every node carries a [`BoundingBox`]
//!
//! Conversion from raw to resolved happens exactly once, in [`crate::tree::resolve`].

use serde::{Deserialize, Serialize};

/// Absolute pixel rectangle of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Tight union of two rectangles.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(x, y, right - x, bottom - y)
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// RGBA color with channels in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    /// Parse `#rgb` or `#rrggbb`.
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        let to_byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b)
        )
    }

    /// Perceived brightness in 0.0-1.0 (Rec. 601 weights).
    pub fn brightness(&self) -> f64 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }
}

/// Kind of design node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Rectangle,
    Ellipse,
    Text,
    Frame,
    Group,
    Component,
    Instance,
    Canvas,
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// Node kinds that act as layout containers for their children.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Frame
                | NodeKind::Group
                | NodeKind::Component
                | NodeKind::Instance
                | NodeKind::Canvas
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FillKind {
    Solid,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    pub kind: FillKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl Fill {
    pub fn solid(color: Color) -> Self {
        Self {
            kind: FillKind::Solid,
            color: Some(color),
            image_ref: None,
        }
    }

    pub fn image(image_ref: impl Into<String>) -> Self {
        Self {
            kind: FillKind::Image,
            color: None,
            image_ref: Some(image_ref.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub color: Color,
    #[serde(default = "default_stroke_weight")]
    pub weight: f64,
}

fn default_stroke_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    DropShadow,
    InnerShadow,
    #[serde(alias = "LAYER_BLUR", alias = "BACKGROUND_BLUR")]
    Blur,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub kind: EffectKind,
    #[serde(default)]
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Offset>,
}

/// Typography properties of a text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<f64>,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
}

/// A design node as delivered by the design source.
///
/// Geometry may be absent on grouping nodes; resolution fills it in from the
/// children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: NodeKind,
    #[serde(default, alias = "absoluteBoundingBox")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default)]
    pub fills: Vec<Fill>,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
    #[serde(default)]
    pub corner_radius: Option<f64>,
    /// Per-corner override: top-left, top-right, bottom-right, bottom-left.
    #[serde(default)]
    pub corner_radii: Option<[f64; 4]>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub characters: Option<String>,
    #[serde(default)]
    pub text_style: Option<TextStyle>,
    #[serde(default)]
    pub children: Vec<RawNode>,
}

/// A resolved design node. Every node has geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub bounding_box: BoundingBox,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Fill>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<Stroke>,
    #[serde(default)]
    pub corner_radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radii: Option<[f64; 4]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DesignNode>,
}

impl DesignNode {
    /// Convenience constructor used by builders and tests.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: NodeKind,
        bb: BoundingBox,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            bounding_box: bb,
            fills: Vec::new(),
            strokes: Vec::new(),
            corner_radius: 0.0,
            corner_radii: None,
            effects: Vec::new(),
            characters: None,
            text_style: None,
            children: Vec::new(),
        }
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fills.push(fill);
        self
    }

    pub fn with_stroke(mut self, color: Color, weight: f64) -> Self {
        self.strokes.push(Stroke { color, weight });
        self
    }

    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_characters(mut self, text: impl Into<String>) -> Self {
        self.characters = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: DesignNode) -> Self {
        self.children.push(child);
        self
    }

    /// First visible solid fill color, if any.
    pub fn solid_fill(&self) -> Option<Color> {
        self.fills
            .iter()
            .find(|f| f.kind == FillKind::Solid)
            .and_then(|f| f.color)
    }

    pub fn has_image_fill(&self) -> bool {
        self.fills.iter().any(|f| f.kind == FillKind::Image)
    }

    /// Largest corner radius, taking per-corner overrides into account.
    pub fn max_corner_radius(&self) -> f64 {
        self.corner_radii
            .map(|radii| radii.iter().copied().fold(self.corner_radius, f64::max))
            .unwrap_or(self.corner_radius)
    }

    pub fn name_lower(&self) -> String {
        self.name.to_lowercase()
    }

    /// Depth-first, pre-order iteration over the subtree (self included).
    pub fn descendants(&self) -> Vec<&DesignNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            for child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Text of the first non-empty text node in the subtree.
    pub fn first_text(&self) -> Option<&str> {
        self.descendants().into_iter().find_map(|n| {
            if n.kind == NodeKind::Text {
                n.characters
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
            } else {
                None
            }
        })
    }

    pub fn find(&self, id: &str) -> Option<&DesignNode> {
        self.descendants().into_iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_is_tight() {
        let a = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        let b = BoundingBox::new(5.0, 50.0, 10.0, 30.0);
        assert_eq!(a.union(&b), BoundingBox::new(5.0, 20.0, 35.0, 60.0));
    }

    #[test]
    fn hex_round_trips_and_accepts_short_form() {
        assert_eq!(Color::from_hex("#FFF").map(|c| c.to_hex()), Some("#ffffff".into()));
        assert_eq!(Color::rgb(59, 130, 246).to_hex(), "#3b82f6");
        assert!(Color::from_hex("#12").is_none());
    }

    #[test]
    fn non_hex_digits_are_rejected_without_slicing() {
        assert!(Color::from_hex("aébcd").is_none());
        assert!(Color::from_hex("#éa").is_none());
        assert!(Color::from_hex("#12345g").is_none());
        assert!(Color::from_hex("+1+2+3").is_none());
    }

    #[test]
    fn raw_node_accepts_design_tool_field_names() {
        let json = r#"{
            "id": "1:2",
            "name": "Card",
            "type": "FRAME",
            "absoluteBoundingBox": {"x": 0, "y": 0, "width": 320, "height": 200},
            "fills": [{"kind": "SOLID", "color": {"r": 1, "g": 1, "b": 1}}],
            "children": [{"id": "1:3", "type": "VECTOR"}]
        }"#;
        let node: RawNode = serde_json::from_str(json).expect("parse raw node");
        assert_eq!(node.kind, NodeKind::Frame);
        assert_eq!(node.bounding_box.map(|b| b.width), Some(320.0));
        assert_eq!(node.fills[0].color.map(|c| c.a), Some(1.0));
        assert_eq!(node.children[0].kind, NodeKind::Other);
    }

    #[test]
    fn first_text_searches_depth_first() {
        let label = DesignNode::new(
            "2",
            "Label",
            NodeKind::Text,
            BoundingBox::new(10.0, 10.0, 80.0, 20.0),
        )
        .with_characters("  Save  ");
        let node = DesignNode::new(
            "1",
            "Button",
            NodeKind::Frame,
            BoundingBox::new(0.0, 0.0, 100.0, 40.0),
        )
        .with_child(label);
        assert_eq!(node.first_text(), Some("Save"));
    }
}
