//! Mapping Figma API nodes to raw design nodes.

use tracing::debug;

use crate::types::{
    BoundingBox, Color, Effect, EffectKind, Fill, NodeKind, Offset, RawNode, Stroke, TextStyle,
};

use super::api_types::{FigmaColor, FigmaEffectData, FigmaNodeData, FigmaPaintData, FigmaTypeStyle};

/// Convert a Figma node and its visible descendants.
pub fn to_raw_node(node: &FigmaNodeData) -> RawNode {
    let children = node
        .children
        .iter()
        .filter(|child| {
            if !child.visible {
                debug!(node = %child.id, "skipping hidden Figma node");
            }
            child.visible
        })
        .map(to_raw_node)
        .collect();

    let weight = node.stroke_weight.unwrap_or(1.0);

    RawNode {
        id: node.id.clone(),
        name: node.name.clone(),
        kind: map_kind(&node.node_type),
        bounding_box: node
            .absolute_bounding_box
            .map(|b| BoundingBox::new(b.x, b.y, b.width, b.height)),
        fills: node.fills.iter().filter_map(map_fill).collect(),
        strokes: node
            .strokes
            .iter()
            .filter_map(|paint| solid_color(paint).map(|color| Stroke { color, weight }))
            .collect(),
        corner_radius: node.corner_radius,
        corner_radii: node.rectangle_corner_radii,
        effects: node.effects.iter().filter_map(map_effect).collect(),
        characters: node.characters.clone(),
        text_style: node.style.as_ref().map(map_text_style),
        children,
    }
}

pub fn map_kind(node_type: &str) -> NodeKind {
    match node_type {
        "RECTANGLE" => NodeKind::Rectangle,
        "ELLIPSE" => NodeKind::Ellipse,
        "TEXT" => NodeKind::Text,
        "FRAME" | "SECTION" => NodeKind::Frame,
        "GROUP" => NodeKind::Group,
        "COMPONENT" | "COMPONENT_SET" => NodeKind::Component,
        "INSTANCE" => NodeKind::Instance,
        "CANVAS" => NodeKind::Canvas,
        _ => NodeKind::Other,
    }
}

/// Solid and image paints; gradients have no single colour and are dropped.
pub fn map_fill(paint: &FigmaPaintData) -> Option<Fill> {
    if !paint.visible {
        return None;
    }
    match paint.paint_type.as_str() {
        "SOLID" => solid_color(paint).map(Fill::solid),
        "IMAGE" => Some(Fill::image(paint.image_ref.clone().unwrap_or_default())),
        _ => None,
    }
}

fn solid_color(paint: &FigmaPaintData) -> Option<Color> {
    if !paint.visible || paint.paint_type != "SOLID" {
        return None;
    }
    let mut color = map_color(paint.color.as_ref()?);
    color.a *= paint.opacity.unwrap_or(1.0);
    Some(color)
}

pub fn map_color(color: &FigmaColor) -> Color {
    Color {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

fn map_effect(effect: &FigmaEffectData) -> Option<Effect> {
    if !effect.visible {
        return None;
    }
    let kind = match effect.effect_type.as_str() {
        "DROP_SHADOW" => EffectKind::DropShadow,
        "INNER_SHADOW" => EffectKind::InnerShadow,
        "LAYER_BLUR" | "BACKGROUND_BLUR" => EffectKind::Blur,
        _ => return None,
    };
    Some(Effect {
        kind,
        radius: effect.radius,
        color: effect.color.as_ref().map(map_color),
        offset: effect.offset.map(|o| Offset { x: o.x, y: o.y }),
    })
}

pub fn map_text_style(style: &FigmaTypeStyle) -> TextStyle {
    TextStyle {
        font_family: style.font_family.clone(),
        font_size: style.font_size,
        font_weight: style.font_weight,
        line_height: style.line_height_px,
        letter_spacing: style.letter_spacing,
    }
}
