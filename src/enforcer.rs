//! Exact-value and positioning enforcement.
//!
//! Rewrites inline styles so the markup reproduces the design geometry:
//! the root anchors at its own origin with the design's size, matched
//! descendants are absolutely positioned at their exact design offsets, and
//! members of a top or left alignment group share one literal value.
//! Unmatched wrapper elements are stretched over the box they sit in and
//! other extra layout elements are taken out of flow. Elements inside a
//! node whose children are all text are content and keep their flow.

use tracing::debug;

use crate::config::AlignmentConfig;
use crate::layout::LayoutAnalyzer;
use crate::markup::{
    apply_edits, match_elements, require_root, set_style, Element, StageError, Style,
};
use crate::types::{AlignmentEdge, DesignNode, SubtreeLayout};

/// Offsets and transforms the root may not carry.
const ROOT_FORBIDDEN: &[&str] = &["left", "top", "right", "bottom", "inset", "transform"];

#[derive(Debug, Clone, Default)]
pub struct Enforcer {
    analyzer: LayoutAnalyzer,
}

impl Enforcer {
    pub fn new(config: AlignmentConfig) -> Self {
        Self {
            analyzer: LayoutAnalyzer::new(config),
        }
    }

    pub fn enforce(&self, markup: &str, node: &DesignNode) -> Result<String, StageError> {
        let layout = self.analyzer.analyze_subtree(node);
        self.enforce_with_layout(markup, node, &layout)
    }

    /// Enforce using alignment groups computed earlier for `node`.
    ///
    /// Fails when a non-text design node has no element to carry its
    /// geometry.
    pub fn enforce_with_layout(
        &self,
        markup: &str,
        node: &DesignNode,
        layout: &SubtreeLayout,
    ) -> Result<String, StageError> {
        let (elements, root_index) = require_root(markup)?;
        let matches = match_elements(&elements, node);
        if !matches.missing().is_empty() {
            let ids: Vec<&str> = matches.missing().iter().map(|n| n.id.as_str()).collect();
            return Err(StageError::PatternMismatch(format!(
                "no element for design node(s) {}",
                ids.join(", ")
            )));
        }
        let mut edits = Vec::new();

        for element in &elements {
            let index = element.index;
            let matched = matches.node_for(index);
            let anchor = matches.anchor(index);
            if index != root_index && (anchor.is_none() || matches.is_content(index)) {
                continue;
            }
            let Some(mut style) = editable_style(markup, element) else {
                debug!(
                    element = index,
                    tag = %element.tag,
                    "style is not an inline object; left untouched"
                );
                continue;
            };

            match (matched, anchor) {
                (Some(matched), _) if index == root_index => anchor_root(&mut style, matched),
                (Some(matched), Some(anchor)) => {
                    let parent = matches.design_parent(&matched.id).unwrap_or(anchor);
                    position_child(&mut style, matched, parent, anchor, layout);
                }
                (None, Some(anchor)) if matches.is_wrapper(index) => cover(&mut style, anchor),
                (None, Some(_)) => style.set_str("position", "absolute"),
                _ => continue,
            }
            edits.push(set_style(markup, element, &style));
        }

        debug!(
            node = %node.id,
            elements = elements.len(),
            matched = matches.len(),
            "enforced geometry"
        );
        apply_edits(markup, edits)
    }
}

/// Current inline style; absent styles start empty, non-literal ones are
/// not editable.
fn editable_style(src: &str, element: &Element) -> Option<Style> {
    match element.attribute("style") {
        None => Some(Style::default()),
        Some(_) => element.style(src),
    }
}

fn anchor_root(style: &mut Style, node: &DesignNode) {
    for key in ROOT_FORBIDDEN {
        style.remove(key);
    }
    if matches!(style.get("position"), Some("absolute" | "fixed")) {
        style.remove("position");
    }
    if !style.contains("position") {
        style.set_str("position", "relative");
    }
    style.set_px("width", node.bounding_box.width);
    style.set_px("height", node.bounding_box.height);
}

/// Position a matched element inside the box of `anchor`, the node of its
/// nearest matched ancestor element. Group snapping uses the groups of the
/// design `parent`.
fn position_child(
    style: &mut Style,
    node: &DesignNode,
    parent: &DesignNode,
    anchor: &DesignNode,
    layout: &SubtreeLayout,
) {
    let groups = layout.for_parent(&parent.id).map(|a| &a.alignment_groups);
    let anchored = |edge: AlignmentEdge, own: f64| {
        groups
            .and_then(|g| g.group_for(edge, &node.id))
            .map_or(own, |g| g.value)
    };
    let bb = node.bounding_box;
    let left = anchored(AlignmentEdge::Left, bb.x) - anchor.bounding_box.x;
    let top = anchored(AlignmentEdge::Top, bb.y) - anchor.bounding_box.y;
    let z_index = parent
        .children
        .iter()
        .position(|c| c.id == node.id)
        .map_or(1, |i| i + 1);

    style.set_str("position", "absolute");
    style.set_px("left", left);
    style.set_px("top", top);
    style.set_px("width", bb.width);
    style.set_px("height", bb.height);
    style.set_raw("zIndex", z_index.to_string());
}

/// An unmatched wrapper spans its anchor's box, so offsets measured from
/// the anchor stay valid for the elements inside it.
fn cover(style: &mut Style, anchor: &DesignNode) {
    style.remove("transform");
    style.set_str("position", "absolute");
    style.set_px("left", 0.0);
    style.set_px("top", 0.0);
    style.set_px("width", anchor.bounding_box.width);
    style.set_px("height", anchor.bounding_box.height);
}
