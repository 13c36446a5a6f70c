//! Geometry analysis result types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Coordinate an alignment group shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentEdge {
    Top,
    Left,
    Right,
    Bottom,
    /// Horizontal center (x + width / 2).
    CenterX,
    /// Vertical center (y + height / 2).
    CenterY,
}

impl AlignmentEdge {
    pub const fn all() -> [AlignmentEdge; 6] {
        [
            AlignmentEdge::Top,
            AlignmentEdge::Left,
            AlignmentEdge::Right,
            AlignmentEdge::Bottom,
            AlignmentEdge::CenterX,
            AlignmentEdge::CenterY,
        ]
    }

    pub fn is_center(&self) -> bool {
        matches!(self, AlignmentEdge::CenterX | AlignmentEdge::CenterY)
    }
}

impl fmt::Display for AlignmentEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlignmentEdge::Top => "top",
            AlignmentEdge::Left => "left",
            AlignmentEdge::Right => "right",
            AlignmentEdge::Bottom => "bottom",
            AlignmentEdge::CenterX => "center-x",
            AlignmentEdge::CenterY => "center-y",
        };
        write!(f, "{name}")
    }
}

/// Siblings sharing one coordinate within tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentGroup {
    pub edge: AlignmentEdge,
    /// Absolute design coordinate of the group's anchor.
    pub value: f64,
    /// Member ids in document order.
    pub node_ids: Vec<String>,
}

impl AlignmentGroup {
    pub fn contains(&self, id: &str) -> bool {
        self.node_ids.iter().any(|n| n == id)
    }

    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }
}

/// All alignment groups found among one sibling set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentGroups {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_aligned: Vec<AlignmentGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub left_aligned: Vec<AlignmentGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub right_aligned: Vec<AlignmentGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bottom_aligned: Vec<AlignmentGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub center_x_aligned: Vec<AlignmentGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub center_y_aligned: Vec<AlignmentGroup>,
}

impl AlignmentGroups {
    pub fn by_edge(&self, edge: AlignmentEdge) -> &[AlignmentGroup] {
        match edge {
            AlignmentEdge::Top => &self.top_aligned,
            AlignmentEdge::Left => &self.left_aligned,
            AlignmentEdge::Right => &self.right_aligned,
            AlignmentEdge::Bottom => &self.bottom_aligned,
            AlignmentEdge::CenterX => &self.center_x_aligned,
            AlignmentEdge::CenterY => &self.center_y_aligned,
        }
    }

    pub fn by_edge_mut(&mut self, edge: AlignmentEdge) -> &mut Vec<AlignmentGroup> {
        match edge {
            AlignmentEdge::Top => &mut self.top_aligned,
            AlignmentEdge::Left => &mut self.left_aligned,
            AlignmentEdge::Right => &mut self.right_aligned,
            AlignmentEdge::Bottom => &mut self.bottom_aligned,
            AlignmentEdge::CenterX => &mut self.center_x_aligned,
            AlignmentEdge::CenterY => &mut self.center_y_aligned,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlignmentGroup> {
        AlignmentEdge::all()
            .into_iter()
            .flat_map(move |edge| self.by_edge(edge).iter())
    }

    /// Group of the given edge kind containing `id`, if any.
    pub fn group_for(&self, edge: AlignmentEdge, id: &str) -> Option<&AlignmentGroup> {
        self.by_edge(edge).iter().find(|g| g.contains(id))
    }

    /// Sum of member counts across all groups.
    pub fn relationship_count(&self) -> usize {
        self.iter().map(AlignmentGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacingDirection {
    Horizontal,
    Vertical,
}

impl fmt::Display for SpacingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpacingDirection::Horizontal => write!(f, "horizontal"),
            SpacingDirection::Vertical => write!(f, "vertical"),
        }
    }
}

/// A gap value shared by most consecutive sibling pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistentSpacing {
    pub direction: SpacingDirection,
    /// Gap in whole pixels.
    pub value: i64,
    /// Fraction of measured gaps in the dominant bucket (0.0-1.0).
    pub support: f64,
    pub measured_gaps: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPattern {
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexCandidate {
    pub is_candidate: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingPattern {
    pub consistent_spacing: Option<ConsistentSpacing>,
    pub grid_pattern: Option<GridPattern>,
    pub flexbox_candidate: FlexCandidate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutComplexity {
    Simple,
    Moderate,
    Complex,
}

/// Result of analysing one sibling set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutAnalysis {
    /// Parent whose children were analysed; `None` when there was no parent.
    pub parent_id: Option<String>,
    pub alignment_groups: AlignmentGroups,
    pub patterns: SpacingPattern,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
    pub complexity: LayoutComplexity,
    /// Text rendering for the code-generation request.
    pub hints: String,
}

/// Per-container layout analyses for a whole subtree, keyed by parent id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtreeLayout {
    pub containers: BTreeMap<String, LayoutAnalysis>,
}

impl SubtreeLayout {
    pub fn for_parent(&self, parent_id: &str) -> Option<&LayoutAnalysis> {
        self.containers.get(parent_id)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &AlignmentGroup)> {
        self.containers.iter().flat_map(|(parent, analysis)| {
            analysis
                .alignment_groups
                .iter()
                .map(move |g| (parent.as_str(), g))
        })
    }
}
