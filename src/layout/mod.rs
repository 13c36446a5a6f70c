//! Geometry analysis among siblings.
//!
//! Finds shared edges, consistent gaps and grid arrangements, and renders
//! them as recommendations and as a hint block for the generation request.

mod alignment;
mod spacing;


pub use alignment::{edge_value, find_groups};
pub use spacing::{consistent_spacing, detect_grid, measure_gaps};

use std::fmt::Write as _;

use tracing::debug;

use crate::config::AlignmentConfig;
use crate::tree::DesignTree;
use crate::types::{
    AlignmentEdge, AlignmentGroups, ConsistentSpacing, DesignNode, FlexCandidate, LayoutAnalysis,
    LayoutComplexity, SpacingDirection, SpacingPattern, SubtreeLayout,
};

#[derive(Debug, Clone, Default)]
pub struct LayoutAnalyzer {
    config: AlignmentConfig,
}

impl LayoutAnalyzer {
    pub fn new(config: AlignmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Analyse the sibling set containing `id`.
    ///
    /// The root and unknown ids have no siblings and yield an empty result.
    pub fn analyze(&self, tree: &DesignTree, id: &str) -> LayoutAnalysis {
        match tree.parent_of(id) {
            Some(parent) => self.analyze_siblings(Some(parent.id.as_str()), &parent.children),
            None => {
                debug!(node = %id, "no parent; nothing to align against");
                self.analyze_siblings(None, &[])
            }
        }
    }

    pub fn analyze_children(&self, node: &DesignNode) -> LayoutAnalysis {
        self.analyze_siblings(Some(node.id.as_str()), &node.children)
    }

    /// Per-parent analyses for every node in the subtree that has children.
    pub fn analyze_subtree(&self, node: &DesignNode) -> SubtreeLayout {
        let containers = node
            .descendants()
            .into_iter()
            .filter(|n| !n.children.is_empty())
            .map(|n| (n.id.clone(), self.analyze_children(n)))
            .collect();
        SubtreeLayout { containers }
    }

    pub fn analyze_siblings(
        &self,
        parent_id: Option<&str>,
        siblings: &[DesignNode],
    ) -> LayoutAnalysis {
        let alignment_groups = find_groups(siblings, &self.config);
        let consistent = consistent_spacing(siblings, &self.config);
        let grid = detect_grid(siblings, &self.config);
        let flexbox_candidate = flex_candidate(&alignment_groups, consistent.as_ref());

        let patterns = SpacingPattern {
            consistent_spacing: consistent,
            grid_pattern: grid,
            flexbox_candidate,
        };
        let complexity = complexity_of(alignment_groups.relationship_count());
        let recommendations = recommend(siblings, &alignment_groups, &patterns);
        let hints = render_hints(
            siblings.len(),
            &alignment_groups,
            &patterns,
            complexity,
            &recommendations,
        );

        debug!(
            parent = parent_id.unwrap_or("-"),
            siblings = siblings.len(),
            relationships = alignment_groups.relationship_count(),
            ?complexity,
            "analysed sibling layout"
        );

        LayoutAnalysis {
            parent_id: parent_id.map(str::to_string),
            alignment_groups,
            patterns,
            recommendations,
            complexity,
            hints,
        }
    }
}

fn flex_candidate(groups: &AlignmentGroups, spacing: Option<&ConsistentSpacing>) -> FlexCandidate {
    let mut reasons = Vec::new();
    if let Some(group) = groups.left_aligned.iter().find(|g| g.len() > 2) {
        reasons.push(format!("{} elements share a left edge", group.len()));
    }
    if let Some(group) = groups.top_aligned.iter().find(|g| g.len() > 2) {
        reasons.push(format!("{} elements share a top edge", group.len()));
    }
    if let Some(spacing) = spacing {
        reasons.push(format!(
            "consistent {} spacing of {}px",
            spacing.direction, spacing.value
        ));
    }
    if !groups.center_x_aligned.is_empty() || !groups.center_y_aligned.is_empty() {
        reasons.push("centered elements present".to_string());
    }
    FlexCandidate {
        is_candidate: !reasons.is_empty(),
        reasons,
    }
}

fn complexity_of(relationships: usize) -> LayoutComplexity {
    match relationships {
        0..=5 => LayoutComplexity::Simple,
        6..=10 => LayoutComplexity::Moderate,
        _ => LayoutComplexity::Complex,
    }
}

fn recommend(
    siblings: &[DesignNode],
    groups: &AlignmentGroups,
    patterns: &SpacingPattern,
) -> Vec<String> {
    let mut out = Vec::new();
    if siblings.len() < 2 {
        return out;
    }
    if let Some(grid) = patterns.grid_pattern {
        out.push(format!(
            "Use CSS grid with {} columns ({} rows)",
            grid.columns, grid.rows
        ));
    } else if let Some(spacing) = &patterns.consistent_spacing {
        let axis = match spacing.direction {
            SpacingDirection::Horizontal => "row",
            SpacingDirection::Vertical => "column",
        };
        out.push(format!("Use flex {axis} with gap {}px", spacing.value));
    } else if patterns.flexbox_candidate.is_candidate {
        out.push("Use flexbox along the shared alignment axis".to_string());
    }
    if groups.is_empty() {
        out.push("Keep absolute positioning; siblings share no edges".to_string());
    } else {
        out.push("Emit identical values for elements in the same alignment group".to_string());
    }
    out
}

fn edge_axis(edge: AlignmentEdge) -> &'static str {
    match edge {
        AlignmentEdge::Top | AlignmentEdge::Bottom | AlignmentEdge::CenterY => "y",
        AlignmentEdge::Left | AlignmentEdge::Right | AlignmentEdge::CenterX => "x",
    }
}

fn render_hints(
    sibling_count: usize,
    groups: &AlignmentGroups,
    patterns: &SpacingPattern,
    complexity: LayoutComplexity,
    recommendations: &[String],
) -> String {
    if sibling_count < 2 {
        return "No sibling layout relationships detected.".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Layout analysis ({sibling_count} elements, complexity: {})",
        match complexity {
            LayoutComplexity::Simple => "simple",
            LayoutComplexity::Moderate => "moderate",
            LayoutComplexity::Complex => "complex",
        }
    );
    for group in groups.iter() {
        let _ = writeln!(
            out,
            "- {}-aligned at {}={}: {}",
            group.edge,
            edge_axis(group.edge),
            group.value,
            group.node_ids.join(", ")
        );
    }
    if let Some(spacing) = &patterns.consistent_spacing {
        let _ = writeln!(
            out,
            "- consistent {} spacing: {}px ({:.0}% of {} gaps)",
            spacing.direction,
            spacing.value,
            spacing.support * 100.0,
            spacing.measured_gaps
        );
    }
    if let Some(grid) = patterns.grid_pattern {
        let _ = writeln!(out, "- grid: {} rows x {} columns", grid.rows, grid.columns);
    }
    if patterns.flexbox_candidate.is_candidate {
        let _ = writeln!(
            out,
            "- flexbox candidate: {}",
            patterns.flexbox_candidate.reasons.join("; ")
        );
    }
    if !recommendations.is_empty() {
        out.push_str("Recommendations:\n");
        for rec in recommendations {
            let _ = writeln!(out, "- {rec}");
        }
    }
    out.trim_end().to_string()
}
