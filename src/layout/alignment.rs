//! Edge and center alignment grouping.
//!
//! Coordinates are clustered per edge kind by anchoring: siblings are sorted
//! by coordinate, the smallest unassigned coordinate opens a group and every
//! later sibling within tolerance of that anchor joins it. Groups of one edge
//! kind are therefore disjoint and equal coordinates always share a group.

use crate::config::AlignmentConfig;
use crate::types::{AlignmentEdge, AlignmentGroup, AlignmentGroups, BoundingBox, DesignNode};

const EPSILON: f64 = 1e-9;

/// Absolute design coordinate a node exposes for the given edge.
pub fn edge_value(bb: &BoundingBox, edge: AlignmentEdge) -> f64 {
    match edge {
        AlignmentEdge::Top => bb.y,
        AlignmentEdge::Left => bb.x,
        AlignmentEdge::Right => bb.right(),
        AlignmentEdge::Bottom => bb.bottom(),
        AlignmentEdge::CenterX => bb.center_x(),
        AlignmentEdge::CenterY => bb.center_y(),
    }
}

pub fn find_groups(siblings: &[DesignNode], config: &AlignmentConfig) -> AlignmentGroups {
    let mut groups = AlignmentGroups::default();
    if siblings.len() < 2 {
        return groups;
    }
    for edge in AlignmentEdge::all() {
        let tolerance = if edge.is_center() {
            config.center_tolerance
        } else {
            config.edge_tolerance
        };
        *groups.by_edge_mut(edge) = cluster_edge(siblings, edge, tolerance);
    }
    groups
}

fn cluster_edge(
    siblings: &[DesignNode],
    edge: AlignmentEdge,
    tolerance: f64,
) -> Vec<AlignmentGroup> {
    let mut order: Vec<(usize, f64)> = siblings
        .iter()
        .enumerate()
        .map(|(index, node)| (index, edge_value(&node.bounding_box, edge)))
        .collect();
    // Stable: equal coordinates keep document order.
    order.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut groups = Vec::new();
    let mut start = 0;
    while start < order.len() {
        let anchor = order[start].1;
        let mut end = start + 1;
        while end < order.len() && order[end].1 - anchor <= tolerance + EPSILON {
            end += 1;
        }
        if end - start >= 2 {
            let mut members: Vec<usize> = order[start..end].iter().map(|(i, _)| *i).collect();
            members.sort_unstable();
            groups.push(AlignmentGroup {
                edge,
                value: anchor,
                node_ids: members.into_iter().map(|i| siblings[i].id.clone()).collect(),
            });
        }
        start = end;
    }
    groups
}
