//! Box resolution and tree navigation.
//!
//! [`resolve`] turns a [`RawNode`] tree into a [`DesignTree`] in one pass.
//! Every stage downstream works on the resolved shape only.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::types::{BoundingBox, DesignNode, RawNode};
use crate::{DfcError, Result};

/// A resolved design tree.
///
/// Children are owned by their parent; upward navigation goes through a
/// non-owning `child id -> parent id` index.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignTree {
    root: DesignNode,
    parents: HashMap<String, String>,
}

impl DesignTree {
    /// Build a tree from an already-resolved root.
    pub fn new(root: DesignNode) -> Result<Self> {
        let mut parents = HashMap::new();
        let mut seen = HashSet::new();
        index_parents(&root, &mut parents, &mut seen)?;
        Ok(Self { root, parents })
    }

    pub fn root(&self) -> &DesignNode {
        &self.root
    }

    pub fn into_root(self) -> DesignNode {
        self.root
    }

    pub fn get(&self, id: &str) -> Option<&DesignNode> {
        self.root.find(id)
    }

    pub fn parent_id(&self, id: &str) -> Option<&str> {
        self.parents.get(id).map(String::as_str)
    }

    pub fn parent_of(&self, id: &str) -> Option<&DesignNode> {
        self.parent_id(id).and_then(|pid| self.get(pid))
    }

    /// Children of the node's parent, the node itself included.
    pub fn siblings_of(&self, id: &str) -> Option<&[DesignNode]> {
        self.parent_of(id).map(|p| p.children.as_slice())
    }

    pub fn node_count(&self) -> usize {
        self.parents.len() + 1
    }
}

fn index_parents(
    node: &DesignNode,
    parents: &mut HashMap<String, String>,
    seen: &mut HashSet<String>,
) -> Result<()> {
    if !seen.insert(node.id.clone()) {
        return Err(DfcError::invalid_input(format!(
            "duplicate node id {} in design tree",
            node.id
        )));
    }
    for child in &node.children {
        parents.insert(child.id.clone(), node.id.clone());
        index_parents(child, parents, seen)?;
    }
    Ok(())
}

/// Resolve every node's bounding box.
///
/// Nodes without a box take the tight union of their resolved children.
/// A non-root node with no resolvable geometry anywhere in its subtree is
/// dropped; an unresolvable root is invalid input.
pub fn resolve(raw: RawNode) -> Result<DesignTree> {
    let root_id = raw.id.clone();
    match resolve_node(raw) {
        Some(root) => DesignTree::new(root),
        None => Err(DfcError::invalid_input(format!(
            "root node {} has no resolvable geometry",
            root_id
        ))),
    }
}

fn resolve_node(raw: RawNode) -> Option<DesignNode> {
    let RawNode {
        id,
        name,
        kind,
        bounding_box,
        fills,
        strokes,
        corner_radius,
        corner_radii,
        effects,
        characters,
        text_style,
        children,
    } = raw;

    let children: Vec<DesignNode> = children
        .into_iter()
        .filter_map(|child| {
            let child_id = child.id.clone();
            let resolved = resolve_node(child);
            if resolved.is_none() {
                warn!(node = %child_id, parent = %id, "dropping node without resolvable geometry");
            }
            resolved
        })
        .collect();

    let bounding_box = bounding_box
        .filter(|bb| {
            bb.x.is_finite() && bb.y.is_finite() && bb.width.is_finite() && bb.height.is_finite()
        })
        .or_else(|| union_of(&children))?;

    Some(DesignNode {
        id,
        name,
        kind,
        bounding_box,
        fills,
        strokes,
        corner_radius: corner_radius.unwrap_or(0.0),
        corner_radii,
        effects,
        characters,
        text_style,
        children,
    })
}

fn union_of(children: &[DesignNode]) -> Option<BoundingBox> {
    children
        .iter()
        .map(|c| c.bounding_box)
        .reduce(|acc, bb| acc.union(&bb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;

    fn raw(id: &str, kind: NodeKind, bb: Option<BoundingBox>, children: Vec<RawNode>) -> RawNode {
        RawNode {
            id: id.to_string(),
            name: id.to_string(),
            kind,
            bounding_box: bb,
            fills: Vec::new(),
            strokes: Vec::new(),
            corner_radius: None,
            corner_radii: None,
            effects: Vec::new(),
            characters: None,
            text_style: None,
            children,
        }
    }

    fn leaf(id: &str, bb: BoundingBox) -> RawNode {
        raw(id, NodeKind::Rectangle, Some(bb), vec![])
    }

    #[test]
    fn group_without_box_takes_union_of_children() {
        let group = raw(
            "g",
            NodeKind::Group,
            None,
            vec![
                leaf("a", BoundingBox::new(10.0, 20.0, 50.0, 30.0)),
                leaf("b", BoundingBox::new(40.0, 5.0, 100.0, 20.0)),
            ],
        );

        let tree = resolve(group).expect("resolve group");
        assert_eq!(tree.root().bounding_box, BoundingBox::new(10.0, 5.0, 130.0, 45.0));
    }

    #[test]
    fn nested_groups_resolve_bottom_up() {
        let inner = raw(
            "inner",
            NodeKind::Group,
            None,
            vec![leaf("leaf", BoundingBox::new(0.0, 0.0, 10.0, 10.0))],
        );
        let outer = raw(
            "outer",
            NodeKind::Group,
            None,
            vec![inner, leaf("other", BoundingBox::new(20.0, 20.0, 5.0, 5.0))],
        );

        let tree = resolve(outer).expect("resolve");
        assert_eq!(tree.root().bounding_box, BoundingBox::new(0.0, 0.0, 25.0, 25.0));
        assert_eq!(tree.get("inner").map(|n| n.bounding_box.width), Some(10.0));
    }

    #[test]
    fn unresolvable_leaf_is_dropped() {
        let frame = raw(
            "f",
            NodeKind::Frame,
            Some(BoundingBox::new(0.0, 0.0, 100.0, 100.0)),
            vec![raw("ghost", NodeKind::Text, None, vec![])],
        );
        let tree = resolve(frame).expect("resolve");
        assert!(tree.root().children.is_empty());
    }

    #[test]
    fn tree_without_geometry_is_invalid() {
        let group = raw("g", NodeKind::Group, None, vec![raw("t", NodeKind::Text, None, vec![])]);
        let err = resolve(group).unwrap_err();
        assert!(matches!(err, DfcError::InvalidInput(_)));
        assert!(err.to_string().contains("no resolvable geometry"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let frame = raw(
            "f",
            NodeKind::Frame,
            Some(BoundingBox::new(0.0, 0.0, 10.0, 10.0)),
            vec![
                leaf("x", BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
                leaf("x", BoundingBox::new(2.0, 0.0, 1.0, 1.0)),
            ],
        );
        assert!(resolve(frame).is_err());
    }

    #[test]
    fn parent_index_navigates_upward() {
        let frame = raw(
            "f",
            NodeKind::Frame,
            Some(BoundingBox::new(0.0, 0.0, 10.0, 10.0)),
            vec![
                leaf("a", BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
                leaf("b", BoundingBox::new(2.0, 0.0, 1.0, 1.0)),
            ],
        );
        let tree = resolve(frame).expect("resolve");
        assert_eq!(tree.parent_id("b"), Some("f"));
        assert_eq!(tree.parent_of("a").map(|p| p.id.as_str()), Some("f"));
        assert_eq!(tree.siblings_of("a").map(|s| s.len()), Some(2));
        assert!(tree.parent_of("f").is_none());
        assert_eq!(tree.node_count(), 3);
    }
}
