//! Pairing markup elements with design nodes.

use std::collections::{HashMap, HashSet};

use super::scan::{root_element, Element};
use crate::types::{DesignNode, NodeKind};

/// Element index -> matched design node.
///
/// The outermost element always pairs with the root node. Other elements
/// match by `data-node-id`, then by a `data-name` that is unique in the
/// subtree, then by document order among the direct children of a matched
/// element when the unmatched element and node counts agree. Whatever is
/// still open after that pairs leaf elements with leaf nodes in document
/// order, again only when the counts agree.
#[derive(Debug, Clone)]
pub struct ElementMatches<'a> {
    by_element: Vec<Option<&'a DesignNode>>,
    anchors: Vec<Option<&'a DesignNode>>,
    wraps_match: Vec<bool>,
    parents: HashMap<&'a str, &'a DesignNode>,
    missing: Vec<&'a DesignNode>,
}

impl<'a> ElementMatches<'a> {
    pub fn node_for(&self, element: usize) -> Option<&'a DesignNode> {
        self.by_element.get(element).copied().flatten()
    }

    pub fn element_for(&self, node_id: &str) -> Option<usize> {
        self.by_element
            .iter()
            .position(|n| n.is_some_and(|n| n.id == node_id))
    }

    /// Design parent of a matched node (within the matched subtree).
    pub fn design_parent(&self, node_id: &str) -> Option<&'a DesignNode> {
        self.parents.get(node_id).copied()
    }

    /// Node of the nearest matched ancestor element. Offsets of `element`
    /// are measured from this node's box; `None` outside the root.
    pub fn anchor(&self, element: usize) -> Option<&'a DesignNode> {
        self.anchors.get(element).copied().flatten()
    }

    /// Whether an unmatched element has a matched element below it.
    pub fn is_wrapper(&self, element: usize) -> bool {
        self.node_for(element).is_none()
            && self.wraps_match.get(element).copied().unwrap_or(false)
    }

    /// Whether an element belongs to a node's content rather than its
    /// layout: it sits under a text node, or it is unmatched under a node
    /// whose children are all text.
    pub fn is_content(&self, element: usize) -> bool {
        match self.anchor(element) {
            None => false,
            Some(anchor) if anchor.kind == NodeKind::Text => true,
            Some(anchor) => {
                self.node_for(element).is_none()
                    && anchor.children.iter().all(|c| c.kind == NodeKind::Text)
            }
        }
    }

    /// Non-text descendants of the root that no element renders.
    pub fn missing(&self) -> &[&'a DesignNode] {
        &self.missing
    }

    pub fn matched(&self) -> impl Iterator<Item = (usize, &'a DesignNode)> + '_ {
        self.by_element
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.map(|n| (i, n)))
    }

    pub fn len(&self) -> usize {
        self.by_element.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn match_elements<'a>(elements: &[Element], root: &'a DesignNode) -> ElementMatches<'a> {
    let mut by_element: Vec<Option<&'a DesignNode>> = vec![None; elements.len()];
    let mut parents = HashMap::new();
    let mut by_id: HashMap<&'a str, &'a DesignNode> = HashMap::new();
    let mut by_name: HashMap<&'a str, Vec<&'a DesignNode>> = HashMap::new();
    index(root, &mut by_id, &mut by_name, &mut parents);

    let Some(root_el) = root_element(elements) else {
        let mut missing = Vec::new();
        for child in &root.children {
            collect_missing(child, &HashSet::new(), &mut missing);
        }
        return ElementMatches {
            anchors: vec![None; elements.len()],
            wraps_match: vec![false; elements.len()],
            by_element,
            parents,
            missing,
        };
    };
    by_element[root_el.index] = Some(root);
    let mut used: HashSet<&str> = HashSet::from([root.id.as_str()]);

    for el in elements.iter().filter(|e| e.index != root_el.index) {
        let node = el
            .attr_value("data-node-id")
            .and_then(|id| by_id.get(id).copied())
            .or_else(|| {
                el.attr_value("data-name")
                    .and_then(|name| by_name.get(name))
                    .filter(|nodes| nodes.len() == 1)
                    .map(|nodes| nodes[0])
            });
        if let Some(node) = node {
            if used.insert(node.id.as_str()) {
                by_element[el.index] = Some(node);
            }
        }
    }

    // Parents precede their children in document order, so one pass
    // cascades matches downward.
    for el in elements {
        let Some(node) = by_element[el.index] else {
            continue;
        };
        let open_elements: Vec<usize> = elements
            .iter()
            .filter(|c| c.parent == Some(el.index) && by_element[c.index].is_none())
            .map(|c| c.index)
            .collect();
        let open_nodes: Vec<&'a DesignNode> = node
            .children
            .iter()
            .filter(|c| !used.contains(c.id.as_str()))
            .collect();
        if open_elements.is_empty() || open_elements.len() != open_nodes.len() {
            continue;
        }
        for (index, child) in open_elements.into_iter().zip(open_nodes) {
            used.insert(child.id.as_str());
            by_element[index] = Some(child);
        }
    }

    let in_root = descendants_of(elements, root_el.index);
    pair_leaves(elements, &in_root, root, &mut by_element, &mut used);

    let mut anchors: Vec<Option<&'a DesignNode>> = vec![None; elements.len()];
    for el in elements {
        if let Some(parent) = el.parent.filter(|_| in_root[el.index]) {
            anchors[el.index] = by_element[parent].or(anchors[parent]);
        }
    }
    let mut wraps_match = vec![false; elements.len()];
    for el in elements.iter().rev() {
        if let Some(parent) = el.parent {
            if by_element[el.index].is_some() || wraps_match[el.index] {
                wraps_match[parent] = true;
            }
        }
    }

    let mut missing = Vec::new();
    for child in &root.children {
        collect_missing(child, &used, &mut missing);
    }

    ElementMatches {
        by_element,
        anchors,
        wraps_match,
        parents,
        missing,
    }
}

/// `true` for every element strictly inside `root`.
fn descendants_of(elements: &[Element], root: usize) -> Vec<bool> {
    let mut inside = vec![false; elements.len()];
    for el in elements {
        if let Some(parent) = el.parent {
            inside[el.index] = parent == root || inside[parent];
        }
    }
    inside
}

/// Pair open leaf elements with open leaf nodes in document order.
///
/// Non-text leaves are tried first; text leaves join only when that makes
/// the counts agree.
fn pair_leaves<'a>(
    elements: &[Element],
    in_root: &[bool],
    root: &'a DesignNode,
    by_element: &mut [Option<&'a DesignNode>],
    used: &mut HashSet<&'a str>,
) {
    let open_elements: Vec<usize> = elements
        .iter()
        .filter(|e| in_root[e.index] && by_element[e.index].is_none())
        .filter(|e| !elements.iter().any(|c| c.parent == Some(e.index)))
        .map(|e| e.index)
        .collect();
    if open_elements.is_empty() {
        return;
    }

    let mut leaves = Vec::new();
    for child in &root.children {
        collect_leaves(child, &mut leaves);
    }
    leaves.retain(|n| !used.contains(n.id.as_str()));
    let shapes: Vec<&'a DesignNode> = leaves
        .iter()
        .copied()
        .filter(|n| n.kind != NodeKind::Text)
        .collect();

    for nodes in [shapes, leaves] {
        if !nodes.is_empty() && nodes.len() == open_elements.len() {
            for (&index, node) in open_elements.iter().zip(nodes) {
                used.insert(node.id.as_str());
                by_element[index] = Some(node);
            }
            return;
        }
    }
}

fn collect_leaves<'a>(node: &'a DesignNode, out: &mut Vec<&'a DesignNode>) {
    if node.children.is_empty() {
        out.push(node);
    }
    for child in &node.children {
        collect_leaves(child, out);
    }
}

fn collect_missing<'a>(
    node: &'a DesignNode,
    used: &HashSet<&str>,
    out: &mut Vec<&'a DesignNode>,
) {
    if node.kind != NodeKind::Text && !used.contains(node.id.as_str()) {
        out.push(node);
    }
    for child in &node.children {
        collect_missing(child, used, out);
    }
}

fn index<'a>(
    node: &'a DesignNode,
    by_id: &mut HashMap<&'a str, &'a DesignNode>,
    by_name: &mut HashMap<&'a str, Vec<&'a DesignNode>>,
    parents: &mut HashMap<&'a str, &'a DesignNode>,
) {
    by_id.insert(node.id.as_str(), node);
    by_name.entry(node.name.as_str()).or_default().push(node);
    for child in &node.children {
        parents.insert(child.id.as_str(), node);
        index(child, by_id, by_name, parents);
    }
}
