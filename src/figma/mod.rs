//! Figma integration for loading design nodes.
//!
//! This module provides:
//! - [`FigmaClient`] - HTTP client for the Figma node-by-id endpoint
//! - [`fetch_design_node`] - fetch one node subtree as a [`RawNode`]
//! - [`raw_node_from_json`] - accept a node payload in either our format or Figma's
//! - API types for parsing Figma JSON responses

pub mod api_types;
pub mod client;
pub mod conversion;


pub use api_types::{FigmaNodeData, FigmaNodesResponse, FigmaNodeWrapper};
pub use client::{map_figma_error, FigmaAuth, FigmaClient, FigmaError};
pub use conversion::to_raw_node;

use serde_json::Value;
use tracing::debug;

use crate::types::RawNode;
use crate::{DfcError, Result};

/// Fetch `node_id` from `file_key` with all of its children.
pub async fn fetch_design_node(
    client: &FigmaClient,
    file_key: &str,
    node_id: &str,
) -> Result<RawNode> {
    if file_key.trim().is_empty() {
        return Err(DfcError::Config("Figma file key is required".to_string()));
    }
    if node_id.trim().is_empty() {
        return Err(DfcError::Config(
            "Figma node-id is required to fetch a design node".to_string(),
        ));
    }

    let response = client
        .get_file_nodes(file_key, &[node_id])
        .await
        .map_err(map_figma_error)?;
    debug!(file_key, node_id, "fetched Figma node");
    node_from_response(response, node_id)
}

/// Pick `node_id` out of a nodes response.
pub fn node_from_response(mut response: FigmaNodesResponse, node_id: &str) -> Result<RawNode> {
    response
        .nodes
        .remove(node_id)
        .flatten()
        .map(|wrapper| to_raw_node(&wrapper.document))
        .ok_or_else(|| map_figma_error(FigmaError::NodeNotFound(node_id.to_string())))
}

/// Parse a design node from JSON.
///
/// Accepts a node in our own format, a bare Figma node document, or a
/// Figma nodes response (`{"nodes": {...}}`). For a nodes response,
/// `node_id` selects the entry when it names one; otherwise the response
/// must hold exactly one node.
pub fn raw_node_from_json(json: &str, node_id: Option<&str>) -> Result<RawNode> {
    let value: Value = serde_json::from_str(json)?;

    if value.get("nodes").is_some() {
        let response: FigmaNodesResponse = serde_json::from_value(value)?;
        let id = match node_id {
            Some(id) if response.nodes.contains_key(id) => id.to_string(),
            _ => {
                // A single entry is the tree to load; `node_id` then picks a
                // descendant inside it.
                let mut ids = response.nodes.keys();
                match (ids.next(), ids.next(), node_id) {
                    (Some(id), None, _) => id.clone(),
                    (_, _, Some(id)) => id.to_string(),
                    _ => {
                        return Err(DfcError::invalid_input(
                            "Figma nodes response holds several nodes; pass --node-id to pick one",
                        ))
                    }
                }
            }
        };
        return node_from_response(response, &id);
    }

    if value.get("absoluteBoundingBox").is_some() {
        if let Ok(figma) = serde_json::from_value::<FigmaNodeData>(value.clone()) {
            return Ok(to_raw_node(&figma));
        }
    }
    Ok(serde_json::from_value::<RawNode>(value)?)
}
