//! Design input resolution: a local JSON file or a Figma URL.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::figma::{fetch_design_node, map_figma_error, raw_node_from_json, FigmaAuth, FigmaClient};
use crate::tree::{resolve, DesignTree};
use crate::{DfcError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Local JSON file holding a design node.
    Json,
    /// Figma file URL with a node id.
    Figma,
}

#[derive(Debug, Clone)]
pub struct ParsedResource {
    pub kind: ResourceKind,
    pub value: String,
    pub figma_info: Option<FigmaInfo>,
}

#[derive(Debug, Clone)]
pub struct FigmaInfo {
    pub file_key: String,
    pub node_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum ResourceParseError {
    #[error("Invalid URL '{value}': {message}. Hint: include http(s):// and ensure the URL is well-formed.")]
    InvalidUrl { value: String, message: String },
    #[error("Unsupported URL '{url}'. Hint: only Figma URLs (https://www.figma.com/design/<FILE_KEY>/...) are accepted.")]
    UnsupportedUrl { url: String },
    #[error("Figma URL missing file key in '{url}'. Hint: use https://www.figma.com/file/<FILE_KEY>/... and node-id if needed.")]
    FigmaMissingFileKey { url: String },
    #[error("Local file not found: {path}. Hint: check the path relative to the current working directory or use an absolute path.")]
    FileNotFound { path: String },
    #[error("Unsupported file extension '{extension}'. Design inputs must be .json files.")]
    UnsupportedExtension { extension: String },
}

pub fn parse_resource(value: &str) -> std::result::Result<ParsedResource, ResourceParseError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        parse_url_resource(value)
    } else {
        parse_local_resource(value)
    }
}

fn parse_url_resource(value: &str) -> std::result::Result<ParsedResource, ResourceParseError> {
    let url = Url::parse(value).map_err(|e| ResourceParseError::InvalidUrl {
        value: value.to_string(),
        message: e.to_string(),
    })?;

    let host = url.host_str().unwrap_or("");
    if !host.contains("figma.com") {
        return Err(ResourceParseError::UnsupportedUrl {
            url: value.to_string(),
        });
    }

    let path_segments: Vec<&str> = url.path_segments().map(|c| c.collect()).unwrap_or_default();
    let file_key = path_segments
        .iter()
        .position(|&s| s == "file" || s == "design")
        .and_then(|i| path_segments.get(i + 1))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or_else(|| ResourceParseError::FigmaMissingFileKey {
            url: value.to_string(),
        })?;

    let node_id = url
        .query_pairs()
        .find(|(k, _)| k == "node-id")
        .map(|(_, v)| v.replace('-', ":"));

    Ok(ParsedResource {
        kind: ResourceKind::Figma,
        value: value.to_string(),
        figma_info: Some(FigmaInfo { file_key, node_id }),
    })
}

fn parse_local_resource(value: &str) -> std::result::Result<ParsedResource, ResourceParseError> {
    let path = Path::new(value);

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if extension != "json" {
        return Err(ResourceParseError::UnsupportedExtension {
            extension: if extension.is_empty() {
                "no extension".to_string()
            } else {
                extension
            },
        });
    }

    let is_file = fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
    if !is_file {
        return Err(ResourceParseError::FileNotFound {
            path: path.to_string_lossy().into_owned(),
        });
    }

    Ok(ParsedResource {
        kind: ResourceKind::Json,
        value: value.to_string(),
        figma_info: None,
    })
}

/// A resolved design tree and the node a command operates on.
#[derive(Debug, Clone)]
pub struct LoadedDesign {
    pub tree: DesignTree,
    pub node_id: String,
}

/// Load and resolve the design behind `resource`.
///
/// `node_id` picks a node inside the loaded tree; a Figma URL without its own
/// `node-id` fetches that node. Without it the tree's root is selected.
pub async fn load_design(resource: &ParsedResource, node_id: Option<&str>) -> Result<LoadedDesign> {
    let raw = match resource.kind {
        ResourceKind::Json => {
            let json = fs::read_to_string(&resource.value).map_err(|e| {
                DfcError::Config(format!("Failed to read {}: {e}", resource.value))
            })?;
            raw_node_from_json(&json, node_id)?
        }
        ResourceKind::Figma => {
            let info = resource
                .figma_info
                .as_ref()
                .ok_or_else(|| DfcError::Config("Figma URL missing file key".to_string()))?;
            let fetch_id = info.node_id.as_deref().or(node_id).ok_or_else(|| {
                DfcError::Config("Figma URL has no node-id; pass --node-id".to_string())
            })?;
            let auth = FigmaAuth::from_env().ok_or_else(|| {
                DfcError::Config("FIGMA_TOKEN environment variable is required".to_string())
            })?;
            let client = FigmaClient::new(auth).map_err(map_figma_error)?;
            fetch_design_node(&client, &info.file_key, fetch_id).await?
        }
    };

    let tree = resolve(raw)?;
    let node_id = match node_id {
        Some(id) if tree.get(id).is_some() => id.to_string(),
        Some(id) => {
            return Err(DfcError::invalid_input(format!("node {id} not found in tree")));
        }
        None => tree.root().id.clone(),
    };
    debug!(node = %node_id, nodes = tree.node_count(), "design loaded");
    Ok(LoadedDesign { tree, node_id })
}
