//! Code-generation requests and the external generation backends.
//!
//! The core never generates markup itself. It builds a [`GenerationRequest`]
//! describing the node and hands it to whichever [`CodegenBackend`] the
//! environment configures. Backend failures and timeouts surface as
//! [`DfcError::Generation`]; nothing here retries.

use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::{DfcError, Result};
use crate::tree::DesignTree;
use crate::types::{ClassificationResult, DesignNode, LayoutAnalysis};

/// Prompt and structured context for one generation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub node_id: String,
    pub prompt: String,
    pub classification: ClassificationResult,
    pub hints: String,
}

/// Build the generation request for `node`.
///
/// The prompt embeds the classification, the layout hints and a JSON dump
/// of the node's geometry, fills, strokes and children.
pub fn build_request(
    tree: &DesignTree,
    node: &DesignNode,
    classification: &ClassificationResult,
    layout: &LayoutAnalysis,
) -> Result<GenerationRequest> {
    let geometry = serde_json::to_string_pretty(node)?;
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Generate a React component (JSX with inline style objects) \
         for the design node \"{}\" ({}).\n",
        node.name, node.id
    ));
    if classification.is_unknown() {
        prompt.push_str("Component type: not recognised; build it from the geometry below.\n");
    } else {
        prompt.push_str(&format!(
            "Component type: {} (confidence {}%, suggested library: {}).\n",
            classification.component_type,
            classification.confidence,
            classification.suggested_library
        ));
        for reason in &classification.reasoning {
            prompt.push_str(&format!("- {reason}\n"));
        }
    }
    if let Some(parent) = tree.parent_of(&node.id) {
        let bb = parent.bounding_box;
        prompt.push_str(&format!(
            "It sits inside \"{}\" ({}x{}) at offset ({}, {}).\n",
            parent.name,
            bb.width,
            bb.height,
            node.bounding_box.x - bb.x,
            node.bounding_box.y - bb.y
        ));
    }
    prompt.push('\n');
    prompt.push_str(&layout.hints);
    prompt.push_str("\n\nUse the exact pixel values below; do not round them.\n");
    prompt.push_str("Respond with a single fenced code block.\n\n```json\n");
    prompt.push_str(&geometry);
    prompt.push_str("\n```\n");

    Ok(GenerationRequest {
        node_id: node.id.clone(),
        prompt,
        classification: classification.clone(),
        hints: layout.hints.clone(),
    })
}

/// Where generation requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodegenBackend {
    /// Canned response; no external call.
    Mock(String),
    /// Run a program with the prompt on stdin; stdout is the response.
    Command { program: String, args: Vec<String> },
    /// POST the request as JSON.
    Http { url: String, api_key: Option<String> },
}

/// Raw response text from a backend, plus any warnings it reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub text: String,
    pub warnings: Vec<String>,
}

impl CodegenBackend {
    /// Backend configured through `DFC_*` environment variables, if any.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the backend from a variable lookup. Precedence: mock code,
    /// mock code file, command, HTTP endpoint.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(code) = var("DFC_MOCK_CODE") {
            return Ok(Some(CodegenBackend::Mock(code)));
        }
        if let Some(path) = var("DFC_MOCK_CODE_PATH") {
            let code = std::fs::read_to_string(&path).map_err(|e| {
                DfcError::Config(format!("Failed to read mock code file {path}: {e}"))
            })?;
            return Ok(Some(CodegenBackend::Mock(code)));
        }
        if let Some(program) = var("DFC_CODEGEN_CMD") {
            let args = var("DFC_CODEGEN_ARGS")
                .map(|a| a.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default();
            return Ok(Some(CodegenBackend::Command { program, args }));
        }
        if let Some(url) = var("DFC_CODEGEN_URL") {
            url::Url::parse(&url)?;
            return Ok(Some(CodegenBackend::Http {
                url,
                api_key: var("DFC_CODEGEN_API_KEY"),
            }));
        }
        Ok(None)
    }

    /// Like [`CodegenBackend::from_env`], but a missing backend is an error.
    pub fn require_from_env() -> Result<Self> {
        Self::from_env()?.ok_or_else(|| {
            DfcError::generation(
                "No codegen backend configured; \
                 set DFC_CODEGEN_URL, DFC_CODEGEN_CMD, or DFC_MOCK_CODE.",
            )
        })
    }

    /// Send the request and await the response for at most `timeout`.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        timeout: Duration,
    ) -> Result<Generated> {
        debug!(node = %request.node_id, backend = self.label(), "requesting generation");
        match tokio::time::timeout(timeout, self.call(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(node = %request.node_id, ?timeout, "generation call timed out");
                Err(DfcError::generation(format!(
                    "generation call timed out after {timeout:?}"
                )))
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            CodegenBackend::Mock(_) => "mock",
            CodegenBackend::Command { .. } => "command",
            CodegenBackend::Http { .. } => "http",
        }
    }

    async fn call(&self, request: &GenerationRequest) -> Result<Generated> {
        match self {
            CodegenBackend::Mock(code) => Ok(Generated {
                text: code.clone(),
                warnings: vec!["Using DFC_MOCK_CODE; external codegen not invoked.".to_string()],
            }),
            CodegenBackend::Command { program, args } => {
                run_command(program, args, &request.prompt).await
            }
            CodegenBackend::Http { url, api_key } => {
                call_http(url, api_key.as_deref(), request).await
            }
        }
    }
}

async fn run_command(program: &str, args: &[String], prompt: &str) -> Result<Generated> {
    let mut child = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            DfcError::generation(format!("Failed to run codegen command '{program}': {e}"))
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(prompt.as_bytes())
            .await
            .map_err(|e| {
                DfcError::generation(format!("Failed to send prompt to '{program}': {e}"))
            })?;
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| DfcError::generation(format!("Codegen command '{program}' failed: {e}")))?;

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !output.status.success() {
        return Err(DfcError::generation(format!(
            "Codegen command exited with {}: {}",
            output.status, stderr
        )));
    }

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    if text.trim().is_empty() {
        return Err(DfcError::generation("Codegen command produced no output"));
    }

    let mut warnings = Vec::new();
    if !stderr.is_empty() {
        warnings.push(format!("codegen command stderr: {stderr}"));
    }
    Ok(Generated { text, warnings })
}

#[derive(Debug, Deserialize)]
struct HttpCodegenResponse {
    code: Option<String>,
    markup: Option<String>,
    output: Option<String>,
    text: Option<String>,
    warnings: Option<Vec<String>>,
    message: Option<String>,
}

async fn call_http(
    url: &str,
    api_key: Option<&str>,
    request: &GenerationRequest,
) -> Result<Generated> {
    let client = reqwest::Client::new();
    let mut call = client.post(url).json(request);
    if let Some(token) = api_key {
        call = call.bearer_auth(token);
    }

    let response = call
        .send()
        .await
        .map_err(|e| DfcError::generation(format!("Codegen request to {url} failed: {e}")))?;
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        DfcError::generation(format!("Failed to read codegen response from {url}: {e}"))
    })?;

    if !status.is_success() {
        return Err(DfcError::generation(format!("Codegen HTTP {}: {}", status, body.trim())));
    }
    parse_http_body(body)
}

/// Pull the response text out of a JSON body, falling back to the raw body.
fn parse_http_body(body: String) -> Result<Generated> {
    if body.trim().is_empty() {
        return Err(DfcError::generation("Codegen HTTP response was empty"));
    }

    let mut warnings = Vec::new();
    if let Ok(json) = serde_json::from_str::<HttpCodegenResponse>(&body) {
        warnings.extend(json.warnings.unwrap_or_default());
        warnings.extend(json.message);
        if let Some(text) = json.code.or(json.markup).or(json.output).or(json.text) {
            if text.trim().is_empty() {
                return Err(DfcError::generation("Codegen response contained empty code"));
            }
            return Ok(Generated { text, warnings });
        }
        if body.trim_start().starts_with('{') {
            return Err(DfcError::generation(
                "Codegen response JSON has no code, markup, output, or text field",
            ));
        }
    }

    warnings.push("Codegen response was not JSON; using raw body.".to_string());
    Ok(Generated { text: body, warnings })
}
