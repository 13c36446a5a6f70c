use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum DfcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Figma API error (status: {status:?}): {message}")]
    FigmaApi {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Generation service error: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl DfcError {
    pub fn figma_api(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        DfcError::FigmaApi {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        DfcError::InvalidInput(message.into())
    }

    pub fn generation(message: impl Into<String>) -> Self {
        DfcError::Generation(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            DfcError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            DfcError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and retry.",
            ),
            DfcError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify URL/format (e.g., https://www.figma.com/design/<KEY>/...?node-id=1-2).",
            ),
            DfcError::FigmaApi { status, message } => ErrorPayload::new(
                ErrorCategory::Figma,
                format!("Figma API error (status {:?}): {}", status, message),
                "Check FIGMA_TOKEN/URL and rate limits; retry after waiting.",
            ),
            DfcError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Input,
                e.to_string(),
                "Check the design node JSON; it must be a node object or a Figma nodes response.",
            ),
            DfcError::InvalidInput(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("geometry") || lower.contains("bounding box") {
                    ErrorPayload::new(
                        ErrorCategory::Input,
                        msg.to_string(),
                        "Export the node with absoluteBoundingBox data, or select a node whose children carry geometry.",
                    )
                } else if lower.contains("node") && lower.contains("not found") {
                    ErrorPayload::new(
                        ErrorCategory::Input,
                        msg.to_string(),
                        "Check --node-id against the ids present in the input tree.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Input,
                        msg.to_string(),
                        "Inspect the input tree; run with --verbose for details.",
                    )
                }
            }
            DfcError::Generation(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("timed out") || lower.contains("timeout") {
                    ErrorPayload::new(
                        ErrorCategory::Generation,
                        msg.to_string(),
                        "Increase codegen.timeout in the config file or check the generation service health.",
                    )
                } else if lower.contains("no codegen backend") {
                    ErrorPayload::new(
                        ErrorCategory::Generation,
                        msg.to_string(),
                        "Set DFC_CODEGEN_URL, DFC_CODEGEN_CMD, or DFC_MOCK_CODE.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Generation,
                        msg.to_string(),
                        "Check the generation service response; the core does not retry.",
                    )
                }
            }
            DfcError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("figma_token") || lower.contains("figma token") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Set FIGMA_TOKEN (or FIGMA_OAUTH_TOKEN) before running Figma inputs.",
                    )
                } else if lower.contains("node-id") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Include a Figma node-id in the URL (e.g., ?node-id=1-2) or pass --node-id explicitly.",
                    )
                } else if lower.contains("file not found") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Verify the file exists; use an absolute path or run from the working directory.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths and the config file values.",
                    )
                }
            }
            DfcError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, DfcError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Network,
    Figma,
    Input,
    Generation,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_payload_mentions_geometry_export() {
        let err = DfcError::invalid_input("root node 1:2 has no resolvable geometry");
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Input);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("absoluteBoundingBox"),
            "expected geometry remediation, got: {remediation}"
        );
    }

    #[test]
    fn invalid_input_payload_points_at_node_id_flag() {
        let err = DfcError::invalid_input("node 9:9 not found in tree");
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("--node-id"),
            "expected node-id remediation, got: {remediation}"
        );
    }

    #[test]
    fn generation_timeout_payload_mentions_timeout_config() {
        let err = DfcError::generation("generation call timed out after 60s");
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Generation);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("codegen.timeout"),
            "expected timeout remediation, got: {remediation}"
        );
    }

    #[test]
    fn generation_missing_backend_lists_env_vars() {
        let err = DfcError::generation("No codegen backend configured");
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(remediation.contains("DFC_CODEGEN_URL"));
        assert!(remediation.contains("DFC_MOCK_CODE"));
    }

    #[test]
    fn config_payload_includes_figma_token_remediation() {
        let err = DfcError::Config("FIGMA_TOKEN environment variable is required".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("FIGMA_TOKEN"),
            "expected FIGMA token remediation, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_uses_default_remediation_for_other_messages() {
        let err = DfcError::Config("Some other config issue".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("Check flags/paths"),
            "expected default remediation for generic config errors"
        );
    }
}
