use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ErrorPayload;
use crate::pipeline::PipelineOutput;
use crate::resource::ResourceKind;
use crate::types::{ClassificationResult, LayoutAnalysis};

/// Schema version for output payloads.
pub const DFC_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DfcOutput {
    Classify(ClassifyOutput),
    Analyze(AnalyzeOutput),
    Correct(CorrectionOutput),
    Generate(CorrectionOutput),
    Error(ErrorOutput),
}

impl DfcOutput {
    /// Whether the command produced a correction that still diverges.
    pub fn has_residual_mismatches(&self) -> bool {
        match self {
            DfcOutput::Correct(out) | DfcOutput::Generate(out) => !out.result.is_exact(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyOutput {
    pub version: String,
    pub input: ResourceDescriptor,
    pub node_id: String,
    pub classification: ClassificationResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOutput {
    pub version: String,
    pub input: ResourceDescriptor,
    pub node_id: String,
    /// The node's own children.
    pub layout: LayoutAnalysis,
    /// The sibling set the node belongs to.
    pub siblings: LayoutAnalysis,
}

/// Shared by the `correct` and `generate` modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionOutput {
    pub version: String,
    pub input: ResourceDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(flatten)]
    pub result: PipelineOutput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::fixtures::{toolbar_row, tree};
    use crate::pipeline::Pipeline;
    use crate::types::ComponentType;

    fn json_input() -> ResourceDescriptor {
        ResourceDescriptor {
            kind: ResourceKind::Json,
            value: "toolbar.json".to_string(),
        }
    }

    #[test]
    fn classify_output_serializes() {
        let output = DfcOutput::Classify(ClassifyOutput {
            version: DFC_OUTPUT_VERSION.to_string(),
            input: json_input(),
            node_id: "btn".to_string(),
            classification: ClassificationResult::overridden(ComponentType::Button),
        });

        let json = serde_json::to_string(&output).expect("serialize classify output");
        assert!(json.contains("\"mode\":\"classify\""));
        assert!(json.contains("\"componentType\":\"button\""));
        assert!(json.contains("\"kind\":\"json\""));
    }

    #[test]
    fn correction_output_flattens_pipeline_fields() {
        let tree = tree(toolbar_row());
        let id = tree.root().id.clone();
        let result = Pipeline::default()
            .run_with_markup(&tree, &id, "<div />", None)
            .expect("pipeline output");
        let output = DfcOutput::Correct(CorrectionOutput {
            version: DFC_OUTPUT_VERSION.to_string(),
            input: json_input(),
            output_path: None,
            result,
        });

        let value = serde_json::to_value(&output).expect("serialize correct output");
        assert_eq!(value["mode"], "correct");
        assert_eq!(value["nodeId"], id.as_str());
        assert!(value["report"]["isExact"].is_boolean());
        assert!(value["stages"].is_array());
        assert!(value.get("outputPath").is_none());

        let back: DfcOutput = serde_json::from_value(value).expect("round trip");
        assert!(matches!(back, DfcOutput::Correct(_)));
    }

    #[test]
    fn error_output_serializes() {
        let output = DfcOutput::Error(ErrorOutput {
            version: DFC_OUTPUT_VERSION.to_string(),
            message: Some("boom".to_string()),
            error: ErrorPayload::new(ErrorCategory::Generation, "boom".to_string(), "retry"),
        });

        let json = serde_json::to_string(&output).expect("serialize error output");
        assert!(json.contains("\"mode\":\"error\""));
        assert!(json.contains("\"category\":\"generation\""));
        assert!(!output.has_residual_mismatches());
    }
}
