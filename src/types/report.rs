//! Report types produced by the correction stages.
//!
//! - [`AccessibilityReport`] - outcome of the semantic/accessibility transformer
//! - [`CorrectionReport`] - residual mismatches found by the validator
//! - [`StageFailure`] - a pass that was skipped because its rewrite failed

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage names, used in failure records and stage summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    SemanticSubstitution,
    ComponentAttributes,
    KeyboardAccessibility,
    ContrastCheck,
    Enforce,
    Validate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::SemanticSubstitution => "semantic-substitution",
            Stage::ComponentAttributes => "component-attributes",
            Stage::KeyboardAccessibility => "keyboard-accessibility",
            Stage::ContrastCheck => "contrast-check",
            Stage::Enforce => "enforce",
            Stage::Validate => "validate",
        };
        write!(f, "{name}")
    }
}

/// A stage that failed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageFailure {
    pub stage: Stage,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageStatus {
    pub stage: Stage,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// WCAG contrast between a node's fill and its parent's fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastResult {
    pub ratio: f64,
    pub foreground: String,
    pub background: String,
    #[serde(rename = "meetsAA")]
    pub meets_aa: bool,
    #[serde(rename = "meetsAAA")]
    pub meets_aaa: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityReport {
    pub semantic_html: bool,
    pub aria_attributes: bool,
    pub keyboard_accessible: bool,
    pub contrast: Option<ContrastResult>,
    /// Residual problems found by the final structural check.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<StageFailure>,
    /// 0-100, deduction based.
    pub score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MismatchKind {
    Value,
    AlignmentGroupViolation,
    /// A design node that no markup element renders.
    MissingElement,
}

/// One divergence between emitted markup and the design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mismatch {
    pub kind: MismatchKind,
    pub property: String,
    /// Node id of the element (or the group description for group violations).
    pub element: String,
    pub expected_value: String,
    pub actual_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    pub severity: Severity,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} on {}: expected {}, got {}",
            match self.kind {
                MismatchKind::Value => "mismatch",
                MismatchKind::AlignmentGroupViolation => "alignment-group-violation",
                MismatchKind::MissingElement => "missing-element",
            },
            self.property,
            self.element,
            self.expected_value,
            self.actual_value.as_deref().unwrap_or("<missing>")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionReport {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mismatches: Vec<Mismatch>,
    pub corrected: String,
    pub is_exact: bool,
}
