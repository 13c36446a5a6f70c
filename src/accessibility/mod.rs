//! Semantic and accessibility enhancement of generated markup.
//!
//! Four ordered passes run over the markup. A pass that fails is recorded
//! and skipped; the next pass sees the markup from before the failure. A
//! final structural audit feeds the deduction-based score.

mod contrast;
mod passes;

pub use contrast::{check as check_contrast, check_colors, contrast_ratio, relative_luminance};
pub use passes::{
    alt_text_for, aria_label_for, component_attributes, expected_tag, keyboard_accessibility,
    semantic_substitution,
};

use tracing::{debug, warn};

use crate::config::ContrastConfig;
use crate::markup::{scan, StageError};
use crate::types::{
    AccessibilityReport, ClassificationResult, ComponentType, DesignNode, Stage, StageFailure,
};

const CONTRAST_PENALTY: u8 = 15;
const ISSUE_PENALTY: u8 = 5;

/// Markup after enhancement, with its report.
#[derive(Debug, Clone, PartialEq)]
pub struct Enhanced {
    pub markup: String,
    pub report: AccessibilityReport,
}

#[derive(Debug, Clone, Default)]
pub struct AccessibilityTransformer {
    contrast: ContrastConfig,
}

impl AccessibilityTransformer {
    pub fn new(contrast: ContrastConfig) -> Self {
        Self { contrast }
    }

    /// Run the four passes and the audit.
    ///
    /// `parent` supplies the background for the contrast check.
    pub fn enhance(
        &self,
        markup: &str,
        classification: &ClassificationResult,
        node: &DesignNode,
        parent: Option<&DesignNode>,
    ) -> Enhanced {
        let component = classification.component_type;
        let mut failures = Vec::new();
        let mut current = markup.to_string();

        let semantic_html =
            run_pass(Stage::SemanticSubstitution, &mut current, &mut failures, |src| {
                semantic_substitution(src, component, node)
            });
        let aria_attributes =
            run_pass(Stage::ComponentAttributes, &mut current, &mut failures, |src| {
                component_attributes(src, component, node)
            });
        let keyboard_accessible =
            run_pass(Stage::KeyboardAccessibility, &mut current, &mut failures, |src| {
                keyboard_accessibility(src, component)
            });

        let contrast = check_contrast(node, parent, &self.contrast);
        if contrast.is_none() {
            debug!(node = %node.id, "contrast skipped; no solid fill on node or parent");
        }

        let issues = audit(&current, component, node);
        let mut score = 100u8;
        if contrast.as_ref().is_some_and(|c| !c.meets_aa) {
            score = score.saturating_sub(CONTRAST_PENALTY);
        }
        let deduction = issues.len().saturating_mul(usize::from(ISSUE_PENALTY));
        score = score.saturating_sub(u8::try_from(deduction).unwrap_or(u8::MAX));

        debug!(node = %node.id, score, issues = issues.len(), "accessibility enhancement done");
        Enhanced {
            markup: current,
            report: AccessibilityReport {
                semantic_html,
                aria_attributes,
                keyboard_accessible,
                contrast,
                issues,
                failures,
                score,
            },
        }
    }
}

fn run_pass(
    stage: Stage,
    current: &mut String,
    failures: &mut Vec<StageFailure>,
    pass: impl FnOnce(&str) -> Result<String, StageError>,
) -> bool {
    match pass(current.as_str()) {
        Ok(next) => {
            *current = next;
            true
        }
        Err(err) => {
            warn!(%stage, error = %err, "accessibility pass skipped");
            failures.push(StageFailure {
                stage,
                message: err.to_string(),
            });
            false
        }
    }
}

/// Residual structural problems in the final markup.
pub fn audit(markup: &str, component: ComponentType, node: &DesignNode) -> Vec<String> {
    let elements = scan(markup);
    let mut issues = Vec::new();
    if elements.is_empty() {
        issues.push("no element in markup".to_string());
        return issues;
    }

    if let Some(tag) = expected_tag(component) {
        if !elements.iter().any(|e| e.tag == tag) {
            issues.push(format!("missing <{tag}> element for {component}"));
        }
    }

    for element in &elements {
        match element.tag.as_str() {
            "button" => {
                let named = element.has_text()
                    || element.has_attribute("aria-label")
                    || element.has_attribute("aria-labelledby")
                    || elements
                        .iter()
                        .any(|c| c.parent == Some(element.index) && c.has_text());
                if !named {
                    issues.push("button without an accessible name".to_string());
                }
            }
            "img" if element.attr_value("alt").map_or(true, |a| a.trim().is_empty()) => {
                issues.push("img without alt text".to_string());
            }
            "input" => {
                if passes::name_signals_required(&node.name)
                    && !element.has_attribute("aria-required")
                {
                    issues.push("required input without aria-required".to_string());
                }
            }
            _ => {}
        }
        if passes::needs_focus(markup, element) {
            issues.push(format!("pointer-styled <{}> is not keyboard focusable", element.tag));
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{button, frame};
    use crate::types::{Color, Fill};

    fn page(color: Color) -> DesignNode {
        frame("page", "Page", 0.0, 0.0, 800.0, 600.0).with_fill(Fill::solid(color))
    }

    #[test]
    fn clickable_div_button_is_fully_enhanced() {
        let node = button("b", "Submit button");
        let classification = ClassificationResult::overridden(ComponentType::Button);
        let markup =
            "<div onClick={submit} style={{ cursor: 'pointer', width: '120px' }}>Submit</div>";

        let enhanced = AccessibilityTransformer::default().enhance(
            markup,
            &classification,
            &node,
            Some(&page(Color::rgb(255, 255, 255))),
        );

        assert_eq!(
            enhanced.markup,
            concat!(
                "<button onClick={submit} style={{ cursor: 'pointer', width: '120px' }} ",
                "type=\"button\">Submit</button>"
            )
        );
        let report = &enhanced.report;
        assert!(report.semantic_html && report.aria_attributes && report.keyboard_accessible);
        assert!(report.failures.is_empty());
        assert!(report.issues.is_empty(), "{:?}", report.issues);
        assert!(report.contrast.as_ref().is_some_and(|c| c.meets_aa));
        assert_eq!(report.score, 100);
    }

    #[test]
    fn failed_contrast_and_issues_reduce_score() {
        let node = frame("card", "Card", 0.0, 0.0, 300.0, 200.0)
            .with_fill(Fill::solid(Color::rgb(119, 119, 119)));
        let classification = ClassificationResult::overridden(ComponentType::Card);
        // Single leaf: no corroborating signals, so no <article> and one issue.
        let enhanced = AccessibilityTransformer::default().enhance(
            "<div />",
            &classification,
            &node,
            Some(&page(Color::rgb(136, 136, 136))),
        );

        assert_eq!(enhanced.markup, "<div />");
        assert_eq!(enhanced.report.issues, vec!["missing <article> element for card"]);
        assert_eq!(enhanced.report.score, 100 - 15 - 5);
    }

    #[test]
    fn empty_markup_records_failures_and_continues() {
        let node = button("b", "Button");
        let enhanced = AccessibilityTransformer::default().enhance(
            "",
            &ClassificationResult::overridden(ComponentType::Button),
            &node,
            None,
        );
        let stages: Vec<Stage> = enhanced.report.failures.iter().map(|f| f.stage).collect();
        assert_eq!(
            stages,
            vec![
                Stage::SemanticSubstitution,
                Stage::ComponentAttributes,
                Stage::KeyboardAccessibility
            ]
        );
        assert!(!enhanced.report.semantic_html);
        assert!(enhanced.report.contrast.is_none());
        assert_eq!(enhanced.markup, "");
        assert_eq!(enhanced.report.score, 95);
    }

    #[test]
    fn audit_flags_unfocusable_pointer_elements() {
        let issues = audit(
            "<section><span style={{ cursor: 'pointer' }}>More</span><img src=\"a\" /></section>",
            ComponentType::Container,
            &frame("c", "Container", 0.0, 0.0, 10.0, 10.0),
        );
        assert_eq!(
            issues,
            vec![
                "pointer-styled <span> is not keyboard focusable".to_string(),
                "img without alt text".to_string()
            ]
        );
    }
}
