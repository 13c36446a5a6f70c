//! Read-only cross-validation of corrected markup against the design.

use tracing::debug;

use crate::config::{AlignmentConfig, ValidationConfig};
use crate::layout::LayoutAnalyzer;
use crate::markup::{format_px, match_elements, root_element, scan, Style};
use crate::types::{
    AlignmentEdge, CorrectionReport, DesignNode, Mismatch, MismatchKind, Severity, SubtreeLayout,
};

#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
    analyzer: LayoutAnalyzer,
}

impl Validator {
    pub fn new(config: ValidationConfig, alignment: AlignmentConfig) -> Self {
        Self {
            config,
            analyzer: LayoutAnalyzer::new(alignment),
        }
    }

    pub fn validate(&self, markup: &str, node: &DesignNode) -> CorrectionReport {
        let layout = self.analyzer.analyze_subtree(node);
        self.validate_with_layout(markup, node, &layout)
    }

    pub fn validate_with_layout(
        &self,
        markup: &str,
        node: &DesignNode,
        layout: &SubtreeLayout,
    ) -> CorrectionReport {
        let mut mismatches = Vec::new();
        let elements = scan(markup);

        let Some(root) = root_element(&elements).map(|e| e.index) else {
            mismatches.push(Mismatch {
                kind: MismatchKind::Value,
                property: "element".to_string(),
                element: node.id.clone(),
                expected_value: "root element".to_string(),
                actual_value: None,
                delta: None,
                severity: Severity::High,
            });
            return report(markup, mismatches);
        };

        let matches = match_elements(&elements, node);
        for missing in matches.missing() {
            mismatches.push(Mismatch {
                kind: MismatchKind::MissingElement,
                property: "element".to_string(),
                element: missing.id.clone(),
                expected_value: format!("element for {:?}", missing.name),
                actual_value: None,
                delta: None,
                severity: Severity::High,
            });
        }

        let mut emitted: Vec<(&str, Style)> = Vec::new();
        for element in &elements {
            let index = element.index;
            let anchor = matches.anchor(index);
            if index != root && (anchor.is_none() || matches.is_content(index)) {
                continue;
            }
            let style = element.style(markup).unwrap_or_default();
            let Some(matched) = matches.node_for(index) else {
                // Unmatched descendant: named by tag and position.
                let label = format!("<{}>#{}", element.tag, index);
                self.require_absolute(&mut mismatches, &label, &style);
                if let Some(anchor) = anchor.filter(|_| matches.is_wrapper(index)) {
                    let ab = anchor.bounding_box;
                    self.compare(&mut mismatches, &label, &style, "left", 0.0, true);
                    self.compare(&mut mismatches, &label, &style, "top", 0.0, true);
                    self.compare(&mut mismatches, &label, &style, "width", ab.width, false);
                    self.compare(&mut mismatches, &label, &style, "height", ab.height, false);
                }
                continue;
            };

            let bb = matched.bounding_box;
            match anchor {
                None => {
                    if let Some(position @ ("absolute" | "fixed")) = style.get("position") {
                        mismatches.push(Mismatch {
                            kind: MismatchKind::Value,
                            property: "position".to_string(),
                            element: matched.id.clone(),
                            expected_value: "relative".to_string(),
                            actual_value: Some(position.to_string()),
                            delta: None,
                            severity: Severity::High,
                        });
                    }
                }
                Some(anchor) => {
                    self.require_absolute(&mut mismatches, &matched.id, &style);
                    let ab = anchor.bounding_box;
                    let id = matched.id.as_str();
                    self.compare(&mut mismatches, id, &style, "left", bb.x - ab.x, true);
                    self.compare(&mut mismatches, id, &style, "top", bb.y - ab.y, true);
                }
            }
            self.compare(&mut mismatches, &matched.id, &style, "width", bb.width, false);
            self.compare(&mut mismatches, &matched.id, &style, "height", bb.height, false);
            emitted.push((matched.id.as_str(), style));
        }

        for (_, group) in layout.groups() {
            let property = match group.edge {
                AlignmentEdge::Top => "top",
                AlignmentEdge::Left => "left",
                _ => continue,
            };
            let values: Vec<(&str, &str)> = group
                .node_ids
                .iter()
                .filter_map(|id| {
                    let (_, style) = emitted.iter().find(|(seen, _)| *seen == id.as_str())?;
                    style.get(property).map(|v| (id.as_str(), v))
                })
                .collect();
            let Some((_, first)) = values.first() else {
                continue;
            };
            if let Some((_, differing)) = values.iter().find(|(_, v)| v != first) {
                let delta = match (px(first), px(differing)) {
                    (Some(a), Some(b)) => Some((a - b).abs()),
                    _ => None,
                };
                mismatches.push(Mismatch {
                    kind: MismatchKind::AlignmentGroupViolation,
                    property: property.to_string(),
                    element: group.node_ids.join(","),
                    expected_value: first.to_string(),
                    actual_value: Some(differing.to_string()),
                    delta,
                    severity: Severity::High,
                });
            }
        }

        debug!(node = %node.id, mismatches = mismatches.len(), "validated markup");
        report(markup, mismatches)
    }

    fn require_absolute(&self, mismatches: &mut Vec<Mismatch>, element: &str, style: &Style) {
        let position = style.get("position");
        if position != Some("absolute") {
            mismatches.push(Mismatch {
                kind: MismatchKind::Value,
                property: "position".to_string(),
                element: element.to_string(),
                expected_value: "absolute".to_string(),
                actual_value: position.map(str::to_string),
                delta: None,
                severity: Severity::High,
            });
        }
    }

    /// Compare one pixel property; `required` properties are also reported
    /// when missing.
    fn compare(
        &self,
        mismatches: &mut Vec<Mismatch>,
        element: &str,
        style: &Style,
        property: &str,
        expected: f64,
        required: bool,
    ) {
        let raw = style.get(property);
        let actual = style.px(property);
        let (delta, severity) = match (raw, actual) {
            (None, _) if !required => return,
            (None, _) => (None, Severity::High),
            (Some(_), Some(actual)) => {
                let delta = (actual - expected).abs();
                if delta <= self.config.tolerance {
                    return;
                }
                let severity = if delta > self.config.high_severity {
                    Severity::High
                } else {
                    Severity::Medium
                };
                (Some(delta), severity)
            }
            (Some(_), None) => (None, if required { Severity::High } else { Severity::Medium }),
        };
        mismatches.push(Mismatch {
            kind: MismatchKind::Value,
            property: property.to_string(),
            element: element.to_string(),
            expected_value: format_px(expected),
            actual_value: raw.map(str::to_string),
            delta,
            severity,
        });
    }
}

fn px(value: &str) -> Option<f64> {
    let value = value.trim();
    value.strip_suffix("px").unwrap_or(value).trim().parse().ok()
}

fn report(markup: &str, mismatches: Vec<Mismatch>) -> CorrectionReport {
    CorrectionReport {
        is_exact: mismatches.is_empty(),
        mismatches,
        corrected: markup.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enforcer::Enforcer;
    use crate::fixtures::toolbar_row;

    fn find<'a>(
        report: &'a CorrectionReport,
        element: &str,
        property: &str,
    ) -> Option<&'a Mismatch> {
        report
            .mismatches
            .iter()
            .find(|m| m.element == element && m.property == property)
    }

    #[test]
    fn enforced_markup_validates_clean() {
        let root = toolbar_row();
        let corrected = Enforcer::default()
            .enforce("<div><div /><div /><div /></div>", &root)
            .expect("enforce");
        let report = Validator::default().validate(&corrected, &root);
        assert!(report.is_exact, "{:?}", report.mismatches);
        assert_eq!(report.corrected, corrected);
    }

    #[test]
    fn deltas_are_graded_by_size() {
        let child = |left: u32, width: u32| {
            format!(
                "  <div style={{{{ position: 'absolute', left: '{left}px', top: '10px', \
                 width: '{width}px', height: '40px' }}}} />\n"
            )
        };
        let markup = format!(
            "<div style={{{{ position: 'relative', width: '400px', height: '60px' }}}}>\n\
             {}{}{}</div>",
            child(21, 100),
            child(143, 100),
            child(260, 112)
        );
        let markup = markup.as_str();
        let report = Validator::default().validate(markup, &toolbar_row());

        assert!(!report.is_exact);
        assert!(find(&report, "r1", "left").is_none(), "1px is within tolerance");
        let r2 = find(&report, "r2", "left").expect("r2 left");
        assert_eq!(r2.severity, Severity::Medium);
        assert_eq!(r2.delta, Some(3.0));
        assert_eq!(r2.expected_value, "140px");
        assert_eq!(r2.actual_value.as_deref(), Some("143px"));
        let r3 = find(&report, "r3", "width").expect("r3 width");
        assert_eq!(r3.severity, Severity::High);
        assert_eq!(report.mismatches.len(), 2);
    }

    #[test]
    fn group_divergence_is_a_violation_even_within_tolerance() {
        let markup = r#"<div style={{ width: '400px', height: '60px' }}>
  <div style={{ position: 'absolute', left: '20px', top: '10px' }} />
  <div style={{ position: 'absolute', left: '140px', top: '11px' }} />
  <div style={{ position: 'absolute', left: '260px', top: '10px' }} />
</div>"#;
        let report = Validator::default().validate(markup, &toolbar_row());
        assert_eq!(report.mismatches.len(), 1);
        let violation = &report.mismatches[0];
        assert_eq!(violation.kind, MismatchKind::AlignmentGroupViolation);
        assert_eq!(violation.property, "top");
        assert_eq!(violation.element, "r1,r2,r3");
        assert_eq!(violation.actual_value.as_deref(), Some("11px"));
        assert_eq!(violation.severity, Severity::High);
    }

    #[test]
    fn missing_positioning_is_high_severity() {
        let markup = "<div style={{ position: 'absolute' }}><div /><div /><div /></div>";
        let report = Validator::default().validate(markup, &toolbar_row());
        let root = find(&report, "frame", "position").expect("root position");
        assert_eq!(root.actual_value.as_deref(), Some("absolute"));
        let left = find(&report, "r1", "left").expect("r1 left");
        assert_eq!(left.severity, Severity::High);
        assert!(left.actual_value.is_none());
        assert!(find(&report, "r1", "position").is_some());
        assert!(find(&report, "r1", "width").is_none());
    }

    #[test]
    fn wrapped_children_are_checked_through_the_wrapper() {
        let root = toolbar_row();
        let src = concat!(
            "<div className=\"toolbar\">",
            "<div className=\"row flex gap-5\"><div/><div/><div/></div>",
            "</div>"
        );
        let raw = Validator::default().validate(src, &root);
        assert!(!raw.is_exact);
        assert!(find(&raw, "<div>#1", "position").is_some());
        assert_eq!(find(&raw, "r2", "left").map(|m| m.severity), Some(Severity::High));

        let corrected = Enforcer::default().enforce(src, &root).expect("enforce");
        let report = Validator::default().validate(&corrected, &root);
        assert!(report.is_exact, "{:?}\n{corrected}", report.mismatches);
    }

    #[test]
    fn unrendered_design_children_are_missing_elements() {
        let src = "<div><div /><div /><div /><span>extra</span></div>";
        let report = Validator::default().validate(src, &toolbar_row());
        assert!(!report.is_exact);
        let missing: Vec<&str> = report
            .mismatches
            .iter()
            .filter(|m| m.kind == MismatchKind::MissingElement)
            .map(|m| m.element.as_str())
            .collect();
        assert_eq!(missing, vec!["r1", "r2", "r3"]);
        assert!(report
            .mismatches
            .iter()
            .filter(|m| m.kind == MismatchKind::MissingElement)
            .all(|m| m.severity == Severity::High));
        assert!(find(&report, "<span>#4", "position").is_some());
    }

    #[test]
    fn markup_without_elements_is_not_exact() {
        let report = Validator::default().validate("nothing here", &toolbar_row());
        assert!(!report.is_exact);
        assert_eq!(report.mismatches[0].property, "element");
    }
}
