use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::process::ExitCode;

use dfc_lib::output::DFC_OUTPUT_VERSION;
use dfc_lib::types::Severity;
use dfc_lib::{CorrectionOutput, DfcError, DfcOutput, ErrorOutput, LayoutAnalysis};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &DfcOutput,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body)?,
        OutputFormat::Pretty => write_pretty_output(body)?,
    };
    Ok(())
}

/// Write the body and pick the exit code for it.
pub fn finish(body: DfcOutput, format: OutputFormat) -> ExitCode {
    if let Err(err) = write_output(&body, format) {
        return render_error(DfcError::Unknown(format!("Failed to write output: {err}")), format);
    }
    exit_code_for_output(&body)
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: DfcError, format: OutputFormat) -> ExitCode {
    let error_payload = err.to_payload();
    let payload = DfcOutput::Error(ErrorOutput {
        version: DFC_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            println!("{content}");
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    // Exit code 2 is reserved for errors; residual mismatches use 1.
    ExitCode::from(2)
}

fn write_json_output(body: &DfcOutput) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    println!("{content}");
    Ok(())
}

fn write_pretty_output(body: &DfcOutput) -> io::Result<()> {
    if std::io::stdout().is_terminal() {
        println!("{}", format_pretty(body, true));
        return Ok(());
    }

    // Not a terminal: keep the JSON shape for pipelines.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    println!("{content}");
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &DfcOutput, colorize: bool) -> String {
    let mut buf = String::new();
    match body {
        DfcOutput::Classify(out) => {
            let c = &out.classification;
            let header = color("[CLASSIFY]", "36", colorize);
            writeln!(buf, "{} {} ({})", header, out.node_id, out.input.value).ok();
            let confidence = color(
                &format!("{}%", c.confidence),
                confidence_color_code(c.confidence),
                colorize,
            );
            writeln!(
                buf,
                "Component: {} (confidence {}, library {:?})",
                c.component_type, confidence, c.suggested_library
            )
            .ok();
            if !c.reasoning.is_empty() {
                writeln!(buf, "Reasons:").ok();
                for reason in &c.reasoning {
                    writeln!(buf, "- {reason}").ok();
                }
            }
        }
        DfcOutput::Analyze(out) => {
            let header = color("[ANALYZE]", "34", colorize);
            writeln!(buf, "{} {} ({})", header, out.node_id, out.input.value).ok();
            writeln!(buf, "Children:").ok();
            write_layout(&mut buf, &out.layout);
            if out.siblings.parent_id.is_some() {
                writeln!(buf, "Siblings:").ok();
                write_layout(&mut buf, &out.siblings);
            }
        }
        DfcOutput::Correct(out) => write_correction(&mut buf, "[CORRECT]", out, colorize),
        DfcOutput::Generate(out) => write_correction(&mut buf, "[GENERATE]", out, colorize),
        DfcOutput::Error(out) => {
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
        }
    }
    buf
}

fn write_layout(buf: &mut String, layout: &LayoutAnalysis) {
    writeln!(
        buf,
        "  complexity {:?}, {} alignment groups",
        layout.complexity,
        layout.alignment_groups.iter().count()
    )
    .ok();
    if let Some(spacing) = &layout.patterns.consistent_spacing {
        writeln!(
            buf,
            "  {} spacing {}px ({:.0}% of {} gaps)",
            spacing.direction,
            spacing.value,
            spacing.support * 100.0,
            spacing.measured_gaps
        )
        .ok();
    }
    if let Some(grid) = &layout.patterns.grid_pattern {
        writeln!(buf, "  grid {}x{}", grid.rows, grid.columns).ok();
    }
    for recommendation in &layout.recommendations {
        writeln!(buf, "  - {recommendation}").ok();
    }
}

fn write_correction(buf: &mut String, label: &str, out: &CorrectionOutput, colorize: bool) {
    let result = &out.result;
    let (status, code) = if result.is_exact() {
        ("EXACT", "32")
    } else {
        ("MISMATCH", "31")
    };
    writeln!(
        buf,
        "{} {} {} ({})",
        color(label, "36", colorize),
        color(status, code, colorize),
        result.node_id,
        out.input.value
    )
    .ok();
    writeln!(
        buf,
        "Component: {} (confidence {}%)",
        result.classification.component_type, result.classification.confidence
    )
    .ok();
    writeln!(buf, "Accessibility score: {}", result.accessibility.score).ok();
    if let Some(contrast) = &result.accessibility.contrast {
        writeln!(
            buf,
            "Contrast: {:.2}:1 ({} on {}){}",
            contrast.ratio,
            contrast.foreground,
            contrast.background,
            if contrast.meets_aa { "" } else { " below AA" }
        )
        .ok();
    }

    let failed: Vec<_> = result.failed_stages().collect();
    if !failed.is_empty() {
        writeln!(buf, "Skipped stages:").ok();
        for stage in failed {
            writeln!(
                buf,
                "- {}: {}",
                stage.stage,
                stage.error.as_deref().unwrap_or("failed")
            )
            .ok();
        }
    }

    let mismatches = &result.report.mismatches;
    if !mismatches.is_empty() {
        writeln!(buf, "Mismatches (max 10):").ok();
        for mismatch in mismatches.iter().take(10) {
            let code = match mismatch.severity {
                Severity::High => "31",
                Severity::Medium => "33",
            };
            let tag = color(&format!("{:?}", mismatch.severity), code, colorize);
            writeln!(buf, "- [{tag}] {mismatch}").ok();
        }
    }
    for warning in &result.warnings {
        writeln!(buf, "Note: {warning}").ok();
    }
    if let Some(path) = &out.output_path {
        writeln!(buf, "Written to {}", path.display()).ok();
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

fn confidence_color_code(confidence: u8) -> &'static str {
    if confidence >= 90 {
        "32" // green
    } else if confidence >= 70 {
        "33" // yellow
    } else {
        "31" // red
    }
}

/// Residual mismatches exit 1; everything else that rendered exits 0.
pub fn exit_code_for_output(body: &DfcOutput) -> ExitCode {
    if body.has_residual_mismatches() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dfc_lib::output::{ClassifyOutput, ResourceDescriptor};
    use dfc_lib::types::{
        AccessibilityReport, ClassificationResult, ComponentType, CorrectionReport, Mismatch,
        MismatchKind, Stage, StageStatus,
    };
    use dfc_lib::{ErrorCategory, ErrorPayload, PipelineOutput, ResourceKind};
    use std::path::PathBuf;

    fn input() -> ResourceDescriptor {
        ResourceDescriptor {
            kind: ResourceKind::Json,
            value: "button.json".to_string(),
        }
    }

    fn correction(is_exact: bool) -> DfcOutput {
        let mismatches = if is_exact {
            Vec::new()
        } else {
            vec![Mismatch {
                kind: MismatchKind::Value,
                property: "left".to_string(),
                element: "r2".to_string(),
                expected_value: "140px".to_string(),
                actual_value: Some("150px".to_string()),
                delta: Some(10.0),
                severity: Severity::High,
            }]
        };
        DfcOutput::Correct(CorrectionOutput {
            version: DFC_OUTPUT_VERSION.to_string(),
            input: input(),
            output_path: Some(PathBuf::from("fixed.tsx")),
            result: PipelineOutput {
                node_id: "frame".to_string(),
                classification: ClassificationResult::overridden(ComponentType::Container),
                layout: serde_json::from_value(serde_json::json!({
                    "parentId": "frame",
                    "alignmentGroups": {},
                    "patterns": { "consistentSpacing": null, "gridPattern": null,
                                  "flexboxCandidate": { "isCandidate": false } },
                    "complexity": "simple",
                    "hints": ""
                }))
                .expect("layout"),
                markup: "<div />".to_string(),
                accessibility: AccessibilityReport {
                    semantic_html: true,
                    aria_attributes: false,
                    keyboard_accessible: true,
                    contrast: None,
                    issues: Vec::new(),
                    failures: Vec::new(),
                    score: 90,
                },
                report: CorrectionReport {
                    mismatches,
                    corrected: "<div />".to_string(),
                    is_exact,
                },
                stages: vec![StageStatus {
                    stage: Stage::ContrastCheck,
                    succeeded: false,
                    error: Some("no solid fill on node or parent".to_string()),
                }],
                warnings: vec!["Using DFC_MOCK_CODE; external codegen not invoked.".to_string()],
            },
        })
    }

    #[test]
    fn exit_code_maps_exactness() {
        assert_eq!(exit_code_for_output(&correction(true)), ExitCode::SUCCESS);
        assert_eq!(exit_code_for_output(&correction(false)), ExitCode::from(1));
    }

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let code = render_error(DfcError::Config("boom".to_string()), OutputFormat::Json);
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn format_pretty_lists_stages_and_mismatches() {
        let pretty = format_pretty(&correction(false), false);
        assert!(pretty.starts_with("[CORRECT] MISMATCH frame (button.json)"));
        assert!(pretty.contains("Component: container (confidence 100%)"));
        assert!(pretty.contains("- contrast-check: no solid fill on node or parent"));
        assert!(pretty.contains("[High] mismatch left on r2: expected 140px, got 150px"));
        assert!(pretty.contains("Note: Using DFC_MOCK_CODE"));
        assert!(pretty.contains("Written to fixed.tsx"));
    }

    #[test]
    fn format_pretty_classify() {
        let mut classification = ClassificationResult::overridden(ComponentType::Button);
        classification.confidence = 75;
        let output = DfcOutput::Classify(ClassifyOutput {
            version: DFC_OUTPUT_VERSION.to_string(),
            input: input(),
            node_id: "btn".to_string(),
            classification,
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[CLASSIFY] btn (button.json)"));
        assert!(pretty.contains("Component: button (confidence 75%"));
        assert!(pretty.contains("- component type supplied by caller"));
    }

    #[test]
    fn format_pretty_handles_errors() {
        let output = DfcOutput::Error(ErrorOutput {
            version: DFC_OUTPUT_VERSION.to_string(),
            message: Some("bad input".to_string()),
            error: ErrorPayload {
                category: ErrorCategory::Input,
                message: "bad input".to_string(),
                remediation: Some("check --node-id".to_string()),
            },
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[ERROR] bad input"));
        assert!(pretty.contains("Hint: check --node-id"));
    }
}
