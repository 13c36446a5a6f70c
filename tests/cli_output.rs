use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use dfc_lib::DfcOutput;
use serde_json::Value;
use tempfile::TempDir;

const BACKEND_VARS: [&str; 6] = [
    "DFC_MOCK_CODE",
    "DFC_MOCK_CODE_PATH",
    "DFC_CODEGEN_CMD",
    "DFC_CODEGEN_ARGS",
    "DFC_CODEGEN_URL",
    "DFC_CODEGEN_API_KEY",
];

fn asset(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test_assets")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

/// Runs the binary with a throwaway HOME and no backend configured.
fn dfc(args: &[&str], env: &[(&str, &str)]) -> Output {
    let home = TempDir::new().expect("home dir");
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dfc"));
    cmd.args(args).env("HOME", home.path()).env_remove("RUST_LOG");
    for var in BACKEND_VARS {
        cmd.env_remove(var);
    }
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().expect("run dfc")
}

fn json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|err| {
        panic!(
            "stdout should be one JSON document ({err}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn classify_reports_the_root_container() {
    let output = dfc(&["classify", "--input", &asset("toolbar.json")], &[]);
    assert_eq!(output.status.code(), Some(0));

    let body: DfcOutput = serde_json::from_slice(&output.stdout).expect("classify output");
    match body {
        DfcOutput::Classify(out) => {
            assert_eq!(out.node_id, "frame");
            assert_eq!(out.classification.component_type.to_string(), "container");
        }
        other => panic!("expected classify output, got {other:?}"),
    }
}

#[test]
fn classify_reads_figma_responses_and_descendant_ids() {
    let output = dfc(
        &["classify", "--input", &asset("button_figma.json"), "--node-id", "1:3"],
        &[],
    );
    assert_eq!(output.status.code(), Some(0));
    let body = json(&output);
    assert_eq!(body["mode"], "classify");
    assert_eq!(body["classification"]["componentType"], "button");
}

#[test]
fn analyze_reports_toolbar_spacing() {
    let output = dfc(&["analyze", "--input", &asset("toolbar.json")], &[]);
    assert_eq!(output.status.code(), Some(0));

    let body = json(&output);
    assert_eq!(body["mode"], "analyze");
    let layout = &body["layout"];
    let top = &layout["alignmentGroups"]["topAligned"][0];
    assert_eq!(top["nodeIds"].as_array().map(Vec::len), Some(3));
    assert_eq!(layout["patterns"]["consistentSpacing"]["value"], 20);
    assert_eq!(layout["patterns"]["flexboxCandidate"]["isCandidate"], true);
}

#[test]
fn correct_positions_markup_and_writes_output_file() {
    let dir = TempDir::new().expect("tempdir");
    let fixed = dir.path().join("fixed.tsx");
    let output = dfc(
        &[
            "correct",
            "--input",
            &asset("toolbar.json"),
            "--markup",
            &asset("toolbar.tsx"),
            "--output",
            fixed.to_str().unwrap(),
        ],
        &[],
    );
    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stdout));

    let body = json(&output);
    assert_eq!(body["mode"], "correct");
    assert_eq!(body["report"]["isExact"], true);
    assert_eq!(PathBuf::from(body["outputPath"].as_str().unwrap()), fixed);

    let written = std::fs::read_to_string(&fixed).expect("corrected markup");
    assert_eq!(written, body["markup"].as_str().unwrap());
    assert!(written.contains("left: '140px'"));
    assert!(written.contains("width: '100px'"));
}

#[test]
fn correct_exits_one_when_mismatches_remain() {
    let dir = TempDir::new().expect("tempdir");
    let markup = dir.path().join("notes.txt");
    std::fs::write(&markup, "no elements here").unwrap();

    let output = dfc(
        &[
            "correct",
            "--input",
            &asset("toolbar.json"),
            "--markup",
            markup.to_str().unwrap(),
        ],
        &[],
    );
    assert_eq!(output.status.code(), Some(1));
    let body = json(&output);
    assert_eq!(body["report"]["isExact"], false);
    assert!(body["stages"]
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["stage"] == "enforce" && s["succeeded"] == false));
}

#[test]
fn generate_uses_mock_code_from_env() {
    let mock = "```tsx\n<div>\n  <div />\n  <div />\n  <div />\n</div>\n```";
    let output = dfc(
        &["generate", "--input", &asset("toolbar.json")],
        &[("DFC_MOCK_CODE", mock)],
    );
    assert_eq!(output.status.code(), Some(0));

    let body = json(&output);
    assert_eq!(body["mode"], "generate");
    assert_eq!(body["report"]["isExact"], true);
    assert!(body["warnings"][0].as_str().unwrap().contains("DFC_MOCK_CODE"));
}

#[test]
fn generate_without_backend_is_a_generation_error() {
    let output = dfc(&["generate", "--input", &asset("toolbar.json")], &[]);
    assert_eq!(output.status.code(), Some(2));

    let body = json(&output);
    assert_eq!(body["mode"], "error");
    assert_eq!(body["error"]["category"], "generation");
    assert!(body["error"]["remediation"].as_str().unwrap().contains("DFC_CODEGEN_URL"));
}

#[test]
fn missing_input_and_unknown_node_exit_two() {
    let missing = dfc(&["classify", "--input", "/nonexistent/design.json"], &[]);
    assert_eq!(missing.status.code(), Some(2));
    assert_eq!(json(&missing)["error"]["category"], "config");

    let unknown = dfc(
        &["analyze", "--input", &asset("toolbar.json"), "--node-id", "nope"],
        &[],
    );
    assert_eq!(unknown.status.code(), Some(2));
    let body = json(&unknown);
    assert_eq!(body["error"]["category"], "input");
    assert!(body["error"]["remediation"].as_str().unwrap().contains("--node-id"));
}

#[test]
fn invalid_config_file_exits_two() {
    let dir = TempDir::new().expect("tempdir");
    let cfg = dir.path().join("dfc.toml");
    std::fs::write(&cfg, "[codegen]\ntimeout = \"not a duration\"\n").unwrap();

    let output = dfc(
        &["classify", "--input", &asset("toolbar.json"), "--config", cfg.to_str().unwrap()],
        &[],
    );
    assert_eq!(output.status.code(), Some(2));
    let body = json(&output);
    assert!(body["message"].as_str().unwrap().starts_with("Failed to read config"));
}
