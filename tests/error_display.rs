use dfc_lib::{DfcError, ErrorCategory};

#[test]
fn config_error_display_includes_message() {
    let err = DfcError::Config("missing markup file".to_string());

    assert_eq!(format!("{}", err), "Configuration error: missing markup file");
}

#[test]
fn io_error_display_wraps_source() {
    let io_err = std::io::Error::other("disk full");
    let err: DfcError = io_err.into();
    let rendered = format!("{}", err);

    assert!(rendered.starts_with("IO error: "));
    assert!(rendered.contains("disk full"));
}

#[test]
fn figma_api_helper_includes_status_and_message() {
    let err = DfcError::figma_api(Some(reqwest::StatusCode::NOT_FOUND), "not found");

    assert_eq!(
        format!("{}", err),
        "Figma API error (status: Some(404)): not found"
    );
}

#[test]
fn figma_api_helper_handles_missing_status() {
    let err = DfcError::figma_api(None, "missing token");

    assert_eq!(
        format!("{}", err),
        "Figma API error (status: None): missing token"
    );
}

#[test]
fn generation_helper_uses_message() {
    let err = DfcError::generation("generation call timed out after 60s");

    assert_eq!(
        format!("{}", err),
        "Generation service error: generation call timed out after 60s"
    );
    let payload = err.to_payload();
    assert_eq!(payload.category, ErrorCategory::Generation);
    assert!(payload.remediation.unwrap().contains("codegen.timeout"));
}

#[test]
fn invalid_input_names_missing_geometry() {
    let err = DfcError::invalid_input("root node frame has no geometry");

    assert_eq!(format!("{}", err), "Invalid input: root node frame has no geometry");
    assert_eq!(err.to_payload().category, ErrorCategory::Input);
}
