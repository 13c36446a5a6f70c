use std::path::PathBuf;
use std::process::ExitCode;

use dfc_lib::output::DFC_OUTPUT_VERSION;
use dfc_lib::{ClassifyOutput, DfcError, DfcOutput, Pipeline};
use tracing::info;

use super::load_input;
use crate::cli::OutputFormat;
use crate::formatting::{finish, render_error};
use crate::settings::load_config;

/// Run the classify command.
pub async fn run_classify(
    config_path: Option<PathBuf>,
    input: String,
    node_id: Option<String>,
    format: OutputFormat,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format),
    };
    let (descriptor, design) = match load_input(&input, node_id.as_deref()).await {
        Ok(loaded) => loaded,
        Err(err) => return render_error(err, format),
    };
    let node = match design.tree.get(&design.node_id) {
        Some(node) => node,
        None => {
            return render_error(
                DfcError::invalid_input(format!("node {} not found in tree", design.node_id)),
                format,
            )
        }
    };

    let classification = Pipeline::new(config).classify(node);
    info!(
        node = %design.node_id,
        component = %classification.component_type,
        confidence = classification.confidence,
        "classified"
    );

    finish(
        DfcOutput::Classify(ClassifyOutput {
            version: DFC_OUTPUT_VERSION.to_string(),
            input: descriptor,
            node_id: design.node_id,
            classification,
        }),
        format,
    )
}
