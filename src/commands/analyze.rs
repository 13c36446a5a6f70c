use std::path::PathBuf;
use std::process::ExitCode;

use dfc_lib::output::DFC_OUTPUT_VERSION;
use dfc_lib::{AnalyzeOutput, DfcError, DfcOutput, LayoutAnalyzer};

use super::load_input;
use crate::cli::OutputFormat;
use crate::formatting::{finish, render_error};
use crate::settings::load_config;

/// Run the analyze command.
pub async fn run_analyze(
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

    let analyzer = LayoutAnalyzer::new(config.alignment);
    let layout = match design.tree.get(&design.node_id) {
        Some(node) => analyzer.analyze_children(node),
        None => {
            return render_error(
                DfcError::invalid_input(format!("node {} not found in tree", design.node_id)),
                format,
            )
        }
    };
    let siblings = analyzer.analyze(&design.tree, &design.node_id);

    finish(
        DfcOutput::Analyze(AnalyzeOutput {
            version: DFC_OUTPUT_VERSION.to_string(),
            input: descriptor,
            node_id: design.node_id,
            layout,
            siblings,
        }),
        format,
    )
}
