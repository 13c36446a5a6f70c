use std::path::PathBuf;
use std::process::ExitCode;

use dfc_lib::output::DFC_OUTPUT_VERSION;
use dfc_lib::{ComponentType, CorrectionOutput, DfcError, DfcOutput, Pipeline};
use tracing::{debug, info};

use super::load_input;
use crate::cli::OutputFormat;
use crate::formatting::{finish, render_error};
use crate::settings::{format_effective_config, load_config, resolve_config, Overrides};

/// Run the correct command on markup read from disk.
#[allow(clippy::too_many_arguments)]
pub async fn run_correct(
    config_path: Option<PathBuf>,
    input: String,
    markup: PathBuf,
    node_id: Option<String>,
    component_type: Option<ComponentType>,
    tolerance: Option<f64>,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()).and_then(|cfg| {
        resolve_config(
            cfg,
            Overrides {
                tolerance,
                timeout_secs: None,
            },
        )
    }) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format),
    };
    debug!("{}", format_effective_config(&config, config_path.as_deref()));

    let source = match std::fs::read_to_string(&markup) {
        Ok(source) => source,
        Err(err) => {
            return render_error(
                DfcError::Config(format!("Failed to read markup {}: {err}", markup.display())),
                format,
            )
        }
    };
    let (descriptor, design) = match load_input(&input, node_id.as_deref()).await {
        Ok(loaded) => loaded,
        Err(err) => return render_error(err, format),
    };

    let pipeline = Pipeline::new(config);
    let run = pipeline.run_with_markup(&design.tree, &design.node_id, &source, component_type);
    let result = match run {
        Ok(result) => result,
        Err(err) => return render_error(err, format),
    };
    info!(
        node = %design.node_id,
        exact = result.is_exact(),
        mismatches = result.report.mismatches.len(),
        "correction finished"
    );

    if let Some(path) = &output {
        if let Err(err) = std::fs::write(path, result.markup.as_bytes()) {
            return render_error(DfcError::Io(err), format);
        }
    }

    finish(
        DfcOutput::Correct(CorrectionOutput {
            version: DFC_OUTPUT_VERSION.to_string(),
            input: descriptor,
            output_path: output,
            result,
        }),
        format,
    )
}
