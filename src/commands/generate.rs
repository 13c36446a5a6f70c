use std::path::PathBuf;
use std::process::ExitCode;

use dfc_lib::output::DFC_OUTPUT_VERSION;
use dfc_lib::{CodegenBackend, CorrectionOutput, DfcError, DfcOutput, Pipeline};
use tracing::debug;

use super::load_input;
use crate::cli::OutputFormat;
use crate::formatting::{finish, render_error};
use crate::settings::{format_effective_config, load_config, resolve_config, Overrides};

/// Run the generate command: prepare, call the backend, correct.
pub async fn run_generate(
    config_path: Option<PathBuf>,
    input: String,
    node_id: Option<String>,
    tolerance: Option<f64>,
    timeout: Option<u64>,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()).and_then(|cfg| {
        resolve_config(
            cfg,
            Overrides {
                tolerance,
                timeout_secs: timeout,
            },
        )
    }) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format),
    };
    debug!("{}", format_effective_config(&config, config_path.as_deref()));

    // Resolve the backend before any network fetch so a missing one fails fast.
    let backend = match CodegenBackend::require_from_env() {
        Ok(backend) => backend,
        Err(err) => return render_error(err, format),
    };
    let (descriptor, design) = match load_input(&input, node_id.as_deref()).await {
        Ok(loaded) => loaded,
        Err(err) => return render_error(err, format),
    };

    let pipeline = Pipeline::new(config);
    let result = match pipeline.run(&design.tree, &design.node_id, &backend).await {
        Ok(result) => result,
        Err(err) => return render_error(err, format),
    };

    if let Some(path) = &output {
        if let Err(err) = std::fs::write(path, result.markup.as_bytes()) {
            return render_error(DfcError::Io(err), format);
        }
    }

    finish(
        DfcOutput::Generate(CorrectionOutput {
            version: DFC_OUTPUT_VERSION.to_string(),
            input: descriptor,
            output_path: output,
            result,
        }),
        format,
    )
}
