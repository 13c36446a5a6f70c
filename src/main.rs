mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_analyze, run_classify, run_correct, run_generate};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let args = cli::parse();
    init_tracing(args.verbose);

    let format = args.format;
    let config = args.config;
    match args.command {
        Commands::Classify { input, node_id } => run_classify(config, input, node_id, format).await,
        Commands::Analyze { input, node_id } => run_analyze(config, input, node_id, format).await,
        Commands::Correct {
            input,
            markup,
            node_id,
            component_type,
            tolerance,
            output,
        } => {
            run_correct(
                config,
                input,
                markup,
                node_id,
                component_type,
                tolerance,
                output,
                format,
            )
            .await
        }
        Commands::Generate {
            input,
            node_id,
            tolerance,
            timeout,
            output,
        } => run_generate(config, input, node_id, tolerance, timeout, output, format).await,
    }
}

/// Logs go to stderr so stdout stays a clean JSON channel.
fn init_tracing(verbose: bool) {
    let default = if verbose { "dfc=debug,dfc_lib=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
