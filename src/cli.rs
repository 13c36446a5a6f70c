use clap::{Parser, Subcommand, ValueEnum};
use dfc_lib::ComponentType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dfc")]
#[command(
    version,
    about = "Design Fidelity Corrector - Classify design nodes and correct generated UI markup",
    long_about = "Design Fidelity Corrector (DFC)\n\nModes:\n- classify: score a design node against the widget archetypes.\n- analyze: recover alignment groups and spacing patterns of a node's children.\n- correct: make existing markup semantic, accessible and pixel-positioned.\n- generate: build a generation request, call the configured backend, then correct the result.\n\nInputs are local design JSON files or Figma URLs (FIGMA_TOKEN required).\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable debug logging on stderr")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) with tolerances, thresholds and the codegen timeout; CLI flags override config"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value = "json", help = "Output format")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a design node into a widget archetype
    Classify {
        #[arg(long, help = "Design input (local .json file or Figma URL)")]
        input: String,

        #[arg(long, help = "Node to operate on (defaults to the input's root)")]
        node_id: Option<String>,
    },

    /// Analyze the layout of a design node's children
    Analyze {
        #[arg(long, help = "Design input (local .json file or Figma URL)")]
        input: String,

        #[arg(long, help = "Node to operate on (defaults to the input's root)")]
        node_id: Option<String>,
    },

    /// Correct existing markup against a design node
    Correct {
        #[arg(long, help = "Design input (local .json file or Figma URL)")]
        input: String,

        #[arg(long, value_name = "PATH", help = "Markup file to correct")]
        markup: PathBuf,

        #[arg(long, help = "Node to operate on (defaults to the input's root)")]
        node_id: Option<String>,

        #[arg(
            long,
            help = "Override the classifier (button, input, card, badge, avatar, container, navigation, image)"
        )]
        component_type: Option<ComponentType>,

        #[arg(long, help = "Validation tolerance in px (overrides config)")]
        tolerance: Option<f64>,

        #[arg(long, short, value_name = "PATH", help = "Write the corrected markup to this file")]
        output: Option<PathBuf>,
    },

    /// Generate markup for a design node through the configured backend, then correct it
    Generate {
        #[arg(long, help = "Design input (local .json file or Figma URL)")]
        input: String,

        #[arg(long, help = "Node to operate on (defaults to the input's root)")]
        node_id: Option<String>,

        #[arg(long, help = "Validation tolerance in px (overrides config)")]
        tolerance: Option<f64>,

        #[arg(long, value_name = "SECONDS", help = "Generation call timeout (overrides config)")]
        timeout: Option<u64>,

        #[arg(long, short, value_name = "PATH", help = "Write the corrected markup to this file")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
