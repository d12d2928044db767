//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Trazador: CLI for Trazar - behavioral-model extraction and test-plan
/// synthesis for stateful UI components
#[derive(Parser, Debug)]
#[command(name = "trazador")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a component's behavioral model
    Model(ModelArgs),

    /// Build and inspect the component's state machine
    Fsm(FsmArgs),

    /// Generate the covering test plan
    Plan(PlanArgs),
}

/// Arguments for the model command
#[derive(Parser, Debug)]
pub struct ModelArgs {
    /// Component source file
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: DataFormat,

    /// Idiom switches
    #[command(flatten)]
    pub idioms: IdiomArgs,
}

/// Arguments for the fsm command
#[derive(Parser, Debug)]
pub struct FsmArgs {
    /// Component source file
    pub file: PathBuf,

    /// Emit a Graphviz DOT digraph instead of JSON
    #[arg(long)]
    pub dot: bool,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Idiom switches
    #[command(flatten)]
    pub idioms: IdiomArgs,
}

/// Arguments for the plan command
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Component source file
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: PlanFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Idiom switches
    #[command(flatten)]
    pub idioms: IdiomArgs,
}

/// Recognized-idiom switches shared by all commands
#[derive(Parser, Debug, Clone, Copy)]
pub struct IdiomArgs {
    /// Disable min/max clamp detection
    #[arg(long)]
    pub no_bounded_clamp: bool,

    /// Disable trim/case-fold comparison normalization detection
    #[arg(long)]
    pub no_normalize_on_compare: bool,

    /// Disable append-only accumulator detection
    #[arg(long)]
    pub no_accumulator_collections: bool,
}

impl IdiomArgs {
    /// Convert the switches into an extractor configuration.
    #[must_use]
    pub fn to_config(self) -> trazar::ExtractorConfig {
        trazar::ExtractorConfig {
            bounded_clamp: !self.no_bounded_clamp,
            normalize_on_compare: !self.no_normalize_on_compare,
            accumulator_collections: !self.no_accumulator_collections,
        }
    }
}

/// Structured data output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DataFormat {
    /// JSON output
    #[default]
    Json,
    /// YAML output
    Yaml,
}

/// Test plan output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlanFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// Color output choice
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Detect from the terminal
    #[default]
    Auto,
    /// Always colorize
    Always,
    /// Never colorize
    Never,
}
