//! Trazador CLI Library
//!
//! Command-line interface for the Trazar test-plan pipeline: extract a
//! behavioral model, inspect the state machine, and emit covering test
//! plans as JSON, YAML, or a human summary.

#![warn(missing_docs)]

mod commands;
mod error;
mod output;

use std::fs;
use std::io::Write;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use trazar::{build_machine, extract_model, AssertionPlanner, PipelineConfig, Synthesizer};

pub use commands::{
    Cli, ColorArg, Commands, DataFormat, FsmArgs, IdiomArgs, ModelArgs, PlanArgs, PlanFormat,
};
pub use error::{CliError, CliResult};
pub use output::{render_plan_summary, render_scenario_detail, ProgressReporter};

/// Initialize tracing from the verbosity flags; `TRAZAR_LOG` overrides.
pub fn init_tracing(verbose: u8, quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_env("TRAZAR_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Whether to colorize output for the chosen color mode.
#[must_use]
pub fn use_color(color: ColorArg) -> bool {
    match color {
        ColorArg::Always => true,
        ColorArg::Never => false,
        ColorArg::Auto => console::Term::stdout().features().colors_supported(),
    }
}

fn read_source(path: &Path) -> CliResult<String> {
    tracing::debug!(file = %path.display(), "reading component source");
    fs::read_to_string(path).map_err(|e| {
        CliError::invalid_argument(format!("cannot read `{}`: {e}", path.display()))
    })
}

fn emit(output: Option<&Path>, content: &str) -> CliResult<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

/// Run the `model` command.
pub fn run_model(args: &ModelArgs) -> CliResult<()> {
    let source = read_source(&args.file)?;
    let model = extract_model(&source, &args.idioms.to_config())?;
    let rendered = match args.format {
        DataFormat::Json => serde_json::to_string_pretty(&model)
            .map_err(trazar::TrazarError::from)?,
        DataFormat::Yaml => serde_yaml_ng::to_string(&model)
            .map_err(trazar::TrazarError::from)?,
    };
    emit(None, &rendered)
}

/// Run the `fsm` command.
pub fn run_fsm(args: &FsmArgs) -> CliResult<()> {
    let source = read_source(&args.file)?;
    let model = extract_model(&source, &args.idioms.to_config())?;
    let fsm = build_machine(&model)?;
    let rendered = if args.dot {
        fsm.to_dot()
    } else {
        serde_json::to_string_pretty(&fsm).map_err(trazar::TrazarError::from)?
    };
    emit(args.output.as_deref(), &rendered)
}

/// Run the `plan` command.
pub fn run_plan(args: &PlanArgs, color: bool, quiet: bool) -> CliResult<()> {
    let source = read_source(&args.file)?;

    let mut progress = ProgressReporter::new(color, quiet);
    progress.start(&format!("planning {}", args.file.display()));

    let config = PipelineConfig {
        extractor: args.idioms.to_config(),
    };
    let model = extract_model(&source, &config.extractor)?;
    let fsm = build_machine(&model)?;
    let scenarios = Synthesizer::new(&model, &fsm).synthesize();
    let plan = AssertionPlanner::new(&model, &fsm).plan(&scenarios)?;
    progress.finish();

    let rendered = match args.format {
        PlanFormat::Text => render_plan_summary(&plan, color),
        PlanFormat::Json => plan.to_json_pretty().map_err(CliError::from)?,
        PlanFormat::Yaml => plan.to_yaml().map_err(CliError::from)?,
    };
    emit(args.output.as_deref(), &rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_source_reports_missing_file() {
        let err = read_source(Path::new("definitely-missing.jsx")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
