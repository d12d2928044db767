//! Trazador CLI: derive behavioral models and covering test plans from
//! component source.
//!
//! ## Usage
//!
//! ```bash
//! trazador model widget.jsx              # Dump the extracted model
//! trazador fsm widget.jsx --dot          # State machine as Graphviz DOT
//! trazador plan widget.jsx               # Human-readable plan summary
//! trazador plan widget.jsx -f json -o plan.json
//! ```

use clap::Parser;
use std::process::ExitCode;
use trazador::{init_tracing, run_fsm, run_model, run_plan, use_color, Cli, CliResult, Commands};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    let color = use_color(cli.color);

    match &cli.command {
        Commands::Model(args) => run_model(args),
        Commands::Fsm(args) => run_fsm(args),
        Commands::Plan(args) => run_plan(args, color, cli.quiet),
    }
}
