mod commands;
mod gemini;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::advise::AdviseArgs;
use commands::baseline::BaselineArgs;
use commands::compare::CompareArgs;
use commands::project::ProjectArgs;
use commands::sweep::SweepArgs;

/// Scenario-driven P&L projections for a 3PL warehouse operator
#[derive(Parser)]
#[command(
    name = "pnl",
    version,
    about = "Scenario-driven P&L projections for a 3PL warehouse operator",
    long_about = "Projects a baseline-year P&L under growth, robotization, warehouse \
                  utilization and VAS levers with decimal precision. Supports plan vs \
                  scenario comparison, lever sensitivity sweeps, and CFO commentary."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log projection details to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the target-year P&L for a scenario
    Project(ProjectArgs),
    /// Compare a projected scenario with its baseline
    Compare(CompareArgs),
    /// Sweep one lever, or two for a sensitivity grid
    Sweep(SweepArgs),
    /// Ask the virtual CFO for commentary on a scenario
    Advise(AdviseArgs),
    /// Show a baseline statement and its aggregates
    Baseline(BaselineArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::project::run_project(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Sweep(args) => commands::sweep::run_sweep(args),
        Commands::Advise(args) => commands::advise::run_advise(args),
        Commands::Baseline(args) => commands::baseline::run_baseline(args),
        Commands::Version => {
            println!("pnl {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
