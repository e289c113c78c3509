mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::metrics::MetricsArgs;
use commands::scenarios::{GridArgs, ScenariosArgs, SensitivityArgs};
use commands::valuation::ValueArgs;

/// Decimal-precision DCF valuation for subscription and channel businesses
#[derive(Parser)]
#[command(
    name = "bizval",
    version,
    about = "Decimal-precision DCF valuation for subscription and channel businesses",
    long_about = "A CLI for valuing early-stage businesses from their unit economics. \
                  Projects revenue, income and free cash flow, discounts them with a \
                  Gordon growth terminal value, and runs sensitivity, bear/base/bull \
                  scenario and unit-economics analyses."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Diagnostic log level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full DCF valuation of a financial model
    Value(ValueArgs),
    /// One-way sensitivity of enterprise value to growth or discount rate
    Sensitivity(SensitivityArgs),
    /// Two-way growth x discount-rate sensitivity table
    Grid(GridArgs),
    /// Compare bear, base and bull cases
    Scenarios(ScenariosArgs),
    /// Summarise unit economics (MRR/ARR/LTV or channel revenue mix)
    Metrics(MetricsArgs),
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

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(&cli.log_level) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Value(args) => commands::valuation::run_value(args),
        Commands::Sensitivity(args) => commands::scenarios::run_sensitivity(args),
        Commands::Grid(args) => commands::scenarios::run_grid(args),
        Commands::Scenarios(args) => commands::scenarios::run_scenarios(args),
        Commands::Metrics(args) => commands::metrics::run_metrics(args),
        Commands::Version => {
            println!("bizval {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
