mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;

use commands::mortgage::{AmortizationArgs, MortgageArgs};
use commands::rental::AnalyzeArgs;
use output::OutputFormat;

/// Rental property investment analysis
#[derive(Parser)]
#[command(
    name = "rentcalc",
    version,
    about = "Rental property investment analysis",
    long_about = "Computes mortgage payment, NOI, cash flow, cap rate, cash-on-cash \
                  return, 5-year annualized return and the loan amortization schedule \
                  for a rental property."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a rental property (all metrics plus amortization)
    Analyze(AnalyzeArgs),
    /// Monthly payment and lifetime cost of a mortgage
    Mortgage(MortgageArgs),
    /// Month-by-month amortization schedule
    Amortization(AmortizationArgs),
    /// Print version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::rental::run_analyze(args),
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args),
        Commands::Amortization(args) => commands::mortgage::run_amortization(args),
        Commands::Version => {
            println!("rentcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            cli.output.render(&value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
