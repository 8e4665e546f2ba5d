mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::debug;

use zonewise_core::AnalysisConfig;

use commands::analysis::KpiArgs;
use commands::export::ExportArgs;
use commands::presets::PresetArgs;
use commands::report::ReportArgs;
use commands::setbacks::SetbackArgs;
use commands::{Context, InputArgs};

/// Zoning development-capacity analysis
#[derive(Parser)]
#[command(
    name = "zw",
    version,
    about = "Zoning development-capacity analysis",
    long_about = "Turns a parcel's site, zoning and existing-building data into a \
                  development analysis: buildable capacity, a 75-KPI catalog, \
                  priced development scenarios and an executive summary."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Analysis config file (JSON or YAML)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log filter used when RUST_LOG is unset, e.g. debug or zonewise_core=trace
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the full development analysis report
    Report(ReportArgs),
    /// Development capacity and financial opportunity
    Capacity(InputArgs),
    /// The 75-entry KPI catalog
    Kpis(KpiArgs),
    /// Priced development scenarios with the recommendation flagged
    Scenarios(InputArgs),
    /// Setback compliance and buildable envelope
    Setbacks(SetbackArgs),
    /// Export a report as JSON, Markdown or a KPI CSV
    Export(ExportArgs),
    /// List market presets, or show one in full
    Presets(PresetArgs),
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

    if let Err(e) = telemetry::init(&cli.log_level) {
        fail(e);
    }

    let ctx = match load_context(cli.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => fail(e),
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Report(args) => commands::report::run_report(args, &ctx),
        Commands::Capacity(args) => commands::analysis::run_capacity(args, &ctx),
        Commands::Kpis(args) => commands::analysis::run_kpis(args, &ctx),
        Commands::Scenarios(args) => commands::analysis::run_scenarios(args, &ctx),
        Commands::Setbacks(args) => commands::setbacks::run_setbacks(args, &ctx),
        Commands::Presets(args) => commands::presets::run_presets(args),
        Commands::Export(args) => {
            match commands::export::run_export(args, &ctx) {
                Ok((_, Some(path))) => eprintln!("wrote {path}"),
                Ok((text, None)) => print!("{text}"),
                Err(e) => fail(e),
            }
            return;
        }
        Commands::Version => {
            println!("zw {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}

fn load_context(path: Option<&str>) -> Result<Context, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => {
            let config: AnalysisConfig = input::file::read_document(path)?;
            debug!(path, "loaded analysis config");
            config
        }
        None => AnalysisConfig::default(),
    };
    Ok(Context { config })
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}
