use clap::Args;
use serde_json::Value;

use zonewise_core::generate_report;

use super::{Context, InputArgs};

/// Arguments for the full development analysis report
#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: InputArgs,

    /// Print only the executive summary
    #[arg(long)]
    pub summary_only: bool,
}

pub fn run_report(args: ReportArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let report_input = args.source.load()?;
    let report = generate_report(&report_input, &ctx.config)?;
    if args.summary_only {
        return Ok(serde_json::to_value(&report.executive_summary)?);
    }
    Ok(serde_json::to_value(&report)?)
}
