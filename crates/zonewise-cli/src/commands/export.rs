use clap::{Args, ValueEnum};
use std::fs;

use zonewise_core::kpi::Kpi;
use zonewise_core::report::export::display_value;
use zonewise_core::{
    export_to_json, export_to_markdown, generate_report, import_from_json,
    DevelopmentAnalysisReport,
};

use super::{Context, InputArgs};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
    KpiCsv,
}

/// Arguments for exporting a report
#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: InputArgs,

    /// Previously exported report JSON to re-render instead of an input
    #[arg(long, conflicts_with = "input")]
    pub report: Option<String>,

    /// Export format
    #[arg(long, value_enum, default_value = "markdown")]
    pub format: ExportFormat,

    /// Write to this file instead of stdout
    #[arg(long)]
    pub out: Option<String>,
}

/// Render the export. Returns the text and where it was written, if anywhere.
pub fn run_export(
    args: ExportArgs,
    ctx: &Context,
) -> Result<(String, Option<String>), Box<dyn std::error::Error>> {
    let report: DevelopmentAnalysisReport = match &args.report {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read '{path}': {e}"))?;
            import_from_json(&json)?
        }
        None => generate_report(&args.source.load()?, &ctx.config)?,
    };

    let text = match args.format {
        ExportFormat::Json => export_to_json(&report)?,
        ExportFormat::Markdown => export_to_markdown(&report),
        ExportFormat::KpiCsv => kpi_csv(&report.kpis)?,
    };

    if let Some(path) = &args.out {
        fs::write(path, &text).map_err(|e| format!("Failed to write '{path}': {e}"))?;
    }
    Ok((text, args.out))
}

/// Flat one-row-per-KPI table.
fn kpi_csv(kpis: &[Kpi]) -> Result<String, Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "id",
        "category",
        "name",
        "value",
        "unit",
        "source",
        "confidence",
        "calculation_method",
        "note",
    ])?;
    for kpi in kpis {
        let source = serde_json::to_value(kpi.source)?;
        let confidence = serde_json::to_value(kpi.confidence)?;
        wtr.write_record([
            kpi.id.to_string().as_str(),
            kpi.category.label(),
            kpi.name.as_str(),
            display_value(kpi).as_str(),
            kpi.unit.as_deref().unwrap_or_default(),
            source.as_str().unwrap_or_default(),
            confidence.as_str().unwrap_or_default(),
            kpi.calculation_method.as_deref().unwrap_or_default(),
            kpi.note.as_deref().unwrap_or_default(),
        ])?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.to_string())?;
    Ok(String::from_utf8(bytes)?)
}
