use std::fmt::Write;

use super::DevelopmentAnalysisReport;
use crate::format::{
    format_currency, format_multiple, format_number, format_percent, format_plain, format_sq_ft,
};
use crate::kpi::{Kpi, KpiValue};
use crate::ZoneWiseResult;

/// Pretty-printed report JSON.
pub fn export_to_json(report: &DevelopmentAnalysisReport) -> ZoneWiseResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Parse a report previously written by [`export_to_json`].
pub fn import_from_json(json: &str) -> ZoneWiseResult<DevelopmentAnalysisReport> {
    Ok(serde_json::from_str(json)?)
}

/// A KPI value formatted for people, using its unit.
pub fn display_value(kpi: &Kpi) -> String {
    match &kpi.value {
        KpiValue::Numeric(d) => match kpi.unit.as_deref() {
            Some("sq ft") => format_sq_ft(*d),
            Some("%") => format_percent(*d),
            Some("$") => format_currency(*d),
            Some("$/sq ft") => format!("{}/sq ft", format_currency(*d)),
            Some("units") | Some("rooms") | Some("kWh/yr") => {
                format!("{} {}", format_number(*d), kpi.unit.as_deref().unwrap_or_default())
            }
            Some(unit) => format!("{} {unit}", format_plain(*d)),
            None => format_plain(*d),
        },
        KpiValue::Structured(serde_json::Value::Object(map)) => map
            .iter()
            .map(|(key, value)| match value {
                serde_json::Value::Array(items) if items.is_empty() => format!("{key}: none"),
                serde_json::Value::Array(items) => format!(
                    "{key}: {}",
                    items
                        .iter()
                        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                serde_json::Value::String(s) => format!("{key}: {s}"),
                other => format!("{key}: {other}"),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

/// Markdown digest of a report for sharing outside the application.
pub fn export_to_markdown(report: &DevelopmentAnalysisReport) -> String {
    let mut md = String::new();
    // Writing into a String cannot fail.
    let _ = write_markdown(&mut md, report);
    md
}

fn write_markdown(md: &mut String, report: &DevelopmentAnalysisReport) -> std::fmt::Result {
    let property = &report.input.property;
    let capacity = &report.development_capacity;
    let opportunity = &report.financial_opportunity;

    writeln!(md, "# Development Analysis: {}", property.address)?;
    writeln!(md)?;
    writeln!(
        md,
        "{}, {} {} | Parcel {} | {} County",
        property.city, property.state, property.zip_code, property.parcel_id, property.county
    )?;
    writeln!(
        md,
        "Report `{}` generated {} (v{}, {} market)",
        report.id,
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.version,
        report.market_label
    )?;
    writeln!(md)?;

    // --- Executive summary ---
    let summary = &report.executive_summary;
    writeln!(md, "## Executive Summary")?;
    writeln!(md)?;
    for (title, lines) in [
        ("Key Findings", &summary.key_findings),
        ("Opportunities", &summary.opportunities),
        ("Challenges", &summary.challenges),
    ] {
        if lines.is_empty() {
            continue;
        }
        writeln!(md, "### {title}")?;
        writeln!(md)?;
        for line in lines {
            writeln!(md, "- {line}")?;
        }
        writeln!(md)?;
    }
    writeln!(md, "**Recommendation:** {}", summary.recommendation)?;
    writeln!(md)?;

    // --- Capacity ---
    writeln!(md, "## Development Capacity")?;
    writeln!(md)?;
    writeln!(md, "| Metric | Value |")?;
    writeln!(md, "|---|---|")?;
    writeln!(md, "| Max Building Area | {} |", format_sq_ft(capacity.max_building_area))?;
    writeln!(md, "| Unused Development Rights | {} |", format_sq_ft(capacity.unused_development_rights))?;
    writeln!(
        md,
        "| FAR Utilization | {} |",
        capacity.far_utilization_rate.map_or("N/A".to_string(), format_percent)
    )?;
    writeln!(
        md,
        "| Untapped Potential | {} |",
        opportunity
            .untapped_development_potential
            .map_or("N/A".to_string(), format_percent)
    )?;
    writeln!(md, "| Max Stories | {} |", capacity.max_building_height_stories)?;
    writeln!(
        md,
        "| Max Residential Units | {} |",
        capacity.max_residential_units.map_or("N/A".to_string(), |u| u.to_string())
    )?;
    writeln!(
        md,
        "| Max Lodging Rooms | {} |",
        capacity.max_lodging_rooms.map_or("N/A".to_string(), |r| r.to_string())
    )?;
    writeln!(md, "| Untapped Value Estimate | {} |", format_currency(opportunity.untapped_value_estimate))?;
    writeln!(md)?;

    // --- Scenarios ---
    writeln!(md, "## Development Scenarios")?;
    writeln!(md)?;
    if report.scenarios.is_empty() {
        writeln!(md, "No feasible scenarios.")?;
    } else {
        writeln!(md, "| Scenario | Area | Stories | Total Cost | Asset Value | Profit | IRR | Multiple |")?;
        writeln!(md, "|---|---|---|---|---|---|---|---|")?;
        for s in &report.scenarios {
            writeln!(
                md,
                "| {}{} | {} | {} | {} | {} | {} | {} | {} |",
                s.name,
                if s.is_recommended { " ★" } else { "" },
                format_sq_ft(s.total_sq_ft),
                s.stories,
                format_currency(s.costs.total_cost),
                format_currency(s.projections.total_asset_value),
                format_currency(s.projections.development_profit),
                format_percent(s.projections.irr),
                format_multiple(s.projections.equity_multiple)
            )?;
        }
    }
    writeln!(md)?;

    // --- KPIs ---
    writeln!(md, "## Key Performance Indicators")?;
    for group in &report.kpis_by_category {
        writeln!(md)?;
        writeln!(md, "### {}", group.label)?;
        writeln!(md)?;
        writeln!(md, "| # | KPI | Value | Source | Confidence |")?;
        writeln!(md, "|---|---|---|---|---|")?;
        for kpi in &group.kpis {
            writeln!(
                md,
                "| {} | {} | {} | {:?} | {:?} |",
                kpi.id,
                kpi.name,
                display_value(kpi),
                kpi.source,
                kpi.confidence
            )?;
        }
    }

    if !report.warnings.is_empty() {
        writeln!(md)?;
        writeln!(md, "## Warnings")?;
        writeln!(md)?;
        for warning in &report.warnings {
            writeln!(md, "- {warning}")?;
        }
    }
    Ok(())
}
