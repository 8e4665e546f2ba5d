use clap::Args;
use serde_json::{json, Value};

use zonewise_core::kpi::{group_by_category, KpiCategory};
use zonewise_core::report::export::display_value;
use zonewise_core::scenarios::{generate_scenarios, ScenarioContext};
use zonewise_core::{analyze_site, calculate_kpis, run_capacity_analysis};

use super::{Context, InputArgs};

/// Arguments for the KPI catalog
#[derive(Args)]
pub struct KpiArgs {
    #[command(flatten)]
    pub source: InputArgs,

    /// Only show one category, e.g. developmentCapacity
    #[arg(long)]
    pub category: Option<String>,
}

pub fn run_capacity(args: InputArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let report_input = args.load()?;
    let output = run_capacity_analysis(&report_input, &ctx.config)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_kpis(args: KpiArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let report_input = args.source.load()?;
    let category = args
        .category
        .as_deref()
        .map(parse_category)
        .transpose()?;

    let kpis = calculate_kpis(&report_input, &ctx.config)?;
    let rows: Vec<Value> = group_by_category(&kpis)
        .into_iter()
        .filter(|group| category.map_or(true, |c| group.category == c))
        .flat_map(|group| group.kpis)
        .map(|kpi| {
            let value = display_value(&kpi);
            json!({
                "id": kpi.id,
                "category": kpi.category.label(),
                "name": kpi.name,
                "value": value,
                "source": kpi.source,
                "confidence": kpi.confidence,
                "calculationMethod": kpi.calculation_method.unwrap_or_default(),
            })
        })
        .collect();
    Ok(Value::Array(rows))
}

pub fn run_scenarios(args: InputArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let report_input = args.load()?;
    let analysis = analyze_site(&report_input, &ctx.config)?;
    let scenarios = generate_scenarios(&ScenarioContext {
        site: &report_input.site,
        zoning: &report_input.zoning,
        allowed_uses: &report_input.allowed_uses,
        capacity: &analysis.capacity,
        financial: &analysis.financial_opportunity,
        land_value: report_input.land_value,
        market: &analysis.market,
        config: &ctx.config,
    });

    let rows: Vec<Value> = scenarios
        .iter()
        .map(|s| {
            json!({
                "scenario": s.name,
                "recommended": s.is_recommended,
                "totalSqFt": s.total_sq_ft,
                "stories": s.stories,
                "totalCost": s.costs.total_cost,
                "assetValue": s.projections.total_asset_value,
                "profit": s.projections.development_profit,
                "irr": s.projections.irr,
                "equityMultiple": s.projections.equity_multiple,
                "risk": s.risk_level.to_string(),
            })
        })
        .collect();
    Ok(Value::Array(rows))
}

/// Accepts the serialized name (`developmentCapacity`) or the label
/// (`Development Capacity`), case-insensitively.
fn parse_category(raw: &str) -> Result<KpiCategory, Box<dyn std::error::Error>> {
    let wanted = raw.trim().to_ascii_lowercase();
    KpiCategory::ALL
        .into_iter()
        .find(|c| {
            c.label().to_ascii_lowercase() == wanted
                || serde_json::to_value(c)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_ascii_lowercase))
                    .is_some_and(|name| name == wanted)
        })
        .ok_or_else(|| format!("Unknown KPI category '{raw}'").into())
}
