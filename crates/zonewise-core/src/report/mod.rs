pub mod export;
pub mod summary;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{analyze_site, SiteAnalysis};
use crate::capacity::DevelopmentCapacity;
use crate::config::{AnalysisConfig, MarketPreset};
use crate::financial::FinancialOpportunity;
use crate::kpi::{group_by_category, Kpi, KpiCalculator, KpiContext, KpiGroup};
use crate::property::{ExistingBuildingMetrics, PropertyInfo, SiteMetrics};
use crate::scenarios::{generate_scenarios, DevelopmentScenario, ScenarioContext};
use crate::setbacks::{BuildableEnvelope, SetbackCompliance, SetbackRequirements};
use crate::types::Money;
use crate::zoning::{AllowedUses, ZoningInfo};
use crate::ZoneWiseResult;

pub use export::{export_to_json, export_to_markdown, import_from_json};
pub use summary::{
    evaluate_rules, summarize, ExecutiveSummary, FiredRule, SummaryContext, SummarySection,
    SUMMARY_RULES,
};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything the caller supplies about one parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    pub property: PropertyInfo,
    pub site: SiteMetrics,
    pub zoning: ZoningInfo,
    #[serde(default)]
    pub allowed_uses: AllowedUses,
    pub setbacks: SetbackRequirements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_building: Option<ExistingBuildingMetrics>,
    /// Appraised or asking land value; market-priced when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_value: Option<Money>,
    #[serde(default)]
    pub market_preset: MarketPreset,
}

/// The complete, immutable development analysis of one parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevelopmentAnalysisReport {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub market_label: String,
    #[serde(flatten)]
    pub input: ReportInput,
    pub development_capacity: DevelopmentCapacity,
    pub financial_opportunity: FinancialOpportunity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildable_envelope: Option<BuildableEnvelope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setback_compliance: Option<SetbackCompliance>,
    pub kpis: Vec<Kpi>,
    pub kpis_by_category: Vec<KpiGroup>,
    pub scenarios: Vec<DevelopmentScenario>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_scenario: Option<DevelopmentScenario>,
    pub executive_summary: ExecutiveSummary,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Generate a report stamped with the current time.
pub fn generate_report(
    input: &ReportInput,
    config: &AnalysisConfig,
) -> ZoneWiseResult<DevelopmentAnalysisReport> {
    generate_report_at(input, config, Utc::now())
}

/// Generate a report against a pinned clock. Identical inputs and `now`
/// produce identical reports.
pub fn generate_report_at(
    input: &ReportInput,
    config: &AnalysisConfig,
    now: DateTime<Utc>,
) -> ZoneWiseResult<DevelopmentAnalysisReport> {
    let analysis = analyze_site(input, config)?;
    let analysis_year = config.analysis_year.unwrap_or_else(|| now.year());

    let kpis = KpiCalculator::new(KpiContext {
        input,
        analysis: &analysis,
        config,
        analysis_year,
    })
    .calculate_all();
    debug!(count = kpis.len(), analysis_year, "computed KPI catalog");

    let scenarios = generate_scenarios(&ScenarioContext {
        site: &input.site,
        zoning: &input.zoning,
        allowed_uses: &input.allowed_uses,
        capacity: &analysis.capacity,
        financial: &analysis.financial_opportunity,
        land_value: input.land_value,
        market: &analysis.market,
        config,
    });
    let recommended_scenario = scenarios.iter().find(|s| s.is_recommended).cloned();
    debug!(
        count = scenarios.len(),
        recommended = recommended_scenario.as_ref().map(|s| s.name.as_str()),
        "generated development scenarios"
    );

    let executive_summary = summarize(&SummaryContext {
        input,
        analysis: &analysis,
        scenarios: &scenarios,
        thresholds: &config.summary,
    });

    let SiteAnalysis {
        market,
        capacity,
        financial_opportunity,
        buildable_envelope,
        setback_compliance,
        warnings,
    } = analysis;

    let id = report_id(&input.property.parcel_id, now);
    debug!(report_id = %id, "assembled development analysis report");

    Ok(DevelopmentAnalysisReport {
        id,
        generated_at: now,
        version: config.report_version.clone(),
        market_label: market.label,
        input: input.clone(),
        development_capacity: capacity,
        financial_opportunity,
        buildable_envelope,
        setback_compliance,
        kpis_by_category: group_by_category(&kpis),
        kpis,
        scenarios,
        recommended_scenario,
        executive_summary,
        warnings,
    })
}

/// `rpt-<parcel slug>-<yyyymmddHHMMSS>`
fn report_id(parcel_id: &str, now: DateTime<Utc>) -> String {
    let mut slug = String::with_capacity(parcel_id.len());
    for ch in parcel_id.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    format!("rpt-{slug}-{}", now.format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_id_slugs_parcel() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(
            report_id("29-37-13-00-00750.0-0000.00", now),
            "rpt-29-37-13-00-00750-0-0000-00-20250314092653"
        );
        assert_eq!(report_id("  APN 12/34 ", now), "rpt-apn-12-34-20250314092653");
    }
}
