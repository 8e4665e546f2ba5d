use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::capacity::{calculate_development_capacity, DevelopmentCapacity};
use crate::config::{AnalysisConfig, MarketAssumptions};
use crate::financial::{calculate_financial_opportunity, FinancialOpportunity};
use crate::format::format_sq_ft;
use crate::report::ReportInput;
use crate::setbacks::{
    buildable_envelope, check_setback_compliance, BuildableEnvelope, ComplianceStatus,
    SetbackCompliance,
};
use crate::types::{with_metadata, ComputationOutput};
use crate::validation::validate_report_input;
use crate::ZoneWiseResult;

/// Validated, derived figures every downstream stage reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAnalysis {
    pub market: MarketAssumptions,
    pub capacity: DevelopmentCapacity,
    pub financial_opportunity: FinancialOpportunity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildable_envelope: Option<BuildableEnvelope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setback_compliance: Option<SetbackCompliance>,
    pub warnings: Vec<String>,
}

/// Validate the input and derive capacity, financial opportunity and the
/// setback picture. Nothing after this stage can fail.
pub fn analyze_site(input: &ReportInput, config: &AnalysisConfig) -> ZoneWiseResult<SiteAnalysis> {
    let mut warnings = validate_report_input(input, config)?;
    let market = config.market(input.market_preset);
    let existing = input.existing_building.as_ref();

    let capacity = calculate_development_capacity(
        &input.site,
        &input.zoning,
        existing,
        &input.allowed_uses,
    );
    debug!(
        parcel = %input.property.parcel_id,
        max_building_area = %capacity.max_building_area,
        unused_rights = %capacity.unused_development_rights,
        "derived development capacity"
    );

    if input.site.lot_area_sq_ft.is_zero() {
        warnings.push("Lot area is zero; ratio-based figures are unavailable".into());
    }
    if capacity.is_nonconforming {
        warn!(
            parcel = %input.property.parcel_id,
            existing = %capacity.existing_building_area,
            allowed = %capacity.max_building_area,
            "existing building exceeds max building area"
        );
        warnings.push(format!(
            "Existing building area {} exceeds the {} allowed under current zoning",
            format_sq_ft(capacity.existing_building_area),
            format_sq_ft(capacity.max_building_area)
        ));
    }

    let financial_opportunity = calculate_financial_opportunity(
        &input.zoning,
        &capacity,
        existing,
        input.land_value,
        config,
        &market,
    );

    let envelope = buildable_envelope(&input.site, &input.setbacks);
    let setback_compliance = existing
        .and_then(|b| b.actual_setbacks.as_ref())
        .map(|actual| check_setback_compliance(actual, &input.setbacks));
    if let Some(compliance) = &setback_compliance {
        if compliance.status != ComplianceStatus::Pass {
            warnings.push(format!(
                "Setback compliance {}: {}",
                compliance.status,
                compliance.violations.join("; ")
            ));
        }
    }

    Ok(SiteAnalysis {
        market,
        capacity,
        financial_opportunity,
        buildable_envelope: envelope,
        setback_compliance,
        warnings,
    })
}

/// [`analyze_site`] wrapped in the standard computation envelope.
pub fn run_capacity_analysis(
    input: &ReportInput,
    config: &AnalysisConfig,
) -> ZoneWiseResult<ComputationOutput<SiteAnalysis>> {
    let start = Instant::now();
    let analysis = analyze_site(input, config)?;
    let warnings = analysis.warnings.clone();
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Zoning Development Capacity (FAR, lot coverage, density)",
        input,
        warnings,
        elapsed,
        analysis,
    ))
}
