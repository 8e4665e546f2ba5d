//! Boundary validation for analysis inputs.
//!
//! Business-invalid values are rejected outright and never clamped.
//! Degenerate-but-valid inputs (zero lot area, vacant land) pass and are
//! handled by the calculators' per-field policies.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::{AnalysisConfig, MarketAssumptions};
use crate::error::ZoneWiseError;
use crate::property::{ExistingBuildingMetrics, PropertyInfo, SiteMetrics};
use crate::report::ReportInput;
use crate::scenarios::ComponentKind;
use crate::setbacks::{ActualSetbacks, SetbackRequirements};
use crate::types::SQ_FT_PER_ACRE;
use crate::zoning::ZoningInfo;
use crate::ZoneWiseResult;

/// Validate every part of a report input. Returns non-fatal warnings.
pub fn validate_report_input(
    input: &ReportInput,
    config: &AnalysisConfig,
) -> ZoneWiseResult<Vec<String>> {
    let mut warnings = Vec::new();

    validate_property(&input.property, &mut warnings)?;
    validate_site(&input.site, config)?;
    validate_zoning(&input.zoning)?;
    validate_setbacks(&input.setbacks)?;
    if let Some(existing) = &input.existing_building {
        validate_existing_building(existing, &input.site)?;
    }

    if let Some(market) = &config.market_override {
        validate_market(market)?;
    }

    if let Some(land_value) = input.land_value {
        if land_value < Decimal::ZERO {
            return Err(ZoneWiseError::invalid(
                "landValue",
                "Land value cannot be negative",
            ));
        }
    }

    Ok(warnings)
}

fn validate_property(property: &PropertyInfo, warnings: &mut Vec<String>) -> ZoneWiseResult<()> {
    if property.parcel_id.trim().is_empty() {
        return Err(ZoneWiseError::invalid(
            "property.parcelId",
            "Parcel ID is required",
        ));
    }
    if property.latitude.is_some() != property.longitude.is_some() {
        warnings.push(
            "Only one of latitude/longitude supplied; default location will be used".into(),
        );
    }
    Ok(())
}

pub fn validate_site(site: &SiteMetrics, config: &AnalysisConfig) -> ZoneWiseResult<()> {
    if site.lot_area_acres < Decimal::ZERO {
        return Err(ZoneWiseError::invalid(
            "site.lotAreaAcres",
            "Lot area cannot be negative",
        ));
    }
    if site.lot_area_sq_ft < Decimal::ZERO {
        return Err(ZoneWiseError::invalid(
            "site.lotAreaSqFt",
            "Lot area cannot be negative",
        ));
    }

    let expected = site.lot_area_acres * SQ_FT_PER_ACRE;
    let tolerance = expected * config.lot_area_tolerance;
    if (site.lot_area_sq_ft - expected).abs() > tolerance {
        return Err(ZoneWiseError::invalid(
            "site.lotAreaSqFt",
            format!(
                "Lot area {} sq ft is inconsistent with {} acres ({} sq ft expected)",
                site.lot_area_sq_ft, site.lot_area_acres, expected
            ),
        ));
    }

    for (field, value) in [
        ("site.taxRecordAreaSqFt", site.tax_record_area_sq_ft),
        ("site.parcelShapeAreaSqFt", site.parcel_shape_area_sq_ft),
        ("site.frontageLength", site.frontage_length),
    ] {
        if matches!(value, Some(v) if v < Decimal::ZERO) {
            return Err(ZoneWiseError::invalid(field, "Value cannot be negative"));
        }
    }

    if let (Some(shape), Some(tax)) = (site.parcel_shape_area_sq_ft, site.tax_record_area_sq_ft) {
        if shape > tax {
            return Err(ZoneWiseError::invalid(
                "site.parcelShapeAreaSqFt",
                format!("Parcel shape area {shape} exceeds tax record area {tax}"),
            ));
        }
    }

    Ok(())
}

pub fn validate_zoning(zoning: &ZoningInfo) -> ZoneWiseResult<()> {
    if zoning.base_far < Decimal::ZERO {
        return Err(ZoneWiseError::invalid(
            "zoning.baseFar",
            "Base FAR cannot be negative",
        ));
    }
    if zoning.max_far < zoning.base_far {
        return Err(ZoneWiseError::invalid(
            "zoning.maxFar",
            format!(
                "Max FAR {} is below base FAR {}",
                zoning.max_far, zoning.base_far
            ),
        ));
    }

    for (field, fraction) in [
        ("zoning.maxLotCoverage", zoning.max_lot_coverage),
        ("zoning.minOpenSpace", zoning.min_open_space),
    ] {
        if fraction < Decimal::ZERO || fraction > Decimal::ONE {
            return Err(ZoneWiseError::invalid(
                field,
                "Must be a fraction between 0 and 1",
            ));
        }
    }

    for (field, value) in [
        ("zoning.maxHeightFeet", zoning.max_height_feet),
        ("zoning.faaHeightLimitFeet", zoning.faa_height_limit_feet),
        ("zoning.residentialDensityPerAcre", zoning.residential_density_per_acre),
        ("zoning.lodgingDensityPerAcre", zoning.lodging_density_per_acre),
    ] {
        if matches!(value, Some(v) if v < Decimal::ZERO) {
            return Err(ZoneWiseError::invalid(field, "Value cannot be negative"));
        }
    }

    Ok(())
}

pub fn validate_setbacks(setbacks: &SetbackRequirements) -> ZoneWiseResult<()> {
    let all = [
        ("setbacks.primaryFrontage", Some(setbacks.primary_frontage)),
        ("setbacks.secondaryFrontage", setbacks.secondary_frontage),
        ("setbacks.side", setbacks.side),
        ("setbacks.rear", Some(setbacks.rear)),
        ("setbacks.water", setbacks.water),
    ];
    for (field, value) in all {
        if matches!(value, Some(v) if v < Decimal::ZERO) {
            return Err(ZoneWiseError::invalid(field, "Setback cannot be negative"));
        }
    }
    Ok(())
}

pub fn validate_actual_setbacks(actual: &ActualSetbacks) -> ZoneWiseResult<()> {
    let all = [
        ("actualSetbacks.front", Some(actual.front)),
        ("actualSetbacks.side", actual.side),
        ("actualSetbacks.rear", Some(actual.rear)),
    ];
    for (field, value) in all {
        if matches!(value, Some(v) if v < Decimal::ZERO) {
            return Err(ZoneWiseError::invalid(field, "Distance cannot be negative"));
        }
    }
    Ok(())
}

/// Reject market assumptions the scenario math cannot price.
pub fn validate_market(market: &MarketAssumptions) -> ZoneWiseResult<()> {
    for kind in ComponentKind::ALL {
        let c = market.component(kind);
        let field = |name: &str| format!("market.{}.{name}", kind.label());
        if c.hard_cost_per_sq_ft < Decimal::ZERO {
            return Err(ZoneWiseError::invalid(field("hardCostPerSqFt"), "Cannot be negative"));
        }
        if c.efficiency <= Decimal::ZERO || c.efficiency > Decimal::ONE {
            return Err(ZoneWiseError::invalid(
                field("efficiency"),
                "Must be greater than 0 and at most 1",
            ));
        }
        for (name, value) in [
            ("annualRevenuePerSqFt", c.annual_revenue_per_sq_ft),
            ("saleValuePerSqFt", c.sale_value_per_sq_ft),
        ] {
            if matches!(value, Some(v) if v < Decimal::ZERO) {
                return Err(ZoneWiseError::invalid(field(name), "Cannot be negative"));
            }
        }
        if matches!(c.cap_rate, Some(r) if r <= Decimal::ZERO) {
            return Err(ZoneWiseError::invalid(field("capRate"), "Cap rate must be positive"));
        }
        if matches!(c.average_unit_size, Some(s) if s <= Decimal::ZERO) {
            return Err(ZoneWiseError::invalid(
                field("averageUnitSize"),
                "Unit size must be positive",
            ));
        }
    }

    for (field, value) in [
        ("market.renovationCostPerSqFt", market.renovation_cost_per_sq_ft),
        ("market.landValuePerSqFt", market.land_value_per_sq_ft),
        ("market.blendedValuePerSqFt", market.blended_value_per_sq_ft),
        ("market.debtRate", market.debt_rate),
    ] {
        if value < Decimal::ZERO {
            return Err(ZoneWiseError::invalid(field, "Cannot be negative"));
        }
    }

    for (field, ratio) in [
        ("market.softCostRatio", market.soft_cost_ratio),
        ("market.financingCostRatio", market.financing_cost_ratio),
        ("market.contingencyRatio", market.contingency_ratio),
        ("market.sellingCostRatio", market.selling_cost_ratio),
    ] {
        if ratio < Decimal::ZERO || ratio > Decimal::ONE {
            return Err(ZoneWiseError::invalid(field, "Must be a fraction between 0 and 1"));
        }
    }
    if market.loan_to_cost < Decimal::ZERO || market.loan_to_cost >= Decimal::ONE {
        return Err(ZoneWiseError::invalid(
            "market.loanToCost",
            "Loan-to-cost must be at least 0 and below 1",
        ));
    }
    if market.discount_rate <= dec!(-1) {
        return Err(ZoneWiseError::invalid(
            "market.discountRate",
            "Discount rate must be greater than -100%",
        ));
    }
    if market.hold_period_years == 0 {
        return Err(ZoneWiseError::invalid(
            "market.holdPeriodYears",
            "Hold period must be at least one year",
        ));
    }
    if market.market_demand_score > 100 {
        return Err(ZoneWiseError::invalid(
            "market.marketDemandScore",
            "Score must be between 0 and 100",
        ));
    }
    Ok(())
}

fn validate_existing_building(
    existing: &ExistingBuildingMetrics,
    site: &SiteMetrics,
) -> ZoneWiseResult<()> {
    if existing.building_area < Decimal::ZERO {
        return Err(ZoneWiseError::invalid(
            "existingBuilding.buildingArea",
            "Building area cannot be negative",
        ));
    }
    if site.is_vacant && !existing.building_area.is_zero() {
        return Err(ZoneWiseError::invalid(
            "existingBuilding.buildingArea",
            "A vacant site cannot carry an existing building area",
        ));
    }
    if let Some(actual) = &existing.actual_setbacks {
        validate_actual_setbacks(actual)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarketPreset;
    use crate::property::LotType;

    fn site(acres: Decimal, sq_ft: Decimal) -> SiteMetrics {
        SiteMetrics {
            lot_area_acres: acres,
            lot_area_sq_ft: sq_ft,
            tax_record_area_sq_ft: None,
            parcel_shape_area_sq_ft: None,
            lot_type: LotType::Interior,
            frontage_length: None,
            is_vacant: false,
            current_land_use: None,
        }
    }

    #[test]
    fn test_lot_area_within_tolerance() {
        let config = AnalysisConfig::default();
        assert!(validate_site(&site(dec!(1), dec!(43560)), &config).is_ok());
        assert!(validate_site(&site(dec!(1), dec!(45000)), &config).is_ok());
        assert!(validate_site(&site(dec!(1), dec!(46000)), &config).is_err());
        assert!(validate_site(&site(dec!(0), dec!(0)), &config).is_ok());
    }

    #[test]
    fn test_negative_lot_area_rejected() {
        let err = validate_site(&site(dec!(-1), dec!(-43560)), &AnalysisConfig::default())
            .unwrap_err();
        match err {
            ZoneWiseError::InvalidInput { field, .. } => assert_eq!(field, "site.lotAreaAcres"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_parcel_shape_cannot_exceed_tax_record() {
        let mut s = site(dec!(1), dec!(43560));
        s.tax_record_area_sq_ft = Some(dec!(43560));
        s.parcel_shape_area_sq_ft = Some(dec!(43000));
        assert!(validate_site(&s, &AnalysisConfig::default()).is_ok());
        s.parcel_shape_area_sq_ft = Some(dec!(44000));
        assert!(validate_site(&s, &AnalysisConfig::default()).is_err());
    }

    #[test]
    fn test_negative_side_setback_rejected() {
        let setbacks = SetbackRequirements {
            primary_frontage: dec!(25),
            secondary_frontage: None,
            side: Some(dec!(-5)),
            rear: dec!(20),
            water: None,
        };
        assert!(validate_setbacks(&setbacks).is_err());
    }

    #[test]
    fn test_vacant_site_with_building_rejected() {
        let mut s = site(dec!(1), dec!(43560));
        s.is_vacant = true;
        let building = ExistingBuildingMetrics {
            building_area: dec!(2000),
            building_use: None,
            year_built: None,
            stories: None,
            condition: None,
            actual_setbacks: None,
        };
        assert!(validate_existing_building(&building, &s).is_err());

        let empty = ExistingBuildingMetrics {
            building_area: Decimal::ZERO,
            ..building
        };
        assert!(validate_existing_building(&empty, &s).is_ok());
    }

    #[test]
    fn test_presets_pass_market_validation() {
        for preset in MarketPreset::ALL {
            assert!(validate_market(&preset.assumptions()).is_ok(), "{preset}");
        }
    }

    #[test]
    fn test_market_with_zero_cap_rate_rejected() {
        let mut market = MarketPreset::OrlandoMetro.assumptions();
        market.office.cap_rate = Some(Decimal::ZERO);
        assert!(validate_market(&market).is_err());

        let mut market = MarketPreset::OrlandoMetro.assumptions();
        market.hold_period_years = 0;
        assert!(validate_market(&market).is_err());

        let mut market = MarketPreset::OrlandoMetro.assumptions();
        market.loan_to_cost = Decimal::ONE;
        assert!(validate_market(&market).is_err());
    }

    #[test]
    fn test_market_with_negative_prices_rejected() {
        let cases: [(&str, fn(&mut MarketAssumptions)); 6] = [
            ("market.landValuePerSqFt", |m| m.land_value_per_sq_ft = dec!(-18)),
            ("market.renovationCostPerSqFt", |m| m.renovation_cost_per_sq_ft = dec!(-95)),
            ("market.blendedValuePerSqFt", |m| m.blended_value_per_sq_ft = dec!(-1)),
            ("market.debtRate", |m| m.debt_rate = dec!(-0.07)),
            ("market.Office.annualRevenuePerSqFt", |m| {
                m.office.annual_revenue_per_sq_ft = Some(dec!(-30))
            }),
            ("market.Condominium.saleValuePerSqFt", |m| {
                m.condominium.sale_value_per_sq_ft = Some(dec!(-450))
            }),
        ];
        for (field, corrupt) in cases {
            let mut market = MarketPreset::OrlandoMetro.assumptions();
            corrupt(&mut market);
            let err = validate_market(&market).unwrap_err();
            assert!(err.to_string().contains(field), "{field}: {err}");
        }
    }
}
