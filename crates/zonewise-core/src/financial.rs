use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::capacity::{ratio, DevelopmentCapacity};
use crate::config::{AnalysisConfig, MarketAssumptions};
use crate::property::ExistingBuildingMetrics;
use crate::types::{Money, Percent, SqFt};
use crate::zoning::ZoningInfo;

/// Business-facing framing of a lot's unrealised development potential.
///
/// Several fields restate [`DevelopmentCapacity`] figures under the names the
/// report's financial section uses: `current_utilization` mirrors
/// `far_utilization_rate`, `additional_buildable_area` mirrors
/// `unused_development_rights`, and the unit potentials mirror the unit
/// ceilings. Consumers read both names, so both are kept and always agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialOpportunity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_utilization: Option<Percent>,
    /// 100 − current utilization, floored at zero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub untapped_development_potential: Option<Percent>,
    pub additional_buildable_area: SqFt,
    /// Stories the district allows above the existing structure
    pub vertical_expansion_stories: u32,
    /// Existing footprint as a share of the max footprint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_coverage_utilization: Option<Percent>,
    /// Max footprint a real floor plate typically achieves
    pub practical_footprint: SqFt,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residential_potential_units: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel_potential_rooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_value_per_buildable_sq_ft: Option<Money>,
    /// Additional buildable area × market blended value per sq ft
    pub untapped_value_estimate: Money,
}

pub fn calculate_financial_opportunity(
    zoning: &ZoningInfo,
    capacity: &DevelopmentCapacity,
    existing: Option<&ExistingBuildingMetrics>,
    land_value: Option<Money>,
    config: &AnalysisConfig,
    market: &MarketAssumptions,
) -> FinancialOpportunity {
    let current_utilization = capacity.far_utilization_rate;
    let untapped_development_potential =
        current_utilization.map(|u| (dec!(100) - u).max(Decimal::ZERO));

    let existing_stories = existing.and_then(|b| b.stories).unwrap_or(0);
    let existing_footprint = existing
        .map(|b| b.footprint())
        .unwrap_or(Decimal::ZERO);
    let lot_coverage_utilization =
        ratio(existing_footprint, capacity.max_footprint).map(|r| r * dec!(100));

    let additional_buildable_area = capacity.unused_development_rights;

    FinancialOpportunity {
        current_utilization,
        untapped_development_potential,
        additional_buildable_area,
        vertical_expansion_stories: zoning.max_stories.saturating_sub(existing_stories),
        lot_coverage_utilization,
        practical_footprint: capacity.max_footprint * config.typical_lot_coverage_utilization,
        residential_potential_units: capacity.max_residential_units,
        hotel_potential_rooms: capacity.max_lodging_rooms,
        land_value_per_buildable_sq_ft: land_value
            .and_then(|value| ratio(value, capacity.max_building_area)),
        untapped_value_estimate: additional_buildable_area * market.blended_value_per_sq_ft,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::calculate_development_capacity;
    use crate::config::MarketPreset;
    use crate::property::{LotType, SiteMetrics};
    use crate::zoning::AllowedUses;
    use pretty_assertions::assert_eq;

    fn site() -> SiteMetrics {
        SiteMetrics {
            lot_area_acres: dec!(0.2296),
            lot_area_sq_ft: dec!(10000),
            tax_record_area_sq_ft: None,
            parcel_shape_area_sq_ft: None,
            lot_type: LotType::Interior,
            frontage_length: None,
            is_vacant: false,
            current_land_use: None,
        }
    }

    fn zoning() -> ZoningInfo {
        ZoningInfo {
            zoning_code: "C-1".into(),
            zoning_district: "Neighborhood Commercial".into(),
            district_description: None,
            base_far: dec!(0.5),
            max_far: dec!(0.5),
            max_stories: 4,
            max_height_feet: None,
            max_lot_coverage: dec!(0.5),
            min_open_space: dec!(0.2),
            faa_height_limit_feet: None,
            historic_district: None,
            leed_requirement: None,
            live_local_applicable: false,
            tod_status: None,
            transit_corridor: false,
            residential_density_per_acre: Some(dec!(20)),
            lodging_density_per_acre: None,
        }
    }

    fn building() -> ExistingBuildingMetrics {
        ExistingBuildingMetrics {
            building_area: dec!(3000),
            building_use: None,
            year_built: None,
            stories: Some(1),
            condition: None,
            actual_setbacks: None,
        }
    }

    fn opportunity(existing: Option<&ExistingBuildingMetrics>) -> (DevelopmentCapacity, FinancialOpportunity) {
        let z = zoning();
        let cap = calculate_development_capacity(&site(), &z, existing, &AllowedUses::default());
        let config = AnalysisConfig::default();
        let market = MarketPreset::BrevardCounty.assumptions();
        let fo = calculate_financial_opportunity(&z, &cap, existing, Some(dec!(250000)), &config, &market);
        (cap, fo)
    }

    #[test]
    fn test_untapped_potential_complements_utilization() {
        let b = building();
        let (_, fo) = opportunity(Some(&b));
        assert_eq!(fo.current_utilization, Some(dec!(60)));
        assert_eq!(fo.untapped_development_potential, Some(dec!(40)));
        assert_eq!(fo.vertical_expansion_stories, 3);
        // 3,000 sq ft footprint over a 5,000 sq ft max footprint
        assert_eq!(fo.lot_coverage_utilization, Some(dec!(60)));
        assert_eq!(fo.practical_footprint, dec!(4250));
        assert_eq!(fo.land_value_per_buildable_sq_ft, Some(dec!(50)));
    }

    #[test]
    fn test_restated_fields_agree_with_capacity() {
        for existing in [None, Some(building())] {
            let (cap, fo) = opportunity(existing.as_ref());
            assert_eq!(fo.additional_buildable_area, cap.unused_development_rights);
            assert_eq!(fo.current_utilization, cap.far_utilization_rate);
            assert_eq!(fo.residential_potential_units, cap.max_residential_units);
            assert_eq!(fo.hotel_potential_rooms, cap.max_lodging_rooms);
        }
    }

    #[test]
    fn test_vacant_lot_is_fully_untapped() {
        let (cap, fo) = opportunity(None);
        assert_eq!(fo.untapped_development_potential, Some(dec!(100)));
        assert_eq!(fo.vertical_expansion_stories, 4);
        assert_eq!(fo.lot_coverage_utilization, Some(Decimal::ZERO));
        assert_eq!(
            fo.untapped_value_estimate,
            cap.max_building_area * dec!(260)
        );
    }

    #[test]
    fn test_overbuilt_lot_floors_untapped_at_zero() {
        let mut b = building();
        b.building_area = dec!(7500);
        let (_, fo) = opportunity(Some(&b));
        assert_eq!(fo.current_utilization, Some(dec!(150)));
        assert_eq!(fo.untapped_development_potential, Some(Decimal::ZERO));
        assert_eq!(fo.additional_buildable_area, Decimal::ZERO);
    }
}
