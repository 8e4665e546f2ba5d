use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::property::{ExistingBuildingMetrics, SiteMetrics};
use crate::types::{Acres, Feet, Percent, Rate, SqFt};
use crate::zoning::{AllowedUses, UseCategory, ZoningInfo};

/// Aggregate development capacity of a lot under its zoning.
///
/// Optional fields are absent when the figure cannot be derived (no density,
/// zero lot area). Absence is distinct from zero capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevelopmentCapacity {
    /// Max FAR × lot area
    pub max_building_area: SqFt,
    /// Base FAR × lot area
    pub base_building_area: SqFt,
    /// Floor area reachable only through bonuses
    pub bonus_building_area: SqFt,
    /// Max lot coverage × lot area
    pub max_footprint: SqFt,
    /// Min open space × lot area
    pub min_open_space_area: SqFt,
    pub existing_building_area: SqFt,
    /// Max building area less existing area, floored at zero
    pub unused_development_rights: SqFt,
    /// Existing area exceeds what the district now allows
    pub is_nonconforming: bool,
    /// Existing building area ÷ lot area
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_far_utilization: Option<Rate>,
    /// Current FAR as a percentage of max FAR. Unclamped: over-built lots
    /// report values above 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub far_utilization_rate: Option<Percent>,
    pub max_building_height_stories: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_height_limit_feet: Option<Feet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_residential_units: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lodging_rooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_office_area: Option<SqFt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ground_floor_commercial_area: Option<SqFt>,
}

/// Derive development capacity from site, zoning and any existing building.
pub fn calculate_development_capacity(
    site: &SiteMetrics,
    zoning: &ZoningInfo,
    existing: Option<&ExistingBuildingMetrics>,
    allowed_uses: &AllowedUses,
) -> DevelopmentCapacity {
    let lot = site.lot_area_sq_ft;

    let max_building_area = zoning.max_far * lot;
    let base_building_area = zoning.base_far * lot;
    let max_footprint = zoning.max_lot_coverage * lot;
    let existing_building_area = existing
        .map(|b| b.building_area)
        .unwrap_or(Decimal::ZERO);

    let current_far_utilization = ratio(existing_building_area, lot);
    let far_utilization_rate = current_far_utilization
        .and_then(|current| ratio(current, zoning.max_far))
        .map(|r| r * dec!(100));

    DevelopmentCapacity {
        max_building_area,
        base_building_area,
        bonus_building_area: max_building_area - base_building_area,
        max_footprint,
        min_open_space_area: zoning.min_open_space * lot,
        existing_building_area,
        unused_development_rights: (max_building_area - existing_building_area)
            .max(Decimal::ZERO),
        is_nonconforming: existing_building_area > max_building_area,
        current_far_utilization,
        far_utilization_rate,
        max_building_height_stories: zoning.max_stories,
        effective_height_limit_feet: zoning.effective_height_limit(),
        max_residential_units: unit_ceiling(zoning.residential_density_per_acre, site.lot_area_acres),
        max_lodging_rooms: unit_ceiling(zoning.lodging_density_per_acre, site.lot_area_acres),
        max_office_area: allowed_uses
            .permits(UseCategory::Office)
            .then_some(max_building_area),
        max_ground_floor_commercial_area: allowed_uses
            .permits(UseCategory::Commercial)
            .then_some(max_footprint),
    }
}

/// `numerator / denominator`, or `None` for a zero denominator.
pub(crate) fn ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        None
    } else {
        numerator.checked_div(denominator)
    }
}

/// `floor(density × acres)`; absent when no density is regulated.
fn unit_ceiling(density_per_acre: Option<Rate>, acres: Acres) -> Option<u32> {
    density_per_acre.and_then(|d| (d * acres).floor().to_u32())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::LotType;
    use crate::zoning::UsePermissions;
    use pretty_assertions::assert_eq;

    fn site(sq_ft: Decimal, acres: Decimal, vacant: bool) -> SiteMetrics {
        SiteMetrics {
            lot_area_acres: acres,
            lot_area_sq_ft: sq_ft,
            tax_record_area_sq_ft: None,
            parcel_shape_area_sq_ft: None,
            lot_type: LotType::Interior,
            frontage_length: None,
            is_vacant: vacant,
            current_land_use: None,
        }
    }

    fn zoning(max_far: Decimal) -> ZoningInfo {
        ZoningInfo {
            zoning_code: "RS-10".into(),
            zoning_district: "Single-Family Residential".into(),
            district_description: None,
            base_far: max_far,
            max_far,
            max_stories: 3,
            max_height_feet: Some(dec!(35)),
            max_lot_coverage: dec!(0.4),
            min_open_space: dec!(0.3),
            faa_height_limit_feet: None,
            historic_district: None,
            leed_requirement: None,
            live_local_applicable: false,
            tod_status: None,
            transit_corridor: false,
            residential_density_per_acre: None,
            lodging_density_per_acre: None,
        }
    }

    fn building(area: Decimal) -> ExistingBuildingMetrics {
        ExistingBuildingMetrics {
            building_area: area,
            building_use: Some("Retail".into()),
            year_built: Some(1985),
            stories: Some(1),
            condition: None,
            actual_setbacks: None,
        }
    }

    #[test]
    fn test_capacity_arithmetic() {
        let b = building(dec!(3000));
        let cap = calculate_development_capacity(
            &site(dec!(10000), dec!(0.2296), false),
            &zoning(dec!(0.5)),
            Some(&b),
            &AllowedUses::default(),
        );
        assert_eq!(cap.max_building_area, dec!(5000));
        assert_eq!(cap.unused_development_rights, dec!(2000));
        assert_eq!(cap.current_far_utilization, Some(dec!(0.3)));
        assert_eq!(cap.far_utilization_rate, Some(dec!(60)));
        assert_eq!(cap.max_footprint, dec!(4000));
        assert!(!cap.is_nonconforming);
    }

    #[test]
    fn test_zero_lot_area_leaves_ratios_absent() {
        let cap = calculate_development_capacity(
            &site(dec!(0), dec!(0), true),
            &zoning(dec!(0.5)),
            None,
            &AllowedUses::default(),
        );
        assert_eq!(cap.current_far_utilization, None);
        assert_eq!(cap.far_utilization_rate, None);
        assert_eq!(cap.max_building_area, Decimal::ZERO);
    }

    #[test]
    fn test_zero_max_far_leaves_rate_absent() {
        let b = building(dec!(1000));
        let cap = calculate_development_capacity(
            &site(dec!(10000), dec!(0.2296), false),
            &zoning(dec!(0)),
            Some(&b),
            &AllowedUses::default(),
        );
        assert_eq!(cap.current_far_utilization, Some(dec!(0.1)));
        assert_eq!(cap.far_utilization_rate, None);
    }

    #[test]
    fn test_vacant_lot_keeps_all_rights() {
        let cap = calculate_development_capacity(
            &site(dec!(21780), dec!(0.5), true),
            &zoning(dec!(0.35)),
            None,
            &AllowedUses::default(),
        );
        assert_eq!(cap.unused_development_rights, cap.max_building_area);
        assert_eq!(cap.current_far_utilization, Some(Decimal::ZERO));
        assert_eq!(cap.far_utilization_rate, Some(Decimal::ZERO));
    }

    #[test]
    fn test_overbuilt_lot_reports_raw_rate() {
        let b = building(dec!(8000));
        let cap = calculate_development_capacity(
            &site(dec!(10000), dec!(0.2296), false),
            &zoning(dec!(0.5)),
            Some(&b),
            &AllowedUses::default(),
        );
        assert_eq!(cap.unused_development_rights, Decimal::ZERO);
        assert!(cap.is_nonconforming);
        assert_eq!(cap.far_utilization_rate, Some(dec!(160)));
    }

    #[test]
    fn test_unit_ceilings_only_with_density() {
        let mut z = zoning(dec!(2));
        z.residential_density_per_acre = Some(dec!(36));
        let cap = calculate_development_capacity(
            &site(dec!(21780), dec!(0.5), true),
            &z,
            None,
            &AllowedUses::default(),
        );
        assert_eq!(cap.max_residential_units, Some(18));
        assert_eq!(cap.max_lodging_rooms, None);

        z.lodging_density_per_acre = Some(dec!(0));
        let cap = calculate_development_capacity(
            &site(dec!(21780), dec!(0.5), true),
            &z,
            None,
            &AllowedUses::default(),
        );
        assert_eq!(cap.max_lodging_rooms, Some(0));
    }

    #[test]
    fn test_office_and_commercial_ceilings_follow_permitted_uses() {
        let uses = AllowedUses {
            office: UsePermissions {
                by_warrant: vec!["Office".into()],
                ..Default::default()
            },
            ..Default::default()
        };
        let cap = calculate_development_capacity(
            &site(dec!(10000), dec!(0.2296), true),
            &zoning(dec!(1)),
            None,
            &uses,
        );
        assert_eq!(cap.max_office_area, Some(dec!(10000)));
        assert_eq!(cap.max_ground_floor_commercial_area, None);
    }
}
