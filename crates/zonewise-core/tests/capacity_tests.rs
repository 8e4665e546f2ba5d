mod common;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use zonewise_core::kpi::{Confidence, KpiValue};
use zonewise_core::{analyze_site, calculate_kpis, run_capacity_analysis, ZoneWiseError};

use common::{config, corridor_lot, vacant_lot};

// ===========================================================================
// Capacity arithmetic
// ===========================================================================

#[test]
fn test_capacity_arithmetic_on_corridor_lot() {
    let analysis = analyze_site(&corridor_lot(), &config()).unwrap();
    let c = &analysis.capacity;

    // 0.5 FAR × 10,000 sq ft
    assert_eq!(c.max_building_area, dec!(5000));
    assert_eq!(c.unused_development_rights, dec!(2000));
    // 3,000 / 10,000 = 0.3 of a 0.5 max
    assert_eq!(c.current_far_utilization, Some(dec!(0.3)));
    assert_eq!(c.far_utilization_rate, Some(dec!(60)));
    assert_eq!(c.max_footprint, dec!(4000));
    // floor(20 × 0.2296)
    assert_eq!(c.max_residential_units, Some(4));
    assert_eq!(c.max_lodging_rooms, None);
    assert!(!c.is_nonconforming);
}

#[test]
fn test_nonconforming_lot_warns_and_reports_over_100_percent() {
    let mut input = corridor_lot();
    if let Some(building) = input.existing_building.as_mut() {
        building.building_area = dec!(6000);
    }
    let analysis = analyze_site(&input, &config()).unwrap();

    assert!(analysis.capacity.is_nonconforming);
    assert_eq!(analysis.capacity.unused_development_rights, Decimal::ZERO);
    assert_eq!(analysis.capacity.far_utilization_rate, Some(dec!(120)));
    assert_eq!(
        analysis.financial_opportunity.untapped_development_potential,
        Some(Decimal::ZERO)
    );
    assert!(analysis.warnings.iter().any(|w| w.contains("exceeds")));
}

#[test]
fn test_restated_fields_agree() {
    let analysis = analyze_site(&corridor_lot(), &config()).unwrap();
    let c = &analysis.capacity;
    let f = &analysis.financial_opportunity;

    assert_eq!(f.current_utilization, c.far_utilization_rate);
    assert_eq!(f.additional_buildable_area, c.unused_development_rights);
    assert_eq!(f.residential_potential_units, c.max_residential_units);
    assert_eq!(f.hotel_potential_rooms, c.max_lodging_rooms);
    // 2,000 sq ft × $260 blended value
    assert_eq!(f.untapped_value_estimate, dec!(520000));
}

// ===========================================================================
// Degenerate inputs
// ===========================================================================

#[test]
fn test_zero_lot_area_leaves_ratios_absent() {
    let mut input = vacant_lot();
    input.site.lot_area_acres = Decimal::ZERO;
    input.site.lot_area_sq_ft = Decimal::ZERO;

    let analysis = analyze_site(&input, &config()).unwrap();
    assert_eq!(analysis.capacity.max_building_area, Decimal::ZERO);
    assert_eq!(analysis.capacity.current_far_utilization, None);
    assert_eq!(analysis.capacity.far_utilization_rate, None);
    assert_eq!(analysis.financial_opportunity.untapped_development_potential, None);
    assert!(analysis.warnings.iter().any(|w| w.contains("Lot area is zero")));

    let kpis = calculate_kpis(&input, &config()).unwrap();
    let far = kpis.iter().find(|k| k.name == "FAR Utilization Rate").unwrap();
    assert_eq!(far.value, KpiValue::NotAvailable);
    assert_eq!(far.confidence, Confidence::Low);
}

#[test]
fn test_vacant_site_has_all_rights_unused() {
    let analysis = analyze_site(&vacant_lot(), &config()).unwrap();
    assert_eq!(analysis.capacity.existing_building_area, Decimal::ZERO);
    assert_eq!(
        analysis.capacity.unused_development_rights,
        analysis.capacity.max_building_area
    );
    assert_eq!(analysis.capacity.far_utilization_rate, Some(Decimal::ZERO));
    assert_eq!(
        analysis.financial_opportunity.untapped_development_potential,
        Some(dec!(100))
    );
    assert!(analysis.setback_compliance.is_none());
}

// ===========================================================================
// Validation
// ===========================================================================

#[test]
fn test_negative_lot_area_rejected() {
    let mut input = corridor_lot();
    input.site.lot_area_sq_ft = dec!(-1);
    input.site.lot_area_acres = dec!(-0.00002);
    match analyze_site(&input, &config()) {
        Err(ZoneWiseError::InvalidInput { field, .. }) => assert_eq!(field, "site.lotAreaAcres"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_inconsistent_lot_area_rejected() {
    let mut input = corridor_lot();
    input.site.lot_area_sq_ft = dec!(20000);
    assert!(analyze_site(&input, &config()).is_err());
}

#[test]
fn test_capacity_envelope_carries_metadata() {
    let out = run_capacity_analysis(&corridor_lot(), &config()).unwrap();
    assert!(out.methodology.contains("FAR"));
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    assert_eq!(out.result.capacity.max_building_area, dec!(5000));
}
