use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ZoneWiseError;
use crate::scenarios::ComponentKind;
use crate::types::{Acres, Money, Percent, Rate, SqFt};

// ---------------------------------------------------------------------------
// Engine-wide constants
// ---------------------------------------------------------------------------

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

/// Thresholds consulted by the executive-summary rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SummaryThresholds {
    /// Untapped potential (percent) above which the finding is reported
    pub untapped_potential_pct: Percent,
    /// Lots below this size are flagged as floor-plate constrained
    pub small_lot_acres: Acres,
    /// Minimum open-space fraction at or above which it is a challenge
    pub high_open_space: Rate,
    /// By-right use categories needed to call out a mixed-use program
    pub by_right_mix_categories: usize,
}

impl Default for SummaryThresholds {
    fn default() -> Self {
        Self {
            untapped_potential_pct: dec!(50),
            small_lot_acres: dec!(0.25),
            high_open_space: dec!(0.30),
            by_right_mix_categories: 2,
        }
    }
}

/// Ambient constants for an analysis run. Everything the calculators would
/// otherwise hard-code lives here so markets and tests can vary it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Share of the max footprint a real floor plate typically achieves
    pub typical_lot_coverage_utilization: Rate,
    /// Location used when a parcel has no coordinates (Malabar, FL)
    pub default_location: GeoPoint,
    /// Allowed relative gap between `lotAreaSqFt` and `lotAreaAcres × 43560`
    pub lot_area_tolerance: Rate,
    /// Smallest program a scenario may propose
    pub min_viable_building_area: SqFt,
    /// Annual rooftop solar yield placeholder, kWh per sq ft of footprint
    pub solar_yield_kwh_per_sq_ft: Decimal,
    /// Pins the year used for building age; defaults to the report year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_year: Option<i32>,
    pub report_version: String,
    pub summary: SummaryThresholds,
    /// Replaces the preset assumptions wholesale when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_override: Option<MarketAssumptions>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            typical_lot_coverage_utilization: dec!(0.85),
            default_location: GeoPoint {
                latitude: dec!(28.004),
                longitude: dec!(-80.5687),
            },
            lot_area_tolerance: dec!(0.05),
            min_viable_building_area: dec!(1000),
            solar_yield_kwh_per_sq_ft: dec!(15),
            analysis_year: None,
            report_version: "2.0.0".to_string(),
            summary: SummaryThresholds::default(),
            market_override: None,
        }
    }
}

impl AnalysisConfig {
    /// Market assumptions for a preset, honouring `market_override`.
    pub fn market(&self, preset: MarketPreset) -> MarketAssumptions {
        match &self.market_override {
            Some(custom) => custom.clone(),
            None => preset.assumptions(),
        }
    }
}

// ---------------------------------------------------------------------------
// Market presets
// ---------------------------------------------------------------------------

/// Named bundle of cost, revenue and capital-market assumptions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPreset {
    MiamiCbd,
    #[default]
    BrevardCounty,
    OrlandoMetro,
    TampaBay,
}

impl MarketPreset {
    pub const ALL: [MarketPreset; 4] = [
        MarketPreset::MiamiCbd,
        MarketPreset::BrevardCounty,
        MarketPreset::OrlandoMetro,
        MarketPreset::TampaBay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketPreset::MiamiCbd => "miami_cbd",
            MarketPreset::BrevardCounty => "brevard_county",
            MarketPreset::OrlandoMetro => "orlando_metro",
            MarketPreset::TampaBay => "tampa_bay",
        }
    }

    pub fn assumptions(&self) -> MarketAssumptions {
        match self {
            MarketPreset::MiamiCbd => MarketAssumptions {
                label: "Miami CBD".into(),
                residential: ComponentAssumptions::income(dec!(325), dec!(0.85), dec!(38), dec!(0.050), Some(dec!(950))),
                condominium: ComponentAssumptions::for_sale(dec!(375), dec!(0.85), dec!(900), dec!(1150)),
                hotel: ComponentAssumptions::income(dec!(420), dec!(0.70), dec!(62), dec!(0.065), Some(dec!(450))),
                office: ComponentAssumptions::income(dec!(310), dec!(0.88), dec!(42), dec!(0.060), None),
                retail: ComponentAssumptions::income(dec!(260), dec!(0.95), dec!(48), dec!(0.060), None),
                renovation_cost_per_sq_ft: dec!(165),
                land_value_per_sq_ft: dec!(450),
                blended_value_per_sq_ft: dec!(600),
                market_demand_score: 82,
                ..MarketAssumptions::florida_capital_markets()
            },
            MarketPreset::BrevardCounty => MarketAssumptions {
                label: "Brevard County".into(),
                residential: ComponentAssumptions::income(dec!(185), dec!(0.85), dec!(22), dec!(0.060), Some(dec!(1000))),
                condominium: ComponentAssumptions::for_sale(dec!(210), dec!(0.85), dec!(375), dec!(1200)),
                hotel: ComponentAssumptions::income(dec!(230), dec!(0.70), dec!(34), dec!(0.075), Some(dec!(425))),
                office: ComponentAssumptions::income(dec!(195), dec!(0.88), dec!(20), dec!(0.075), None),
                retail: ComponentAssumptions::income(dec!(165), dec!(0.95), dec!(19), dec!(0.070), None),
                renovation_cost_per_sq_ft: dec!(95),
                land_value_per_sq_ft: dec!(18),
                blended_value_per_sq_ft: dec!(260),
                soft_cost_ratio: dec!(0.22),
                market_demand_score: 64,
                ..MarketAssumptions::florida_capital_markets()
            },
            MarketPreset::OrlandoMetro => MarketAssumptions {
                label: "Orlando Metro".into(),
                residential: ComponentAssumptions::income(dec!(235), dec!(0.85), dec!(27), dec!(0.055), Some(dec!(975))),
                condominium: ComponentAssumptions::for_sale(dec!(260), dec!(0.85), dec!(480), dec!(1150)),
                hotel: ComponentAssumptions::income(dec!(290), dec!(0.70), dec!(44), dec!(0.070), Some(dec!(440))),
                office: ComponentAssumptions::income(dec!(240), dec!(0.88), dec!(28), dec!(0.070), None),
                retail: ComponentAssumptions::income(dec!(200), dec!(0.95), dec!(27), dec!(0.065), None),
                renovation_cost_per_sq_ft: dec!(120),
                land_value_per_sq_ft: dec!(85),
                blended_value_per_sq_ft: dec!(360),
                market_demand_score: 74,
                ..MarketAssumptions::florida_capital_markets()
            },
            MarketPreset::TampaBay => MarketAssumptions {
                label: "Tampa Bay".into(),
                residential: ComponentAssumptions::income(dec!(250), dec!(0.85), dec!(29), dec!(0.0525), Some(dec!(950))),
                condominium: ComponentAssumptions::for_sale(dec!(280), dec!(0.85), dec!(560), dec!(1150)),
                hotel: ComponentAssumptions::income(dec!(310), dec!(0.70), dec!(48), dec!(0.068), Some(dec!(440))),
                office: ComponentAssumptions::income(dec!(255), dec!(0.88), dec!(31), dec!(0.0675), None),
                retail: ComponentAssumptions::income(dec!(210), dec!(0.95), dec!(29), dec!(0.0625), None),
                renovation_cost_per_sq_ft: dec!(130),
                land_value_per_sq_ft: dec!(120),
                blended_value_per_sq_ft: dec!(400),
                market_demand_score: 77,
                ..MarketAssumptions::florida_capital_markets()
            },
        }
    }
}

impl fmt::Display for MarketPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketPreset {
    type Err = ZoneWiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarketPreset::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ZoneWiseError::UnknownMarketPreset(s.to_string()))
    }
}

/// Cost and revenue assumptions for one component type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentAssumptions {
    /// Construction hard cost per gross sq ft
    pub hard_cost_per_sq_ft: Money,
    /// Net rentable / sellable share of gross area
    pub efficiency: Rate,
    /// Net annual revenue per net sq ft (income components)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_revenue_per_sq_ft: Option<Money>,
    /// Capitalisation rate applied to annual revenue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_rate: Option<Rate>,
    /// Sale value per net sq ft (for-sale components)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_value_per_sq_ft: Option<Money>,
    /// Average net unit or key size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_unit_size: Option<SqFt>,
}

impl ComponentAssumptions {
    fn income(
        hard_cost_per_sq_ft: Money,
        efficiency: Rate,
        annual_revenue_per_sq_ft: Money,
        cap_rate: Rate,
        average_unit_size: Option<SqFt>,
    ) -> Self {
        Self {
            hard_cost_per_sq_ft,
            efficiency,
            annual_revenue_per_sq_ft: Some(annual_revenue_per_sq_ft),
            cap_rate: Some(cap_rate),
            sale_value_per_sq_ft: None,
            average_unit_size,
        }
    }

    fn for_sale(
        hard_cost_per_sq_ft: Money,
        efficiency: Rate,
        sale_value_per_sq_ft: Money,
        average_unit_size: SqFt,
    ) -> Self {
        Self {
            hard_cost_per_sq_ft,
            efficiency,
            annual_revenue_per_sq_ft: None,
            cap_rate: None,
            sale_value_per_sq_ft: Some(sale_value_per_sq_ft),
            average_unit_size: Some(average_unit_size),
        }
    }
}

/// Everything the scenario generator needs to price a program in one market.
///
/// The cost ratios, the flat selling cost and the leverage are business
/// policy rather than engineering facts; they are tuned here, never in
/// calculation code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAssumptions {
    pub label: String,
    pub residential: ComponentAssumptions,
    pub condominium: ComponentAssumptions,
    pub hotel: ComponentAssumptions,
    pub office: ComponentAssumptions,
    pub retail: ComponentAssumptions,
    /// Hard cost per sq ft when converting an existing building
    pub renovation_cost_per_sq_ft: Money,
    /// Land value per sq ft of lot, used when no land value is supplied
    pub land_value_per_sq_ft: Money,
    /// Completed value per buildable sq ft across uses
    pub blended_value_per_sq_ft: Money,
    pub soft_cost_ratio: Rate,
    pub financing_cost_ratio: Rate,
    pub contingency_ratio: Rate,
    pub selling_cost_ratio: Rate,
    pub loan_to_cost: Rate,
    pub debt_rate: Rate,
    pub discount_rate: Rate,
    pub hold_period_years: u32,
    /// Placeholder demand score (0-100) pending a market study
    pub market_demand_score: u32,
}

impl MarketAssumptions {
    /// Capital-market defaults shared by every Florida preset.
    fn florida_capital_markets() -> Self {
        let blank = ComponentAssumptions::income(
            Decimal::ZERO,
            Decimal::ONE,
            Decimal::ZERO,
            Decimal::ONE,
            None,
        );
        Self {
            label: "Florida".into(),
            residential: blank.clone(),
            condominium: blank.clone(),
            hotel: blank.clone(),
            office: blank.clone(),
            retail: blank,
            renovation_cost_per_sq_ft: Decimal::ZERO,
            land_value_per_sq_ft: Decimal::ZERO,
            blended_value_per_sq_ft: Decimal::ZERO,
            soft_cost_ratio: dec!(0.25),
            financing_cost_ratio: dec!(0.06),
            contingency_ratio: dec!(0.05),
            selling_cost_ratio: dec!(0.08),
            loan_to_cost: dec!(0.50),
            debt_rate: dec!(0.072),
            discount_rate: dec!(0.10),
            hold_period_years: 3,
            market_demand_score: 50,
        }
    }

    pub fn component(&self, kind: ComponentKind) -> &ComponentAssumptions {
        match kind {
            ComponentKind::Residential => &self.residential,
            ComponentKind::Condominium => &self.condominium,
            ComponentKind::Hotel => &self.hotel,
            ComponentKind::Office => &self.office,
            ComponentKind::Retail => &self.retail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_round_trips_through_str() {
        for preset in MarketPreset::ALL {
            assert_eq!(preset.as_str().parse::<MarketPreset>().unwrap(), preset);
        }
        assert_eq!(
            "MIAMI_CBD".parse::<MarketPreset>().unwrap(),
            MarketPreset::MiamiCbd
        );
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let err = "atlantis".parse::<MarketPreset>().unwrap_err();
        assert!(matches!(err, ZoneWiseError::UnknownMarketPreset(_)));
    }

    #[test]
    fn test_market_override_replaces_preset() {
        let mut custom = MarketPreset::TampaBay.assumptions();
        custom.label = "Custom".into();
        let config = AnalysisConfig {
            market_override: Some(custom),
            ..AnalysisConfig::default()
        };
        assert_eq!(config.market(MarketPreset::MiamiCbd).label, "Custom");
    }

    #[test]
    fn test_presets_price_every_component() {
        for preset in MarketPreset::ALL {
            let m = preset.assumptions();
            for kind in ComponentKind::ALL {
                let c = m.component(kind);
                assert!(c.hard_cost_per_sq_ft > Decimal::ZERO, "{preset} {kind:?}");
                assert!(
                    c.annual_revenue_per_sq_ft.is_some() || c.sale_value_per_sq_ft.is_some(),
                    "{preset} {kind:?} has no revenue model"
                );
            }
        }
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "minViableBuildingArea": "2500" }"#).unwrap();
        assert_eq!(config.min_viable_building_area, dec!(2500));
        assert_eq!(config.typical_lot_coverage_utilization, dec!(0.85));
        assert_eq!(config.summary.untapped_potential_pct, dec!(50));
    }
}
