pub mod generator;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Money, Percent, Rate, SqFt};
use crate::zoning::UseCategory;

pub use generator::{generate_scenarios, ScenarioContext};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A priced program element within a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentKind {
    Residential,
    Condominium,
    Hotel,
    Office,
    Retail,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::Residential,
        ComponentKind::Condominium,
        ComponentKind::Hotel,
        ComponentKind::Office,
        ComponentKind::Retail,
    ];

    /// Zoning use category that must permit this component.
    pub fn use_category(&self) -> UseCategory {
        match self {
            ComponentKind::Residential | ComponentKind::Condominium => UseCategory::Residential,
            ComponentKind::Hotel => UseCategory::Lodging,
            ComponentKind::Office => UseCategory::Office,
            ComponentKind::Retail => UseCategory::Commercial,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::Residential => "Residential Rental",
            ComponentKind::Condominium => "Condominium",
            ComponentKind::Hotel => "Hotel",
            ComponentKind::Office => "Office",
            ComponentKind::Retail => "Retail",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScenarioType {
    MixedUse,
    ResidentialOnly,
    HotelCondo,
    OfficeExpansion,
    RetailDestination,
    AdaptiveReuse,
}

impl ScenarioType {
    /// Generation order.
    pub const ALL: [ScenarioType; 6] = [
        ScenarioType::MixedUse,
        ScenarioType::ResidentialOnly,
        ScenarioType::HotelCondo,
        ScenarioType::OfficeExpansion,
        ScenarioType::RetailDestination,
        ScenarioType::AdaptiveReuse,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioType::MixedUse => "Mixed-Use Development",
            ScenarioType::ResidentialOnly => "Residential Only",
            ScenarioType::HotelCondo => "Hotel / Condo",
            ScenarioType::OfficeExpansion => "Office Expansion",
            ScenarioType::RetailDestination => "Retail Destination",
            ScenarioType::AdaptiveReuse => "Adaptive Reuse",
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        match self {
            ScenarioType::ResidentialOnly | ScenarioType::AdaptiveReuse => RiskLevel::Low,
            ScenarioType::MixedUse
            | ScenarioType::OfficeExpansion
            | ScenarioType::RetailDestination => RiskLevel::Medium,
            ScenarioType::HotelCondo => RiskLevel::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketDemand {
    Strong,
    Moderate,
    Soft,
}

impl MarketDemand {
    /// Bucket a 0-100 market demand score.
    pub fn from_score(score: u32) -> Self {
        match score {
            75.. => MarketDemand::Strong,
            55..=74 => MarketDemand::Moderate,
            _ => MarketDemand::Soft,
        }
    }
}

impl fmt::Display for MarketDemand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MarketDemand::Strong => "Strong",
            MarketDemand::Moderate => "Moderate",
            MarketDemand::Soft => "Soft",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioComponent {
    pub kind: ComponentKind,
    pub name: String,
    /// Gross floor area
    pub area: SqFt,
    /// Rentable or sellable area
    pub net_area: SqFt,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_revenue: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_rate: Option<Rate>,
    pub asset_value: Money,
}

/// Development budget. `total_cost` is always the sum of the five lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub hard_costs: Money,
    pub soft_costs: Money,
    pub land_cost: Money,
    pub financing_costs: Money,
    pub contingency: Money,
    pub total_cost: Money,
}

impl CostBreakdown {
    pub fn new(
        hard_costs: Money,
        soft_costs: Money,
        land_cost: Money,
        financing_costs: Money,
        contingency: Money,
    ) -> Self {
        Self {
            hard_costs,
            soft_costs,
            land_cost,
            financing_costs,
            contingency,
            total_cost: hard_costs + soft_costs + land_cost + financing_costs + contingency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projections {
    /// Stabilised annual revenue of the income components
    pub total_revenue: Money,
    /// Total revenue ÷ value of the income components; absent for
    /// all-for-sale programs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighted_cap_rate: Option<Rate>,
    pub total_asset_value: Money,
    pub development_profit: Money,
    pub roi: Percent,
    pub irr: Percent,
    pub equity_multiple: Decimal,
    pub cash_on_cash: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npv: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevelopmentScenario {
    pub scenario_type: ScenarioType,
    pub name: String,
    pub description: String,
    pub components: Vec<ScenarioComponent>,
    pub total_sq_ft: SqFt,
    pub stories: u32,
    pub costs: CostBreakdown,
    pub projections: Projections,
    pub risk_level: RiskLevel,
    pub market_demand: MarketDemand,
    pub revenue_streams: u32,
    pub is_recommended: bool,
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// Ensure exactly one scenario is recommended and return its index.
///
/// An existing flag wins (the first one, if several are set). Otherwise the
/// highest IRR is chosen, ties going to the lowest total cost and then to
/// list order. Returns `None` only for an empty list.
pub fn select_recommended(scenarios: &mut [DevelopmentScenario]) -> Option<usize> {
    let chosen = scenarios
        .iter()
        .position(|s| s.is_recommended)
        .or_else(|| {
            scenarios
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    b.projections
                        .irr
                        .cmp(&a.projections.irr)
                        .then(a.costs.total_cost.cmp(&b.costs.total_cost))
                })
                .map(|(i, _)| i)
        })?;

    for (i, scenario) in scenarios.iter_mut().enumerate() {
        scenario.is_recommended = i == chosen;
    }
    Some(chosen)
}
