use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::{
    select_recommended, ComponentKind, CostBreakdown, DevelopmentScenario, MarketDemand,
    Projections, ScenarioComponent, ScenarioType,
};
use crate::capacity::{ratio, DevelopmentCapacity};
use crate::config::{AnalysisConfig, MarketAssumptions};
use crate::financial::FinancialOpportunity;
use crate::format::{format_sq_ft, round_half_up};
use crate::property::SiteMetrics;
use crate::time_value::{annualized_return, npv};
use crate::types::{Money, Rate, SqFt};
use crate::zoning::{AllowedUses, UseCategory, ZoningInfo};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything the generator reads. All figures are already validated.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioContext<'a> {
    pub site: &'a SiteMetrics,
    pub zoning: &'a ZoningInfo,
    pub allowed_uses: &'a AllowedUses,
    pub capacity: &'a DevelopmentCapacity,
    pub financial: &'a FinancialOpportunity,
    /// Supplied land value; priced from the market when absent
    pub land_value: Option<Money>,
    pub market: &'a MarketAssumptions,
    pub config: &'a AnalysisConfig,
}

/// Component mix and floor area of one archetype after zoning filters.
struct Program {
    anchor: ComponentKind,
    mix: Vec<(ComponentKind, Rate)>,
    area: SqFt,
    renovation: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build every feasible archetype in fixed order and mark one recommended.
///
/// Mixed-Use is flagged up front when enough use categories are permitted
/// by right; otherwise the highest IRR wins. An infeasible lot yields an
/// empty list.
pub fn generate_scenarios(ctx: &ScenarioContext) -> Vec<DevelopmentScenario> {
    let mut scenarios: Vec<DevelopmentScenario> = ScenarioType::ALL
        .into_iter()
        .filter_map(|scenario_type| build_scenario(ctx, scenario_type))
        .collect();

    let by_right = ctx.allowed_uses.by_right_categories().len();
    if by_right >= ctx.config.summary.by_right_mix_categories {
        if let Some(mixed) = scenarios
            .iter_mut()
            .find(|s| s.scenario_type == ScenarioType::MixedUse)
        {
            mixed.is_recommended = true;
        }
    }

    select_recommended(&mut scenarios);
    scenarios
}

// ---------------------------------------------------------------------------
// Program selection
// ---------------------------------------------------------------------------

fn program(ctx: &ScenarioContext, scenario_type: ScenarioType) -> Option<Program> {
    use ComponentKind::*;

    let uses = ctx.allowed_uses;
    let max_area = ctx.capacity.max_building_area;

    let (mix, area, renovation) = match scenario_type {
        ScenarioType::MixedUse => (
            vec![(Residential, dec!(0.70)), (Retail, dec!(0.15)), (Office, dec!(0.15))],
            max_area,
            false,
        ),
        ScenarioType::ResidentialOnly => (vec![(Residential, Decimal::ONE)], max_area, false),
        ScenarioType::HotelCondo => {
            ctx.zoning.lodging_density_per_acre?;
            (vec![(Hotel, dec!(0.60)), (Condominium, dec!(0.40))], max_area, false)
        }
        ScenarioType::OfficeExpansion => (
            vec![(Office, dec!(0.85)), (Retail, dec!(0.15))],
            max_area,
            false,
        ),
        ScenarioType::RetailDestination => (vec![(Retail, Decimal::ONE)], max_area, false),
        ScenarioType::AdaptiveReuse => {
            let existing = ctx.capacity.existing_building_area;
            if existing <= Decimal::ZERO {
                return None;
            }
            let holds_units = ctx.capacity.max_residential_units != Some(0);
            let kind = if uses.permits(UseCategory::Residential) && holds_units {
                Residential
            } else {
                Office
            };
            (vec![(kind, Decimal::ONE)], existing, true)
        }
    };

    // The first component anchors the archetype and must be permitted.
    let anchor = mix[0].0;
    let permitted: Vec<(ComponentKind, Rate)> = mix
        .into_iter()
        .filter(|(kind, _)| uses.permits(kind.use_category()))
        .collect();
    if permitted.first().map(|(kind, _)| *kind) != Some(anchor) {
        return None;
    }
    if scenario_type == ScenarioType::MixedUse && permitted.len() < 2 {
        return None;
    }

    if area < ctx.config.min_viable_building_area {
        debug!(
            scenario = scenario_type.name(),
            area = %area,
            "skipping archetype below minimum viable area"
        );
        return None;
    }

    let share_total: Rate = permitted.iter().map(|(_, share)| *share).sum();
    let mix = permitted
        .into_iter()
        .map(|(kind, share)| (kind, share / share_total))
        .collect();

    Some(Program {
        anchor,
        mix,
        area,
        renovation,
    })
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

fn build_scenario(ctx: &ScenarioContext, scenario_type: ScenarioType) -> Option<DevelopmentScenario> {
    let program = program(ctx, scenario_type)?;
    let market = ctx.market;

    let components: Vec<ScenarioComponent> = program
        .mix
        .iter()
        .map(|(kind, share)| price_component(ctx, *kind, program.area * share))
        .filter(|c| c.area > Decimal::ZERO)
        .collect();

    let total_sq_ft: SqFt = components.iter().map(|c| c.area).sum();
    if !still_feasible(ctx, scenario_type, program.anchor, &components, total_sq_ft) {
        debug!(
            scenario = scenario_type.name(),
            total_sq_ft = %total_sq_ft,
            "skipping archetype after density ceilings"
        );
        return None;
    }

    // --- Costs ---
    let hard = money(
        components
            .iter()
            .map(|c| {
                let per_sq_ft = if program.renovation {
                    market.renovation_cost_per_sq_ft
                } else {
                    market.component(c.kind).hard_cost_per_sq_ft
                };
                c.area * per_sq_ft
            })
            .sum(),
    );
    let soft = money(hard * market.soft_cost_ratio);
    let land = money(
        ctx.land_value
            .unwrap_or(ctx.site.lot_area_sq_ft * market.land_value_per_sq_ft),
    );
    let financing = money((hard + soft) * market.financing_cost_ratio);
    let contingency = money(hard * market.contingency_ratio);
    let costs = CostBreakdown::new(hard, soft, land, financing, contingency);

    let projections = project(&components, &costs, market);

    let names: Vec<&str> = components.iter().map(|c| c.name.as_str()).collect();
    let description = format!(
        "{}: {} of {}",
        lead_in(scenario_type),
        format_sq_ft(total_sq_ft),
        names.join(", ")
    );

    debug!(
        scenario = scenario_type.name(),
        total_cost = %costs.total_cost,
        irr = %projections.irr,
        "priced scenario"
    );

    Some(DevelopmentScenario {
        scenario_type,
        name: scenario_type.name().to_string(),
        description,
        revenue_streams: components.len() as u32,
        stories: stories(ctx, total_sq_ft),
        components,
        total_sq_ft,
        costs,
        projections,
        risk_level: scenario_type.risk_level(),
        market_demand: MarketDemand::from_score(market.market_demand_score),
        is_recommended: false,
    })
}

/// Density ceilings can shrink components to nothing; the priced program
/// must still satisfy the same rules as the planned one.
fn still_feasible(
    ctx: &ScenarioContext,
    scenario_type: ScenarioType,
    anchor: ComponentKind,
    components: &[ScenarioComponent],
    total_sq_ft: SqFt,
) -> bool {
    if components.first().map(|c| c.kind) != Some(anchor) {
        return false;
    }
    if scenario_type == ScenarioType::MixedUse && components.len() < 2 {
        return false;
    }
    total_sq_ft >= ctx.config.min_viable_building_area
}

fn price_component(ctx: &ScenarioContext, kind: ComponentKind, planned_area: SqFt) -> ScenarioComponent {
    let assumptions = ctx.market.component(kind);
    let mut area = money(planned_area);
    let mut net_area = money(area * assumptions.efficiency);

    let ceiling = match kind {
        ComponentKind::Residential | ComponentKind::Condominium => {
            ctx.capacity.max_residential_units
        }
        ComponentKind::Hotel => ctx.capacity.max_lodging_rooms,
        ComponentKind::Office | ComponentKind::Retail => None,
    };

    let mut units = None;
    if let Some(size) = assumptions.average_unit_size.filter(|s| *s > Decimal::ZERO) {
        let by_area = (net_area / size).floor().to_u32().unwrap_or(0);
        match ceiling {
            // Density binds: shrink the component to the units it may hold.
            Some(cap) if cap < by_area => {
                net_area = Decimal::from(cap) * size;
                area = money(ratio(net_area, assumptions.efficiency).unwrap_or(area));
                units = Some(cap);
            }
            _ => units = Some(by_area),
        }
    }

    let (annual_revenue, cap_rate, asset_value) = match (
        assumptions.annual_revenue_per_sq_ft,
        assumptions.cap_rate,
        assumptions.sale_value_per_sq_ft,
    ) {
        (Some(revenue_per_sq_ft), Some(cap_rate), _) => {
            let revenue = money(net_area * revenue_per_sq_ft);
            let value = money(ratio(revenue, cap_rate).unwrap_or(Decimal::ZERO));
            (Some(revenue), Some(cap_rate), value)
        }
        (_, _, Some(sale_per_sq_ft)) => (None, None, money(net_area * sale_per_sq_ft)),
        _ => (None, None, Decimal::ZERO),
    };

    ScenarioComponent {
        kind,
        name: kind.label().to_string(),
        area,
        net_area,
        units,
        annual_revenue,
        cap_rate,
        asset_value,
    }
}

fn project(
    components: &[ScenarioComponent],
    costs: &CostBreakdown,
    market: &MarketAssumptions,
) -> Projections {
    let total_revenue: Money = components.iter().filter_map(|c| c.annual_revenue).sum();
    let income_value: Money = components
        .iter()
        .filter(|c| c.annual_revenue.is_some())
        .map(|c| c.asset_value)
        .sum();
    let total_asset_value: Money = components.iter().map(|c| c.asset_value).sum();

    let total_cost = costs.total_cost;
    let development_profit = total_asset_value - total_cost;
    let roi = percent(ratio(development_profit, total_cost));

    // --- Leveraged returns over the hold ---
    let equity = total_cost * (Decimal::ONE - market.loan_to_cost);
    let loan = total_cost - equity;
    let net_exit = total_asset_value * (Decimal::ONE - market.selling_cost_ratio) - loan;
    let multiple = ratio(net_exit.max(Decimal::ZERO), equity).unwrap_or(Decimal::ZERO);
    let irr = percent(annualized_return(multiple, market.hold_period_years));
    let cash_on_cash = percent(ratio(total_revenue - loan * market.debt_rate, equity));

    let npv = (market.hold_period_years > 0)
        .then(|| {
            let years = market.hold_period_years as usize;
            let mut flows = vec![Decimal::ZERO; years + 1];
            flows[0] = -equity;
            flows[years] = net_exit;
            npv(market.discount_rate, &flows).ok().map(money)
        })
        .flatten();

    Projections {
        total_revenue,
        weighted_cap_rate: ratio(total_revenue, income_value).map(|r| round_half_up(r, 4)),
        total_asset_value,
        development_profit,
        roi,
        irr,
        equity_multiple: round_half_up(multiple, 2),
        cash_on_cash,
        npv,
    }
}

/// Stories needed to stack the program on a typical floor plate, capped
/// by the district.
fn stories(ctx: &ScenarioContext, total_sq_ft: SqFt) -> u32 {
    let max_stories = ctx.zoning.max_stories.max(1);
    ratio(total_sq_ft, ctx.financial.practical_footprint)
        .and_then(|floors| floors.ceil().to_u32())
        .map_or(max_stories, |floors| floors.clamp(1, max_stories))
}

fn lead_in(scenario_type: ScenarioType) -> &'static str {
    match scenario_type {
        ScenarioType::MixedUse => "Vertical mixed-use program",
        ScenarioType::ResidentialOnly => "Multifamily rental build-out to max FAR",
        ScenarioType::HotelCondo => "Hotel with condominium residences",
        ScenarioType::OfficeExpansion => "Office build-out with ground-floor retail",
        ScenarioType::RetailDestination => "Destination retail build-out",
        ScenarioType::AdaptiveReuse => "Conversion of the existing building",
    }
}

fn money(value: Decimal) -> Money {
    round_half_up(value, 2)
}

fn percent(rate: Option<Rate>) -> Decimal {
    rate.map(|r| round_half_up(r * dec!(100), 2))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::calculate_development_capacity;
    use crate::config::MarketPreset;
    use crate::financial::calculate_financial_opportunity;
    use crate::property::{ExistingBuildingMetrics, LotType};
    use crate::zoning::UsePermissions;
    use pretty_assertions::assert_eq;

    fn site(vacant: bool) -> SiteMetrics {
        SiteMetrics {
            lot_area_acres: dec!(1),
            lot_area_sq_ft: dec!(43560),
            tax_record_area_sq_ft: None,
            parcel_shape_area_sq_ft: None,
            lot_type: LotType::Corner,
            frontage_length: Some(dec!(200)),
            is_vacant: vacant,
            current_land_use: None,
        }
    }

    fn zoning() -> ZoningInfo {
        ZoningInfo {
            zoning_code: "MU-2".into(),
            zoning_district: "Mixed Use Corridor".into(),
            district_description: None,
            base_far: dec!(1.5),
            max_far: dec!(2),
            max_stories: 5,
            max_height_feet: Some(dec!(65)),
            max_lot_coverage: dec!(0.6),
            min_open_space: dec!(0.2),
            faa_height_limit_feet: None,
            historic_district: None,
            leed_requirement: None,
            live_local_applicable: false,
            tod_status: None,
            transit_corridor: false,
            residential_density_per_acre: None,
            lodging_density_per_acre: Some(dec!(80)),
        }
    }

    fn permit(label: &str) -> UsePermissions {
        UsePermissions {
            by_right: vec![label.into()],
            ..Default::default()
        }
    }

    fn uses() -> AllowedUses {
        AllowedUses {
            residential: permit("Multifamily"),
            commercial: permit("General Retail"),
            office: UsePermissions {
                by_warrant: vec!["Professional Office".into()],
                ..Default::default()
            },
            lodging: UsePermissions {
                by_exception: vec!["Hotel".into()],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn run(
        site: &SiteMetrics,
        zoning: &ZoningInfo,
        uses: &AllowedUses,
        existing: Option<&ExistingBuildingMetrics>,
    ) -> Vec<DevelopmentScenario> {
        let config = AnalysisConfig::default();
        let market = MarketPreset::BrevardCounty.assumptions();
        let capacity = calculate_development_capacity(site, zoning, existing, uses);
        let financial =
            calculate_financial_opportunity(zoning, &capacity, existing, None, &config, &market);
        generate_scenarios(&ScenarioContext {
            site,
            zoning,
            allowed_uses: uses,
            capacity: &capacity,
            financial: &financial,
            land_value: None,
            market: &market,
            config: &config,
        })
    }

    #[test]
    fn test_archetypes_in_fixed_order() {
        let list = run(&site(true), &zoning(), &uses(), None);
        let types: Vec<ScenarioType> = list.iter().map(|s| s.scenario_type).collect();
        assert_eq!(
            types,
            vec![
                ScenarioType::MixedUse,
                ScenarioType::ResidentialOnly,
                ScenarioType::HotelCondo,
                ScenarioType::OfficeExpansion,
                ScenarioType::RetailDestination,
            ]
        );
    }

    #[test]
    fn test_costs_and_profit_are_consistent() {
        for s in run(&site(true), &zoning(), &uses(), None) {
            let c = &s.costs;
            assert_eq!(
                c.total_cost,
                c.hard_costs + c.soft_costs + c.land_cost + c.financing_costs + c.contingency,
                "{}",
                s.name
            );
            assert_eq!(
                s.projections.development_profit,
                s.projections.total_asset_value - c.total_cost
            );
            assert!(s.projections.equity_multiple >= Decimal::ZERO);
            assert!(s.projections.irr >= dec!(-100));
            assert_eq!(s.revenue_streams as usize, s.components.len());
            assert!(s.stories >= 1 && s.stories <= 5);
        }
    }

    #[test]
    fn test_mixed_use_preflagged_with_two_by_right_categories() {
        let list = run(&site(true), &zoning(), &uses(), None);
        let recommended: Vec<&DevelopmentScenario> =
            list.iter().filter(|s| s.is_recommended).collect();
        assert_eq!(recommended.len(), 1);
        assert_eq!(recommended[0].scenario_type, ScenarioType::MixedUse);
    }

    #[test]
    fn test_land_cost_priced_from_market_without_land_value() {
        let list = run(&site(true), &zoning(), &uses(), None);
        // 43,560 sq ft × $18
        assert_eq!(list[0].costs.land_cost, dec!(784080));
    }

    #[test]
    fn test_dropped_component_shares_renormalised() {
        let mut u = uses();
        u.office = UsePermissions::default();
        let list = run(&site(true), &zoning(), &u, None);
        let mixed = &list[0];
        assert_eq!(mixed.scenario_type, ScenarioType::MixedUse);
        assert_eq!(mixed.components.len(), 2);
        assert!((mixed.total_sq_ft - dec!(87120)).abs() < dec!(0.05));
        assert!(list
            .iter()
            .all(|s| s.scenario_type != ScenarioType::OfficeExpansion));
    }

    #[test]
    fn test_density_caps_residential_units() {
        let mut z = zoning();
        z.residential_density_per_acre = Some(dec!(50));
        let list = run(&site(true), &z, &uses(), None);
        let residential = list
            .iter()
            .find(|s| s.scenario_type == ScenarioType::ResidentialOnly)
            .unwrap();
        let component = &residential.components[0];
        assert_eq!(component.units, Some(50));
        assert_eq!(component.net_area, dec!(50000));
        assert!(residential.total_sq_ft < dec!(87120));
    }

    #[test]
    fn test_zero_unit_ceiling_is_infeasible_for_residential() {
        let mut z = zoning();
        z.residential_density_per_acre = Some(dec!(0));
        let building = ExistingBuildingMetrics {
            building_area: dec!(20000),
            building_use: Some("Office".into()),
            year_built: Some(1978),
            stories: Some(2),
            condition: None,
            actual_setbacks: None,
        };
        let mut u = uses();
        u.lodging = UsePermissions::default();
        let list = run(&site(false), &z, &u, Some(&building));
        let types: Vec<ScenarioType> = list.iter().map(|s| s.scenario_type).collect();
        assert_eq!(
            types,
            vec![
                ScenarioType::OfficeExpansion,
                ScenarioType::RetailDestination,
                ScenarioType::AdaptiveReuse,
            ]
        );
        assert_eq!(list[2].components[0].kind, ComponentKind::Office);
    }

    #[test]
    fn test_hotel_condo_requires_lodging_density() {
        let mut z = zoning();
        z.lodging_density_per_acre = None;
        let list = run(&site(true), &z, &uses(), None);
        assert!(list.iter().all(|s| s.scenario_type != ScenarioType::HotelCondo));
    }

    #[test]
    fn test_adaptive_reuse_prices_renovation() {
        let building = ExistingBuildingMetrics {
            building_area: dec!(20000),
            building_use: Some("Office".into()),
            year_built: Some(1978),
            stories: Some(2),
            condition: None,
            actual_setbacks: None,
        };
        let list = run(&site(false), &zoning(), &uses(), Some(&building));
        let reuse = list
            .iter()
            .find(|s| s.scenario_type == ScenarioType::AdaptiveReuse)
            .unwrap();
        assert_eq!(reuse.components[0].kind, ComponentKind::Residential);
        // 20,000 sq ft × $95 renovation
        assert_eq!(reuse.costs.hard_costs, dec!(1900000));
    }

    #[test]
    fn test_no_permitted_use_yields_empty_list() {
        let list = run(&site(true), &zoning(), &AllowedUses::default(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn test_area_below_minimum_is_infeasible() {
        let mut z = zoning();
        z.base_far = dec!(0.01);
        z.max_far = dec!(0.02);
        let list = run(&site(true), &z, &uses(), None);
        assert!(list.is_empty());
    }
}
