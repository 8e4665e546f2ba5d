use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use super::{Confidence, Kpi, KpiCategory, KpiSource, KpiValue};
use crate::analysis::{analyze_site, SiteAnalysis};
use crate::capacity::ratio;
use crate::config::{AnalysisConfig, ComponentAssumptions};
use crate::format::{format_currency, format_plain, round_half_up};
use crate::property::LotType;
use crate::report::ReportInput;
use crate::types::SqFt;
use crate::zoning::UseCategory;
use crate::ZoneWiseResult;

// ---------------------------------------------------------------------------
// Catalog entries
// ---------------------------------------------------------------------------

/// A KPI before it is numbered and filed under its category.
struct Entry {
    name: String,
    value: KpiValue,
    unit: Option<&'static str>,
    source: KpiSource,
    confidence: Confidence,
    method: Option<String>,
    note: Option<String>,
    missing_note: Option<String>,
}

impl Entry {
    fn sourced(name: impl Into<String>, value: impl Into<KpiValue>, source: KpiSource) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            unit: None,
            source,
            confidence: Confidence::High,
            method: None,
            note: None,
            missing_note: None,
        }
    }

    fn direct(name: impl Into<String>, value: impl Into<KpiValue>) -> Self {
        Self::sourced(name, value, KpiSource::Direct)
    }

    /// Calculated KPIs always carry the formula that produced them.
    fn calculated(name: &str, value: impl Into<KpiValue>, method: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            ..Self::sourced(name, value, KpiSource::Calculated)
        }
    }

    fn estimated(name: &str, value: impl Into<KpiValue>) -> Self {
        Self {
            confidence: Confidence::Medium,
            ..Self::sourced(name, value, KpiSource::Estimated)
        }
    }

    fn unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    fn confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Note used only when the value turns out to be unavailable.
    fn missing(mut self, note: impl Into<String>) -> Self {
        self.missing_note = Some(note.into());
        self
    }

    fn into_kpi(self, id: u32, category: KpiCategory) -> Kpi {
        let mut confidence = self.confidence;
        let mut note = self.note;
        if !self.value.is_available() {
            confidence = Confidence::Low;
            note = note
                .or(self.missing_note)
                .or_else(|| Some("Input not supplied".to_string()));
        } else if self.source.is_placeholder() && confidence == Confidence::High {
            confidence = Confidence::Medium;
        }

        Kpi {
            id,
            category,
            name: self.name,
            value: self.value,
            unit: self.unit.map(str::to_string),
            source: self.source,
            confidence,
            calculation_method: self.method,
            note,
        }
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Inputs the catalog reads, all validated and derived up front.
#[derive(Debug, Clone, Copy)]
pub struct KpiContext<'a> {
    pub input: &'a ReportInput,
    pub analysis: &'a SiteAnalysis,
    pub config: &'a AnalysisConfig,
    /// Year building age is measured against
    pub analysis_year: i32,
}

pub struct KpiCalculator<'a> {
    ctx: KpiContext<'a>,
}

impl<'a> KpiCalculator<'a> {
    pub fn new(ctx: KpiContext<'a>) -> Self {
        Self { ctx }
    }

    /// The full catalog: every category in declaration order, ids from 1.
    ///
    /// Entries are never dropped; an underivable value is `NotAvailable`.
    pub fn calculate_all(&self) -> Vec<Kpi> {
        let mut kpis = Vec::with_capacity(super::KPI_CATALOG_SIZE);
        for category in KpiCategory::ALL {
            let entries = match category {
                KpiCategory::SiteParcel => self.site_parcel(),
                KpiCategory::ExistingBuilding => self.existing_building(),
                KpiCategory::ZoningRegulatory => self.zoning_regulatory(),
                KpiCategory::DevelopmentCapacity => self.development_capacity(),
                KpiCategory::ResidentialCapacity => self.residential_capacity(),
                KpiCategory::LodgingCapacity => self.lodging_capacity(),
                KpiCategory::CommercialOfficeCapacity => self.commercial_office_capacity(),
                KpiCategory::SetbackRequirements => self.setback_requirements(),
                KpiCategory::AllowedUses => self.allowed_uses(),
                KpiCategory::FinancialOpportunity => self.financial_opportunity(),
                KpiCategory::AiEnhanced => self.ai_enhanced(),
            };
            debug_assert_eq!(entries.len(), category.catalog_count(), "{category}");
            for entry in entries {
                let id = kpis.len() as u32 + 1;
                kpis.push(entry.into_kpi(id, category));
            }
        }
        kpis
    }

    fn site_parcel(&self) -> Vec<Entry> {
        let property = &self.ctx.input.property;
        let site = &self.ctx.input.site;

        let variance = match (site.tax_record_area_sq_ft, site.parcel_shape_area_sq_ft) {
            (Some(tax), Some(shape)) => ratio(tax - shape, tax).map(|r| round_half_up(r * dec!(100), 2)),
            _ => None,
        };

        let coordinates = match (property.latitude, property.longitude) {
            (Some(latitude), Some(longitude)) => Entry::direct(
                "Coordinates",
                KpiValue::Structured(json!({ "latitude": latitude, "longitude": longitude })),
            ),
            _ => {
                let fallback = self.ctx.config.default_location;
                Entry::sourced(
                    "Coordinates",
                    KpiValue::Structured(json!({
                        "latitude": fallback.latitude,
                        "longitude": fallback.longitude,
                    })),
                    KpiSource::Inferred,
                )
                .confidence(Confidence::Low)
                .note("No coordinates supplied; default location used")
            }
        };

        vec![
            Entry::sourced("Parcel ID", property.parcel_id.clone(), KpiSource::CountyApi),
            Entry::sourced("Lot Area (Acres)", site.lot_area_acres, KpiSource::CountyApi)
                .unit("acres"),
            Entry::sourced("Lot Area (Sq Ft)", site.lot_area_sq_ft, KpiSource::CountyApi)
                .unit("sq ft"),
            Entry::sourced("Tax Record Lot Area", site.tax_record_area_sq_ft, KpiSource::CountyApi)
                .unit("sq ft")
                .missing("Tax roll area not supplied"),
            Entry::sourced("Parcel Shape Area", site.parcel_shape_area_sq_ft, KpiSource::Gis)
                .unit("sq ft")
                .confidence(Confidence::Medium)
                .missing("Parcel polygon area not supplied"),
            Entry::calculated(
                "Area Measurement Variance",
                variance,
                "(Tax Record Lot Area − Parcel Shape Area) ÷ Tax Record Lot Area × 100",
            )
            .unit("%")
            .missing("Requires both tax record and parcel shape areas"),
            Entry::direct("Lot Type", site.lot_type.to_string()),
            Entry::direct("Frontage Length", site.frontage_length)
                .unit("ft")
                .missing("Frontage not supplied"),
            Entry::direct("Vacancy Status", site.is_vacant),
            coordinates,
        ]
    }

    fn existing_building(&self) -> Vec<Entry> {
        let site = &self.ctx.input.site;
        let building = self.ctx.input.existing_building.as_ref();
        let missing = if site.is_vacant {
            "Vacant site"
        } else {
            "Not recorded for the existing building"
        };

        let area = building
            .map(|b| b.building_area)
            .or(site.is_vacant.then_some(Decimal::ZERO));
        let year_built = building.and_then(|b| b.year_built);
        let age = year_built.map(|year| Decimal::from((self.ctx.analysis_year - year).max(0)));

        vec![
            Entry::direct("Current Land Use", site.current_land_use.clone())
                .missing("Land use not recorded"),
            Entry::direct("Building Area", area)
                .unit("sq ft")
                .missing(missing),
            Entry::direct("Building Use", building.and_then(|b| b.building_use.clone()))
                .missing(missing),
            Entry::direct("Year Built", year_built.map(Decimal::from)).missing(missing),
            Entry::calculated("Building Age", age, "Analysis Year − Year Built")
                .unit("years")
                .missing(missing),
            Entry::direct("Stories", building.and_then(|b| b.stories).map(Decimal::from))
                .unit("stories")
                .missing(missing),
            Entry::direct(
                "Building Condition",
                building.and_then(|b| b.condition).map(|c| c.to_string()),
            )
            .missing(missing),
        ]
    }

    fn zoning_regulatory(&self) -> Vec<Entry> {
        let zoning = &self.ctx.input.zoning;
        let or_none = |value: &Option<String>| value.clone().unwrap_or_else(|| "None".to_string());

        vec![
            Entry::direct("Zoning Code", zoning.zoning_code.clone()),
            Entry::direct("Zoning District", zoning.zoning_district.clone()),
            Entry::direct("Base FAR", zoning.base_far),
            Entry::direct("Max FAR", zoning.max_far),
            Entry::direct("Max Stories", Decimal::from(zoning.max_stories)).unit("stories"),
            Entry::direct("Max Height", zoning.max_height_feet)
                .unit("ft")
                .missing("District sets no height limit in feet"),
            Entry::direct("Historic District", or_none(&zoning.historic_district)),
            Entry::direct("LEED Requirement", or_none(&zoning.leed_requirement)),
            Entry::direct("Live Local Act Applicable", zoning.live_local_applicable),
            Entry::direct("TOD Status", or_none(&zoning.tod_status)),
            Entry::direct("Transit Corridor", zoning.transit_corridor),
        ]
    }

    fn development_capacity(&self) -> Vec<Entry> {
        let c = &self.ctx.analysis.capacity;

        vec![
            Entry::calculated("Max Building Area", c.max_building_area, "Max FAR × Lot Area")
                .unit("sq ft"),
            Entry::calculated("Base Building Area", c.base_building_area, "Base FAR × Lot Area")
                .unit("sq ft"),
            Entry::calculated(
                "Bonus Building Area",
                c.bonus_building_area,
                "Max Building Area − Base Building Area",
            )
            .unit("sq ft"),
            Entry::calculated(
                "Max Building Footprint",
                c.max_footprint,
                "Max Lot Coverage × Lot Area",
            )
            .unit("sq ft"),
            Entry::calculated(
                "Min Open Space Area",
                c.min_open_space_area,
                "Min Open Space × Lot Area",
            )
            .unit("sq ft"),
            Entry::calculated(
                "Unused Development Rights",
                c.unused_development_rights,
                "max(0, Max Building Area − Existing Building Area)",
            )
            .unit("sq ft"),
            Entry::calculated(
                "Current FAR",
                c.current_far_utilization,
                "Existing Building Area ÷ Lot Area",
            )
            .missing("Lot area is zero"),
            Entry::calculated(
                "FAR Utilization Rate",
                c.far_utilization_rate,
                "Current FAR ÷ Max FAR × 100",
            )
            .unit("%")
            .missing("Lot area or max FAR is zero"),
            Entry::calculated(
                "Effective Height Limit",
                c.effective_height_limit_feet,
                "min(Max Height, FAA Height Limit)",
            )
            .unit("ft")
            .missing("No height limit recorded"),
        ]
    }

    fn residential_capacity(&self) -> Vec<Entry> {
        let permitted = self.ctx.input.allowed_uses.permits(UseCategory::Residential);
        let market = &self.ctx.analysis.market;

        vec![
            Entry::direct("Residential Permitted", permitted),
            Entry::direct(
                "Residential Density",
                self.ctx.input.zoning.residential_density_per_acre,
            )
            .unit("units/acre")
            .missing("District sets no residential density"),
            Entry::calculated(
                "Max Residential Units",
                self.ctx.analysis.capacity.max_residential_units.map(Decimal::from),
                "floor(Residential Density × Lot Area (Acres))",
            )
            .unit("units")
            .missing("District sets no residential density"),
            Entry::estimated("Average Unit Size", market.residential.average_unit_size)
                .unit("sq ft")
                .note(format!("{} market assumption", market.label)),
            Entry::calculated(
                "Unit Yield by Area",
                self.yield_by_area(permitted, &market.residential),
                "floor(Max Building Area × Residential Efficiency ÷ Average Unit Size)",
            )
            .unit("units")
            .missing("Residential use not permitted"),
        ]
    }

    fn lodging_capacity(&self) -> Vec<Entry> {
        let permitted = self.ctx.input.allowed_uses.permits(UseCategory::Lodging);
        let market = &self.ctx.analysis.market;

        vec![
            Entry::direct("Lodging Permitted", permitted),
            Entry::direct("Lodging Density", self.ctx.input.zoning.lodging_density_per_acre)
                .unit("rooms/acre")
                .missing("District sets no lodging density"),
            Entry::calculated(
                "Max Lodging Rooms",
                self.ctx.analysis.capacity.max_lodging_rooms.map(Decimal::from),
                "floor(Lodging Density × Lot Area (Acres))",
            )
            .unit("rooms")
            .missing("District sets no lodging density"),
            Entry::estimated("Average Key Size", market.hotel.average_unit_size)
                .unit("sq ft")
                .note(format!("{} market assumption", market.label)),
            Entry::calculated(
                "Key Yield by Area",
                self.yield_by_area(permitted, &market.hotel),
                "floor(Max Building Area × Hotel Efficiency ÷ Average Key Size)",
            )
            .unit("rooms")
            .missing("Lodging use not permitted"),
        ]
    }

    fn commercial_office_capacity(&self) -> Vec<Entry> {
        let uses = &self.ctx.input.allowed_uses;
        let c = &self.ctx.analysis.capacity;
        let office_efficiency = self.ctx.analysis.market.office.efficiency;

        vec![
            Entry::direct("Office Permitted", uses.permits(UseCategory::Office)),
            Entry::direct("Commercial Permitted", uses.permits(UseCategory::Commercial)),
            Entry::calculated("Max Office Area", c.max_office_area, "Max FAR × Lot Area")
                .unit("sq ft")
                .missing("Office use not permitted"),
            Entry::calculated(
                "Office Net Rentable Area",
                c.max_office_area.map(|area| area * office_efficiency),
                "Max Office Area × Office Efficiency",
            )
            .unit("sq ft")
            .missing("Office use not permitted"),
            Entry::calculated(
                "Ground-Floor Commercial Area",
                c.max_ground_floor_commercial_area,
                "Max Lot Coverage × Lot Area",
            )
            .unit("sq ft")
            .missing("Commercial use not permitted"),
        ]
    }

    fn setback_requirements(&self) -> Vec<Entry> {
        let setbacks = &self.ctx.input.setbacks;
        let envelope = self.ctx.analysis.buildable_envelope.as_ref();
        let lot_depth = envelope.map(|e| round_half_up(e.lot_depth, 2));
        let buildable_width = envelope.map(|e| round_half_up(e.buildable_width, 2));
        let buildable_depth = envelope.map(|e| round_half_up(e.buildable_depth, 2));
        let secondary_missing = if self.ctx.input.site.lot_type == LotType::Corner {
            "Not specified for this corner lot"
        } else {
            "Not applicable to this lot type"
        };
        let width_method = envelope
            .map(|e| e.width_method.clone())
            .unwrap_or_else(|| "Frontage − 2 × Side Setback".to_string());

        let compliance = self.ctx.analysis.setback_compliance.as_ref();
        let mut compliance_entry = Entry::calculated(
            "Setback Compliance",
            compliance.map(|c| c.status.to_string()),
            "Actual Setback ≥ Required Setback (front, side, rear)",
        )
        .missing("No measured setbacks for the existing building");
        if let Some(c) = compliance.filter(|c| !c.violations.is_empty()) {
            compliance_entry = compliance_entry.note(c.violations.join("; "));
        }

        vec![
            Entry::direct("Primary Frontage Setback", setbacks.primary_frontage).unit("ft"),
            Entry::direct("Secondary Frontage Setback", setbacks.secondary_frontage)
                .unit("ft")
                .missing(secondary_missing),
            Entry::direct("Side Setback", setbacks.side)
                .unit("ft")
                .missing("Not specified by the district"),
            Entry::direct("Rear Setback", setbacks.rear).unit("ft"),
            Entry::direct("Water Setback", setbacks.water)
                .unit("ft")
                .missing("No waterfront setback"),
            Entry::calculated("Lot Depth", lot_depth, "Lot Area ÷ Frontage Length")
                .unit("ft")
                .missing("Frontage not supplied"),
            Entry::calculated("Buildable Width", buildable_width, width_method)
                .unit("ft")
                .missing("Frontage not supplied"),
            Entry::calculated(
                "Buildable Depth",
                buildable_depth,
                "Lot Depth − Primary Frontage Setback − Rear Setback",
            )
            .unit("ft")
            .missing("Frontage not supplied"),
            compliance_entry,
        ]
    }

    fn allowed_uses(&self) -> Vec<Entry> {
        let uses = &self.ctx.input.allowed_uses;
        UseCategory::ALL
            .into_iter()
            .map(|category| {
                let p = uses.get(category);
                Entry::direct(
                    format!("{} Uses", category.label()),
                    KpiValue::Structured(json!({
                        "byRight": p.by_right,
                        "byWarrant": p.by_warrant,
                        "byException": p.by_exception,
                    })),
                )
            })
            .collect()
    }

    fn financial_opportunity(&self) -> Vec<Entry> {
        let f = &self.ctx.analysis.financial_opportunity;
        let market = &self.ctx.analysis.market;

        vec![
            Entry::calculated(
                "Untapped Development Potential",
                f.untapped_development_potential,
                "max(0, 100 − FAR Utilization Rate)",
            )
            .unit("%")
            .missing("FAR utilization unavailable"),
            Entry::calculated(
                "Additional Buildable Area",
                f.additional_buildable_area,
                "max(0, Max Building Area − Existing Building Area)",
            )
            .unit("sq ft"),
            Entry::calculated(
                "Vertical Expansion Potential",
                Decimal::from(f.vertical_expansion_stories),
                "max(0, Max Stories − Existing Stories)",
            )
            .unit("stories"),
            Entry::calculated(
                "Lot Coverage Utilization",
                f.lot_coverage_utilization,
                "(Building Area ÷ Stories) ÷ Max Building Footprint × 100",
            )
            .unit("%")
            .missing("Max building footprint is zero"),
            Entry::calculated(
                "Land Value per Buildable Sq Ft",
                f.land_value_per_buildable_sq_ft
                    .map(|v| round_half_up(v, 2)),
                "Land Value ÷ Max Building Area",
            )
            .unit("$/sq ft")
            .missing("Land value not supplied"),
            Entry::estimated("Untapped Value Estimate", f.untapped_value_estimate)
                .method("Additional Buildable Area × Blended Value per Sq Ft")
                .unit("$")
                .note(format!(
                    "{} blended value of {}/sq ft",
                    market.label,
                    format_currency(market.blended_value_per_sq_ft)
                )),
        ]
    }

    fn ai_enhanced(&self) -> Vec<Entry> {
        let yield_per_sq_ft = self.ctx.config.solar_yield_kwh_per_sq_ft;
        let market = &self.ctx.analysis.market;

        vec![
            Entry::estimated(
                "Solar Potential",
                round_half_up(self.ctx.analysis.capacity.max_footprint * yield_per_sq_ft, 0),
            )
            .method(format!(
                "Max Building Footprint × {} kWh/sq ft/yr",
                format_plain(yield_per_sq_ft)
            ))
            .unit("kWh/yr")
            .confidence(Confidence::Low)
            .note("Placeholder yield; not derived from irradiance data"),
            Entry::sourced(
                "Market Demand Score",
                Decimal::from(market.market_demand_score),
                KpiSource::AiAnalysis,
            )
            .unit("/100")
            .confidence(Confidence::Low)
            .note(format!("Placeholder score for {} pending a market study", market.label)),
        ]
    }

    /// `floor(max area × efficiency ÷ unit size)` when the use is permitted.
    fn yield_by_area(&self, permitted: bool, assumptions: &ComponentAssumptions) -> Option<Decimal> {
        if !permitted {
            return None;
        }
        let max_area: SqFt = self.ctx.analysis.capacity.max_building_area;
        let size = assumptions.average_unit_size?;
        ratio(max_area * assumptions.efficiency, size).map(|units| units.floor())
    }
}

// ---------------------------------------------------------------------------
// Convenience
// ---------------------------------------------------------------------------

/// Validate the input, derive prerequisites and compute the full catalog.
pub fn calculate_kpis(input: &ReportInput, config: &AnalysisConfig) -> ZoneWiseResult<Vec<Kpi>> {
    let analysis = analyze_site(input, config)?;
    let analysis_year = config.analysis_year.unwrap_or_else(|| Utc::now().year());
    Ok(KpiCalculator::new(KpiContext {
        input,
        analysis: &analysis,
        config,
        analysis_year,
    })
    .calculate_all())
}
