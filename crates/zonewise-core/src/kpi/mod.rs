//! Key performance indicators: the auditable, categorized facts a
//! development analysis report is built from.

pub mod calculator;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use calculator::{calculate_kpis, KpiCalculator, KpiContext};

/// Number of KPIs every catalog run produces.
pub const KPI_CATALOG_SIZE: usize = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiCategory {
    SiteParcel,
    ExistingBuilding,
    ZoningRegulatory,
    DevelopmentCapacity,
    ResidentialCapacity,
    LodgingCapacity,
    CommercialOfficeCapacity,
    SetbackRequirements,
    AllowedUses,
    FinancialOpportunity,
    AiEnhanced,
}

impl KpiCategory {
    /// Declaration order, which is also KPI id order.
    pub const ALL: [KpiCategory; 11] = [
        KpiCategory::SiteParcel,
        KpiCategory::ExistingBuilding,
        KpiCategory::ZoningRegulatory,
        KpiCategory::DevelopmentCapacity,
        KpiCategory::ResidentialCapacity,
        KpiCategory::LodgingCapacity,
        KpiCategory::CommercialOfficeCapacity,
        KpiCategory::SetbackRequirements,
        KpiCategory::AllowedUses,
        KpiCategory::FinancialOpportunity,
        KpiCategory::AiEnhanced,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            KpiCategory::SiteParcel => "Site & Parcel",
            KpiCategory::ExistingBuilding => "Existing Building",
            KpiCategory::ZoningRegulatory => "Zoning & Regulatory",
            KpiCategory::DevelopmentCapacity => "Development Capacity",
            KpiCategory::ResidentialCapacity => "Residential Capacity",
            KpiCategory::LodgingCapacity => "Lodging Capacity",
            KpiCategory::CommercialOfficeCapacity => "Commercial & Office Capacity",
            KpiCategory::SetbackRequirements => "Setback Requirements",
            KpiCategory::AllowedUses => "Allowed Uses",
            KpiCategory::FinancialOpportunity => "Financial Opportunity",
            KpiCategory::AiEnhanced => "AI-Enhanced Insights",
        }
    }

    /// KPIs this category contributes to the catalog.
    pub fn catalog_count(&self) -> usize {
        match self {
            KpiCategory::SiteParcel => 10,
            KpiCategory::ExistingBuilding => 7,
            KpiCategory::ZoningRegulatory => 11,
            KpiCategory::DevelopmentCapacity => 9,
            KpiCategory::ResidentialCapacity => 5,
            KpiCategory::LodgingCapacity => 5,
            KpiCategory::CommercialOfficeCapacity => 5,
            KpiCategory::SetbackRequirements => 9,
            KpiCategory::AllowedUses => 6,
            KpiCategory::FinancialOpportunity => 6,
            KpiCategory::AiEnhanced => 2,
        }
    }
}

impl fmt::Display for KpiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a KPI's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KpiSource {
    Direct,
    Calculated,
    Estimated,
    Inferred,
    Gis,
    CountyApi,
    Census,
    AiAnalysis,
}

impl KpiSource {
    /// Placeholder-grade sources that must never be presented as measured.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, KpiSource::Estimated | KpiSource::AiAnalysis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Numeric 0-100 score used by lightweight consumers.
    pub fn score(&self) -> u8 {
        match self {
            Confidence::High => 90,
            Confidence::Medium => 70,
            Confidence::Low => 40,
        }
    }
}

/// A KPI value. Exporters match on the variant, so adding one is a
/// compile-checked change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum KpiValue {
    Numeric(Decimal),
    Text(String),
    Boolean(bool),
    Structured(serde_json::Value),
    NotAvailable,
}

impl KpiValue {
    pub fn is_available(&self) -> bool {
        !matches!(self, KpiValue::NotAvailable)
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            KpiValue::Numeric(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for KpiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KpiValue::Numeric(d) => write!(f, "{}", d.normalize()),
            KpiValue::Text(s) => f.write_str(s),
            KpiValue::Boolean(true) => f.write_str("Yes"),
            KpiValue::Boolean(false) => f.write_str("No"),
            KpiValue::Structured(v) => write!(f, "{v}"),
            KpiValue::NotAvailable => f.write_str("N/A"),
        }
    }
}

impl From<Decimal> for KpiValue {
    fn from(value: Decimal) -> Self {
        KpiValue::Numeric(value)
    }
}

impl<T: Into<KpiValue>> From<Option<T>> for KpiValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(KpiValue::NotAvailable, Into::into)
    }
}

impl From<bool> for KpiValue {
    fn from(value: bool) -> Self {
        KpiValue::Boolean(value)
    }
}

impl From<String> for KpiValue {
    fn from(value: String) -> Self {
        KpiValue::Text(value)
    }
}

impl From<&str> for KpiValue {
    fn from(value: &str) -> Self {
        KpiValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub id: u32,
    pub category: KpiCategory,
    pub name: String,
    pub value: KpiValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub source: KpiSource,
    pub confidence: Confidence,
    /// Human-readable formula; always present on calculated KPIs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// KPIs of one category, in id order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiGroup {
    pub category: KpiCategory,
    pub label: String,
    pub kpis: Vec<Kpi>,
}

/// Group KPIs by category in declaration order; empty categories are kept.
pub fn group_by_category(kpis: &[Kpi]) -> Vec<KpiGroup> {
    KpiCategory::ALL
        .into_iter()
        .map(|category| KpiGroup {
            category,
            label: category.label().to_string(),
            kpis: kpis
                .iter()
                .filter(|k| k.category == category)
                .cloned()
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_catalog_counts_sum_to_catalog_size() {
        let total: usize = KpiCategory::ALL.iter().map(|c| c.catalog_count()).sum();
        assert_eq!(total, KPI_CATALOG_SIZE);
    }

    #[test]
    fn test_value_serializes_with_tag() {
        let json = serde_json::to_value(KpiValue::Numeric(dec!(5000))).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "numeric", "value": "5000" }));

        let json = serde_json::to_value(KpiValue::NotAvailable).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "notAvailable" }));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(KpiValue::Numeric(dec!(2.50)).to_string(), "2.5");
        assert_eq!(KpiValue::Boolean(true).to_string(), "Yes");
        assert_eq!(KpiValue::from(None::<Decimal>).to_string(), "N/A");
    }

    #[test]
    fn test_source_and_category_wire_names() {
        assert_eq!(
            serde_json::to_value(KpiSource::AiAnalysis).unwrap(),
            serde_json::json!("AI_ANALYSIS")
        );
        assert_eq!(
            serde_json::to_value(KpiSource::CountyApi).unwrap(),
            serde_json::json!("COUNTY_API")
        );
        assert_eq!(
            serde_json::to_value(KpiCategory::CommercialOfficeCapacity).unwrap(),
            serde_json::json!("commercialOfficeCapacity")
        );
    }
}
