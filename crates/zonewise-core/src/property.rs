use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::setbacks::ActualSetbacks;
use crate::types::{Acres, Feet, SqFt};

/// Identity and location of the parcel under analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInfo {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub parcel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_description: Option<String>,
    pub county: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Decimal>,
}

/// Lot configuration relative to the street network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LotType {
    Interior,
    Corner,
    Through,
    Flag,
    Irregular,
}

impl fmt::Display for LotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LotType::Interior => "Interior",
            LotType::Corner => "Corner",
            LotType::Through => "Through",
            LotType::Flag => "Flag",
            LotType::Irregular => "Irregular",
        };
        f.write_str(label)
    }
}

/// Physical metrics of the lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetrics {
    pub lot_area_acres: Acres,
    pub lot_area_sq_ft: SqFt,
    /// Area recorded by the county tax roll
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_record_area_sq_ft: Option<SqFt>,
    /// Area measured from the parcel polygon; never larger than the tax record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parcel_shape_area_sq_ft: Option<SqFt>,
    pub lot_type: LotType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontage_length: Option<Feet>,
    pub is_vacant: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_land_use: Option<String>,
}

/// Observed condition of an existing structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingCondition {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl fmt::Display for BuildingCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BuildingCondition::Excellent => "Excellent",
            BuildingCondition::Good => "Good",
            BuildingCondition::Fair => "Fair",
            BuildingCondition::Poor => "Poor",
        };
        f.write_str(label)
    }
}

/// The structure currently on the lot, absent for vacant land.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingBuildingMetrics {
    pub building_area: SqFt,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stories: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<BuildingCondition>,
    /// Measured distances from the structure to each property line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_setbacks: Option<ActualSetbacks>,
}

impl ExistingBuildingMetrics {
    /// Ground-floor area assuming equal floor plates.
    pub fn footprint(&self) -> SqFt {
        match self.stories {
            Some(stories) if stories > 0 => self.building_area / Decimal::from(stories),
            _ => self.building_area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn building(area: Decimal, stories: Option<u32>) -> ExistingBuildingMetrics {
        ExistingBuildingMetrics {
            building_area: area,
            building_use: None,
            year_built: None,
            stories,
            condition: None,
            actual_setbacks: None,
        }
    }

    #[test]
    fn test_footprint_splits_area_across_stories() {
        assert_eq!(building(dec!(9000), Some(3)).footprint(), dec!(3000));
        assert_eq!(building(dec!(9000), None).footprint(), dec!(9000));
        assert_eq!(building(dec!(9000), Some(0)).footprint(), dec!(9000));
    }

    #[test]
    fn test_site_metrics_accept_json_numbers() {
        let site: SiteMetrics = serde_json::from_str(
            r#"{ "lotAreaAcres": 0.5, "lotAreaSqFt": 21780, "lotType": "Corner", "isVacant": true }"#,
        )
        .unwrap();
        assert_eq!(site.lot_area_sq_ft, dec!(21780));
        assert_eq!(site.lot_type, LotType::Corner);
        assert!(site.frontage_length.is_none());
    }
}
