#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use zonewise_core::{AnalysisConfig, ReportInput};

/// A 10,000 sq ft BU-1 lot on a Brevard County commercial corridor with a
/// 3,000 sq ft single-story building on it.
pub fn corridor_lot() -> ReportInput {
    serde_json::from_value(json!({
        "property": {
            "address": "1200 Malabar Rd",
            "city": "Malabar",
            "state": "FL",
            "zipCode": "32950",
            "parcelId": "29-37-13-00-00750.0-0000.00",
            "county": "Brevard",
            "latitude": "28.0031",
            "longitude": "-80.5712"
        },
        "site": {
            "lotAreaAcres": "0.2296",
            "lotAreaSqFt": "10000",
            "lotType": "Interior",
            "frontageLength": "100",
            "isVacant": false,
            "currentLandUse": "Retail Store"
        },
        "zoning": {
            "zoningCode": "BU-1",
            "zoningDistrict": "General Retail Commercial",
            "baseFar": "0.5",
            "maxFar": "0.5",
            "maxStories": 3,
            "maxHeightFeet": "35",
            "maxLotCoverage": "0.4",
            "minOpenSpace": "0.2",
            "residentialDensityPerAcre": "20"
        },
        "allowedUses": {
            "commercial": { "byRight": ["Retail", "Restaurant"] },
            "residential": { "byWarrant": ["Multifamily"] },
            "office": { "byException": ["Professional Office"] }
        },
        "setbacks": { "primaryFrontage": "25", "side": "10", "rear": "20" },
        "existingBuilding": {
            "buildingArea": "3000",
            "buildingUse": "Retail",
            "yearBuilt": 1985,
            "stories": 1,
            "condition": "Fair"
        }
    }))
    .expect("fixture deserializes")
}

/// The corridor lot with the building cleared.
pub fn vacant_lot() -> ReportInput {
    let mut input = corridor_lot();
    input.site.is_vacant = true;
    input.site.current_land_use = None;
    input.existing_building = None;
    input
}

pub fn config() -> AnalysisConfig {
    AnalysisConfig {
        analysis_year: Some(2025),
        ..AnalysisConfig::default()
    }
}

pub fn pinned_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
}
