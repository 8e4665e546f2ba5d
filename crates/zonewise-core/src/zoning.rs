use serde::{Deserialize, Serialize};

use crate::types::{Feet, Rate};

/// Dimensional standards of a zoning district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoningInfo {
    pub zoning_code: String,
    pub zoning_district: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_description: Option<String>,
    pub base_far: Rate,
    pub max_far: Rate,
    pub max_stories: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height_feet: Option<Feet>,
    /// Fraction of the lot a building may cover, 0-1
    pub max_lot_coverage: Rate,
    /// Fraction of the lot kept open, 0-1
    pub min_open_space: Rate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faa_height_limit_feet: Option<Feet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historic_district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leed_requirement: Option<String>,
    #[serde(default)]
    pub live_local_applicable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tod_status: Option<String>,
    #[serde(default)]
    pub transit_corridor: bool,
    /// Dwelling units allowed per acre
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residential_density_per_acre: Option<Rate>,
    /// Hotel rooms allowed per acre
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lodging_density_per_acre: Option<Rate>,
}

impl ZoningInfo {
    /// Tightest of the zoning and FAA height caps.
    pub fn effective_height_limit(&self) -> Option<Feet> {
        match (self.max_height_feet, self.faa_height_limit_feet) {
            (Some(zoning), Some(faa)) => Some(zoning.min(faa)),
            (zoning, faa) => zoning.or(faa),
        }
    }
}

/// Use labels in one category, split by approval path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsePermissions {
    pub by_right: Vec<String>,
    pub by_warrant: Vec<String>,
    pub by_exception: Vec<String>,
}

impl UsePermissions {
    pub fn is_permitted(&self) -> bool {
        !(self.by_right.is_empty() && self.by_warrant.is_empty() && self.by_exception.is_empty())
    }

    pub fn is_by_right(&self) -> bool {
        !self.by_right.is_empty()
    }
}

/// The six use categories a district regulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UseCategory {
    Residential,
    Commercial,
    Office,
    Civic,
    Educational,
    Lodging,
}

impl UseCategory {
    pub const ALL: [UseCategory; 6] = [
        UseCategory::Residential,
        UseCategory::Commercial,
        UseCategory::Office,
        UseCategory::Civic,
        UseCategory::Educational,
        UseCategory::Lodging,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            UseCategory::Residential => "Residential",
            UseCategory::Commercial => "Commercial",
            UseCategory::Office => "Office",
            UseCategory::Civic => "Civic",
            UseCategory::Educational => "Educational",
            UseCategory::Lodging => "Lodging",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllowedUses {
    pub residential: UsePermissions,
    pub commercial: UsePermissions,
    pub office: UsePermissions,
    pub civic: UsePermissions,
    pub educational: UsePermissions,
    pub lodging: UsePermissions,
}

impl AllowedUses {
    pub fn get(&self, category: UseCategory) -> &UsePermissions {
        match category {
            UseCategory::Residential => &self.residential,
            UseCategory::Commercial => &self.commercial,
            UseCategory::Office => &self.office,
            UseCategory::Civic => &self.civic,
            UseCategory::Educational => &self.educational,
            UseCategory::Lodging => &self.lodging,
        }
    }

    pub fn permits(&self, category: UseCategory) -> bool {
        self.get(category).is_permitted()
    }

    /// Categories with at least one by-right use, in declaration order.
    pub fn by_right_categories(&self) -> Vec<UseCategory> {
        UseCategory::ALL
            .into_iter()
            .filter(|c| self.get(*c).is_by_right())
            .collect()
    }
}
