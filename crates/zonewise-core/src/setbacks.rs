use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use std::time::Instant;

use crate::config::AnalysisConfig;
use crate::format::format_plain;
use crate::property::{LotType, SiteMetrics};
use crate::types::{with_metadata, ComputationOutput, Feet, SqFt};
use crate::validation::{validate_actual_setbacks, validate_setbacks, validate_site};
use crate::ZoneWiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Minimum distances a building must keep from each property line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetbackRequirements {
    pub primary_frontage: Feet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_frontage: Option<Feet>,
    /// `None` means the district does not regulate side yards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Feet>,
    pub rear: Feet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water: Option<Feet>,
}

/// Measured distances from an existing structure to its property lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualSetbacks {
    pub front: Feet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Feet>,
    pub rear: Feet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceStatus {
    Pass,
    Warning,
    Fail,
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComplianceStatus::Pass => "pass",
            ComplianceStatus::Warning => "warning",
            ComplianceStatus::Fail => "fail",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetbackCompliance {
    pub status: ComplianceStatus,
    /// One entry per encroaching side, e.g. `Front: 20ft < 25ft required`
    pub violations: Vec<String>,
    /// Sides where both an actual and a required distance were known
    pub sides_checked: u32,
}

/// Developable rectangle left once setbacks are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildableEnvelope {
    pub lot_depth: Feet,
    pub buildable_width: Feet,
    pub buildable_depth: Feet,
    pub buildable_footprint: SqFt,
    /// Formula used for the width, which differs on corner lots
    pub width_method: String,
}

/// Standalone setback review: requirements plus whatever is known about the
/// lot and the structure on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetbackCheckInput {
    pub required: SetbackRequirements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<ActualSetbacks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<SiteMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetbackReview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance: Option<SetbackCompliance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope: Option<BuildableEnvelope>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate and run both setback checks outside of a full report.
pub fn check_setbacks(
    input: &SetbackCheckInput,
    config: &AnalysisConfig,
) -> ZoneWiseResult<ComputationOutput<SetbackReview>> {
    let start = Instant::now();
    validate_setbacks(&input.required)?;
    if let Some(actual) = &input.actual {
        validate_actual_setbacks(actual)?;
    }
    if let Some(site) = &input.site {
        validate_site(site, config)?;
    }

    let mut warnings = Vec::new();
    let compliance = input
        .actual
        .as_ref()
        .map(|actual| check_setback_compliance(actual, &input.required));
    let envelope = input
        .site
        .as_ref()
        .and_then(|site| buildable_envelope(site, &input.required));

    if input.actual.is_none() {
        warnings.push("No measured setbacks supplied; compliance not checked".into());
    }
    if input.site.is_some() && envelope.is_none() {
        warnings.push("Lot frontage unknown; buildable envelope not derived".into());
    }

    Ok(with_metadata(
        "Setback compliance and buildable envelope",
        input,
        warnings,
        start.elapsed().as_micros() as u64,
        SetbackReview {
            compliance,
            envelope,
        },
    ))
}

/// Compare an existing structure's setbacks against the district minimums.
///
/// No violations is a pass, a single violation is a warning, and two or more
/// fail the check.
pub fn check_setback_compliance(
    actual: &ActualSetbacks,
    required: &SetbackRequirements,
) -> SetbackCompliance {
    let sides = [
        ("Front", Some(actual.front), Some(required.primary_frontage)),
        ("Side", actual.side, required.side),
        ("Rear", Some(actual.rear), Some(required.rear)),
    ];

    let mut violations = Vec::new();
    let mut sides_checked = 0;
    for (label, measured, minimum) in sides {
        let (Some(measured), Some(minimum)) = (measured, minimum) else {
            continue;
        };
        sides_checked += 1;
        if measured < minimum {
            violations.push(format!(
                "{label}: {}ft < {}ft required",
                format_plain(measured),
                format_plain(minimum)
            ));
        }
    }

    let status = match violations.len() {
        0 => ComplianceStatus::Pass,
        1 => ComplianceStatus::Warning,
        _ => ComplianceStatus::Fail,
    };

    SetbackCompliance {
        status,
        violations,
        sides_checked,
    }
}

/// Derive the buildable rectangle from lot frontage and setbacks.
///
/// Returns `None` when the frontage is unknown or zero, since lot depth
/// cannot be derived. Dimensions never go below zero.
pub fn buildable_envelope(
    site: &SiteMetrics,
    setbacks: &SetbackRequirements,
) -> Option<BuildableEnvelope> {
    let frontage = site.frontage_length.filter(|f| !f.is_zero())?;
    let lot_depth = site.lot_area_sq_ft / frontage;
    let side = setbacks.side.unwrap_or(Decimal::ZERO);

    let (width_deduction, width_method) = match (site.lot_type, setbacks.secondary_frontage) {
        (LotType::Corner, Some(secondary)) => (
            side + secondary,
            "Frontage − Side Setback − Secondary Frontage Setback",
        ),
        _ => (side * Decimal::TWO, "Frontage − 2 × Side Setback"),
    };

    let buildable_width = (frontage - width_deduction).max(Decimal::ZERO);
    let buildable_depth =
        (lot_depth - setbacks.primary_frontage - setbacks.rear).max(Decimal::ZERO);

    Some(BuildableEnvelope {
        lot_depth,
        buildable_width,
        buildable_depth,
        buildable_footprint: buildable_width * buildable_depth,
        width_method: width_method.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn required() -> SetbackRequirements {
        SetbackRequirements {
            primary_frontage: dec!(25),
            secondary_frontage: None,
            side: Some(dec!(10)),
            rear: dec!(20),
            water: None,
        }
    }

    fn site(frontage: Option<Decimal>, lot_type: LotType) -> SiteMetrics {
        SiteMetrics {
            lot_area_acres: dec!(0.2296),
            lot_area_sq_ft: dec!(10000),
            tax_record_area_sq_ft: None,
            parcel_shape_area_sq_ft: None,
            lot_type,
            frontage_length: frontage,
            is_vacant: true,
            current_land_use: None,
        }
    }

    #[test]
    fn test_single_violation_is_warning() {
        let actual = ActualSetbacks {
            front: dec!(20),
            side: Some(dec!(15)),
            rear: dec!(25),
        };
        let result = check_setback_compliance(&actual, &required());
        assert_eq!(result.status, ComplianceStatus::Warning);
        assert_eq!(result.violations, vec!["Front: 20ft < 25ft required".to_string()]);
        assert_eq!(result.sides_checked, 3);
    }

    #[test]
    fn test_two_violations_fail() {
        let actual = ActualSetbacks {
            front: dec!(20),
            side: Some(dec!(7.5)),
            rear: dec!(25),
        };
        let result = check_setback_compliance(&actual, &required());
        assert_eq!(result.status, ComplianceStatus::Fail);
        assert_eq!(result.violations[1], "Side: 7.5ft < 10ft required");
    }

    #[test]
    fn test_unregulated_side_is_skipped() {
        let mut req = required();
        req.side = None;
        let actual = ActualSetbacks {
            front: dec!(30),
            side: Some(dec!(0)),
            rear: dec!(20),
        };
        let result = check_setback_compliance(&actual, &req);
        assert_eq!(result.status, ComplianceStatus::Pass);
        assert_eq!(result.sides_checked, 2);
    }

    #[test]
    fn test_envelope_interior_lot() {
        let env = buildable_envelope(&site(Some(dec!(100)), LotType::Interior), &required()).unwrap();
        assert_eq!(env.lot_depth, dec!(100));
        assert_eq!(env.buildable_width, dec!(80));
        assert_eq!(env.buildable_depth, dec!(55));
        assert_eq!(env.buildable_footprint, dec!(4400));
    }

    #[test]
    fn test_envelope_corner_lot_uses_secondary_frontage() {
        let mut req = required();
        req.secondary_frontage = Some(dec!(15));
        let env = buildable_envelope(&site(Some(dec!(100)), LotType::Corner), &req).unwrap();
        assert_eq!(env.buildable_width, dec!(75));
        assert!(env.width_method.contains("Secondary"));
    }

    #[test]
    fn test_check_setbacks_without_measurements() {
        let out = check_setbacks(
            &SetbackCheckInput {
                required: required(),
                actual: None,
                site: Some(site(Some(dec!(100)), LotType::Interior)),
            },
            &AnalysisConfig::default(),
        )
        .unwrap();
        assert!(out.result.compliance.is_none());
        assert_eq!(out.result.envelope.unwrap().buildable_footprint, dec!(4400));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_check_setbacks_rejects_negative_requirement() {
        let mut req = required();
        req.rear = dec!(-5);
        let err = check_setbacks(
            &SetbackCheckInput {
                required: req,
                actual: None,
                site: None,
            },
            &AnalysisConfig::default(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_check_setbacks_rejects_negative_frontage() {
        let err = check_setbacks(
            &SetbackCheckInput {
                required: required(),
                actual: None,
                site: Some(site(Some(dec!(-100)), LotType::Interior)),
            },
            &AnalysisConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("site.frontageLength"), "{err}");
    }

    #[test]
    fn test_envelope_requires_frontage_and_floors_at_zero() {
        assert!(buildable_envelope(&site(None, LotType::Interior), &required()).is_none());
        assert!(buildable_envelope(&site(Some(dec!(0)), LotType::Interior), &required()).is_none());

        let env = buildable_envelope(&site(Some(dec!(400)), LotType::Flag), &required()).unwrap();
        // depth 25ft cannot absorb 45ft of front + rear setbacks
        assert_eq!(env.buildable_depth, Decimal::ZERO);
        assert_eq!(env.buildable_footprint, Decimal::ZERO);
    }
}
