//! Executive summary as an ordered table of named rules.
//!
//! Each rule pairs a predicate with the sentence it contributes. Rules fire
//! in table order within their section, so the summary is deterministic and
//! every line can be traced back to a rule id.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::ReportInput;
use crate::analysis::SiteAnalysis;
use crate::config::SummaryThresholds;
use crate::format::{format_currency, format_multiple, format_number, format_percent, format_plain, format_sq_ft};
use crate::scenarios::DevelopmentScenario;
use crate::setbacks::ComplianceStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveSummary {
    pub key_findings: Vec<String>,
    pub opportunities: Vec<String>,
    pub challenges: Vec<String>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SummarySection {
    Finding,
    Opportunity,
    Challenge,
}

pub struct SummaryContext<'a> {
    pub input: &'a ReportInput,
    pub analysis: &'a SiteAnalysis,
    pub scenarios: &'a [DevelopmentScenario],
    pub thresholds: &'a SummaryThresholds,
}

impl SummaryContext<'_> {
    fn recommended(&self) -> Option<&DevelopmentScenario> {
        self.scenarios.iter().find(|s| s.is_recommended)
    }
}

pub struct SummaryRule {
    pub id: &'static str,
    pub section: SummarySection,
    pub applies: fn(&SummaryContext) -> bool,
    pub render: fn(&SummaryContext) -> String,
}

/// A rule that fired, with its rendered sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct FiredRule {
    pub id: &'static str,
    pub section: SummarySection,
    pub text: String,
}

pub const NO_VIABLE_SCENARIO: &str =
    "No viable development scenario identified under current zoning.";

pub const SUMMARY_RULES: &[SummaryRule] = &[
    // --- Key findings ---
    SummaryRule {
        id: "max-buildable",
        section: SummarySection::Finding,
        applies: |_| true,
        render: |c| {
            format!(
                "Maximum buildable area of {} under {} zoning (max FAR {})",
                format_sq_ft(c.analysis.capacity.max_building_area),
                c.input.zoning.zoning_code,
                format_plain(c.input.zoning.max_far)
            )
        },
    },
    SummaryRule {
        id: "untapped-potential",
        section: SummarySection::Finding,
        applies: |c| {
            c.analysis
                .financial_opportunity
                .untapped_development_potential
                .is_some_and(|u| u > c.thresholds.untapped_potential_pct)
        },
        render: |c| {
            let f = &c.analysis.financial_opportunity;
            format!(
                "{} of allowable development capacity is untapped ({} of unused rights)",
                format_percent(f.untapped_development_potential.unwrap_or_default()),
                format_sq_ft(f.additional_buildable_area)
            )
        },
    },
    SummaryRule {
        id: "vacant-site",
        section: SummarySection::Finding,
        applies: |c| c.input.site.is_vacant,
        render: |c| {
            format!(
                "Vacant site: all {} of development rights are available",
                format_sq_ft(c.analysis.capacity.unused_development_rights)
            )
        },
    },
    SummaryRule {
        id: "nonconforming",
        section: SummarySection::Finding,
        applies: |c| c.analysis.capacity.is_nonconforming,
        render: |c| {
            format!(
                "Existing building ({}) exceeds the {} allowed today and is legally nonconforming",
                format_sq_ft(c.analysis.capacity.existing_building_area),
                format_sq_ft(c.analysis.capacity.max_building_area)
            )
        },
    },
    SummaryRule {
        id: "residential-units",
        section: SummarySection::Finding,
        applies: |c| c.analysis.capacity.max_residential_units.is_some_and(|u| u > 0),
        render: |c| {
            format!(
                "Zoning density supports up to {} residential units",
                c.analysis.capacity.max_residential_units.unwrap_or(0)
            )
        },
    },
    SummaryRule {
        id: "lodging-rooms",
        section: SummarySection::Finding,
        applies: |c| c.analysis.capacity.max_lodging_rooms.is_some_and(|r| r > 0),
        render: |c| {
            format!(
                "Zoning density supports up to {} hotel rooms",
                c.analysis.capacity.max_lodging_rooms.unwrap_or(0)
            )
        },
    },
    // --- Opportunities ---
    SummaryRule {
        id: "bonus-far",
        section: SummarySection::Opportunity,
        applies: |c| c.input.zoning.max_far > c.input.zoning.base_far,
        render: |c| {
            format!(
                "Bonus FAR adds {} of floor area above the base entitlement",
                format_sq_ft(c.analysis.capacity.bonus_building_area)
            )
        },
    },
    SummaryRule {
        id: "live-local",
        section: SummarySection::Opportunity,
        applies: |c| c.input.zoning.live_local_applicable,
        render: |_| {
            "Florida Live Local Act applies, allowing density and height bonuses for qualifying affordable housing"
                .to_string()
        },
    },
    SummaryRule {
        id: "transit",
        section: SummarySection::Opportunity,
        applies: |c| c.input.zoning.tod_status.is_some() || c.input.zoning.transit_corridor,
        render: |c| match &c.input.zoning.tod_status {
            Some(status) => format!(
                "Transit-oriented designation ({status}) supports reduced parking and added intensity"
            ),
            None => "Transit corridor location supports reduced parking and added intensity"
                .to_string(),
        },
    },
    SummaryRule {
        id: "by-right-mix",
        section: SummarySection::Opportunity,
        applies: |c| {
            c.input.allowed_uses.by_right_categories().len()
                >= c.thresholds.by_right_mix_categories
        },
        render: |c| {
            let labels: Vec<&str> = c
                .input
                .allowed_uses
                .by_right_categories()
                .iter()
                .map(|u| u.label())
                .collect();
            format!(
                "{} uses are permitted by right, enabling a mixed-use program without discretionary approval",
                labels.join(", ")
            )
        },
    },
    SummaryRule {
        id: "scenario-profit",
        section: SummarySection::Opportunity,
        applies: |c| {
            c.recommended()
                .is_some_and(|s| s.projections.development_profit > Decimal::ZERO)
        },
        render: |c| match c.recommended() {
            Some(s) => format!(
                "{} projects {} development profit at a {} IRR",
                s.name,
                format_currency(s.projections.development_profit),
                format_percent(s.projections.irr)
            ),
            None => String::new(),
        },
    },
    // --- Challenges ---
    SummaryRule {
        id: "historic",
        section: SummarySection::Challenge,
        applies: |c| c.input.zoning.historic_district.is_some(),
        render: |c| {
            format!(
                "Located in the {} historic district; design review will apply",
                c.input.zoning.historic_district.as_deref().unwrap_or_default()
            )
        },
    },
    SummaryRule {
        id: "leed",
        section: SummarySection::Challenge,
        applies: |c| c.input.zoning.leed_requirement.is_some(),
        render: |c| {
            format!(
                "{} certification is required for new construction",
                c.input.zoning.leed_requirement.as_deref().unwrap_or_default()
            )
        },
    },
    SummaryRule {
        id: "faa-height",
        section: SummarySection::Challenge,
        applies: |c| {
            matches!(
                (c.input.zoning.faa_height_limit_feet, c.input.zoning.max_height_feet),
                (Some(faa), Some(zoning)) if faa < zoning
            )
        },
        render: |c| {
            format!(
                "FAA height limit of {}ft is below the {}ft zoning height",
                format_plain(c.input.zoning.faa_height_limit_feet.unwrap_or_default()),
                format_plain(c.input.zoning.max_height_feet.unwrap_or_default())
            )
        },
    },
    SummaryRule {
        id: "small-lot",
        section: SummarySection::Challenge,
        applies: |c| c.input.site.lot_area_acres < c.thresholds.small_lot_acres,
        render: |c| {
            format!(
                "Small lot ({} acres) constrains floor plates and parking",
                format_plain(c.input.site.lot_area_acres)
            )
        },
    },
    SummaryRule {
        id: "open-space",
        section: SummarySection::Challenge,
        applies: |c| c.input.zoning.min_open_space >= c.thresholds.high_open_space,
        render: |c| {
            format!(
                "{} minimum open space reduces the buildable footprint",
                format_percent(c.input.zoning.min_open_space * dec!(100))
            )
        },
    },
    SummaryRule {
        id: "setback-violations",
        section: SummarySection::Challenge,
        applies: |c| {
            c.analysis
                .setback_compliance
                .as_ref()
                .is_some_and(|s| s.status != ComplianceStatus::Pass)
        },
        render: |c| {
            let violations = c
                .analysis
                .setback_compliance
                .as_ref()
                .map(|s| s.violations.join("; "))
                .unwrap_or_default();
            format!("Existing structure has setback violations: {violations}")
        },
    },
    SummaryRule {
        id: "no-scenario",
        section: SummarySection::Challenge,
        applies: |c| c.scenarios.is_empty(),
        render: |_| {
            "No development scenario is feasible under current zoning and use permissions"
                .to_string()
        },
    },
];

/// Every rule that fires, in table order.
pub fn evaluate_rules(ctx: &SummaryContext) -> Vec<FiredRule> {
    SUMMARY_RULES
        .iter()
        .filter(|rule| (rule.applies)(ctx))
        .map(|rule| FiredRule {
            id: rule.id,
            section: rule.section,
            text: (rule.render)(ctx),
        })
        .collect()
}

pub fn summarize(ctx: &SummaryContext) -> ExecutiveSummary {
    let mut summary = ExecutiveSummary {
        key_findings: Vec::new(),
        opportunities: Vec::new(),
        challenges: Vec::new(),
        recommendation: recommendation(ctx.recommended()),
    };

    for fired in evaluate_rules(ctx) {
        let section = match fired.section {
            SummarySection::Finding => &mut summary.key_findings,
            SummarySection::Opportunity => &mut summary.opportunities,
            SummarySection::Challenge => &mut summary.challenges,
        };
        section.push(fired.text);
    }
    summary
}

fn recommendation(recommended: Option<&DevelopmentScenario>) -> String {
    match recommended {
        Some(s) => format!(
            "Pursue the {} scenario: {} across {} {} with {} total cost, a projected {} IRR and a {} equity multiple.",
            s.name,
            format_sq_ft(s.total_sq_ft),
            format_number(Decimal::from(s.stories)),
            if s.stories == 1 { "story" } else { "stories" },
            format_currency(s.costs.total_cost),
            format_percent(s.projections.irr),
            format_multiple(s.projections.equity_multiple)
        ),
        None => NO_VIABLE_SCENARIO.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_ids_are_unique() {
        let ids: HashSet<&str> = SUMMARY_RULES.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), SUMMARY_RULES.len());
    }

    #[test]
    fn test_rules_grouped_by_section() {
        let sections: Vec<SummarySection> = SUMMARY_RULES.iter().map(|r| r.section).collect();
        let first_opportunity = sections
            .iter()
            .position(|s| *s == SummarySection::Opportunity)
            .unwrap();
        let first_challenge = sections
            .iter()
            .position(|s| *s == SummarySection::Challenge)
            .unwrap();
        assert!(sections[..first_opportunity]
            .iter()
            .all(|s| *s == SummarySection::Finding));
        assert!(sections[first_challenge..]
            .iter()
            .all(|s| *s == SummarySection::Challenge));
        assert_eq!(SUMMARY_RULES[0].id, "max-buildable");
    }
}
