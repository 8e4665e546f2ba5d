pub mod analysis;
pub mod capacity;
pub mod config;
pub mod error;
pub mod financial;
pub mod format;
pub mod kpi;
pub mod property;
pub mod report;
pub mod scenarios;
pub mod setbacks;
pub mod time_value;
pub mod types;
pub mod validation;
pub mod zoning;

pub use analysis::{analyze_site, run_capacity_analysis, SiteAnalysis};
pub use config::{AnalysisConfig, MarketAssumptions, MarketPreset};
pub use error::ZoneWiseError;
pub use kpi::{calculate_kpis, Kpi, KpiCategory, KpiValue};
pub use report::{
    export_to_json, export_to_markdown, generate_report, generate_report_at, import_from_json,
    DevelopmentAnalysisReport, ReportInput,
};
pub use scenarios::{generate_scenarios, DevelopmentScenario};
pub use setbacks::{check_setbacks, SetbackCheckInput};
pub use types::*;

/// Standard result type for all zoning analysis operations
pub type ZoneWiseResult<T> = Result<T, ZoneWiseError>;
