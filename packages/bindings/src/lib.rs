use napi::Result as NapiResult;
use napi_derive::napi;
use serde_json::json;

use zonewise_core::setbacks::SetbackCheckInput;
use zonewise_core::{AnalysisConfig, MarketPreset, ReportInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse the report input and the optional config that every entry point takes.
fn parse_request(
    input_json: &str,
    config_json: Option<String>,
) -> NapiResult<(ReportInput, AnalysisConfig)> {
    let input: ReportInput = serde_json::from_str(input_json).map_err(to_napi_error)?;
    Ok((input, parse_config(config_json)?))
}

fn parse_config(config_json: Option<String>) -> NapiResult<AnalysisConfig> {
    match config_json {
        Some(raw) => serde_json::from_str(&raw).map_err(to_napi_error),
        None => Ok(AnalysisConfig::default()),
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[napi]
pub fn generate_report(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let (input, config) = parse_request(&input_json, config_json)?;
    let report = zonewise_core::generate_report(&input, &config).map_err(to_napi_error)?;
    zonewise_core::export_to_json(&report).map_err(to_napi_error)
}

/// Markdown digest of a report JSON produced by `generateReport`.
#[napi]
pub fn export_markdown(report_json: String) -> NapiResult<String> {
    let report = zonewise_core::import_from_json(&report_json).map_err(to_napi_error)?;
    Ok(zonewise_core::export_to_markdown(&report))
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_kpis(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let (input, config) = parse_request(&input_json, config_json)?;
    let kpis = zonewise_core::calculate_kpis(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&kpis).map_err(to_napi_error)
}

#[napi]
pub fn development_capacity(
    input_json: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let (input, config) = parse_request(&input_json, config_json)?;
    let output = zonewise_core::run_capacity_analysis(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn check_setbacks(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: SetbackCheckInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let output = zonewise_core::check_setbacks(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Markets
// ---------------------------------------------------------------------------

/// Every preset keyed by its name, with full assumptions.
#[napi]
pub fn market_presets() -> NapiResult<String> {
    let presets: serde_json::Map<String, serde_json::Value> = MarketPreset::ALL
        .into_iter()
        .map(|preset| {
            serde_json::to_value(preset.assumptions())
                .map(|assumptions| (preset.as_str().to_string(), assumptions))
        })
        .collect::<Result<_, _>>()
        .map_err(to_napi_error)?;
    serde_json::to_string(&json!({
        "default": MarketPreset::default().as_str(),
        "presets": presets,
    }))
    .map_err(to_napi_error)
}
