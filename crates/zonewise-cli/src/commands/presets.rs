use clap::Args;
use serde_json::{json, Value};

use zonewise_core::MarketPreset;

/// Arguments for listing market presets
#[derive(Args)]
pub struct PresetArgs {
    /// Show the full assumption bundle for one preset
    pub name: Option<MarketPreset>,
}

pub fn run_presets(args: PresetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(preset) = args.name {
        return Ok(serde_json::to_value(preset.assumptions())?);
    }

    let rows = MarketPreset::ALL
        .into_iter()
        .map(|preset| {
            let market = preset.assumptions();
            json!({
                "preset": preset.as_str(),
                "label": market.label,
                "default": preset == MarketPreset::default(),
                "landValuePerSqFt": market.land_value_per_sq_ft,
                "blendedValuePerSqFt": market.blended_value_per_sq_ft,
                "demandScore": market.market_demand_score,
            })
        })
        .collect();
    Ok(Value::Array(rows))
}
