pub mod analysis;
pub mod export;
pub mod presets;
pub mod report;
pub mod setbacks;

use clap::Args;
use zonewise_core::{AnalysisConfig, MarketPreset, ReportInput};

use crate::input;

/// Where a command reads its parcel from.
#[derive(Args)]
pub struct InputArgs {
    /// Path to a JSON or YAML report input (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Market preset, overriding the input's marketPreset
    #[arg(long)]
    pub market: Option<MarketPreset>,
}

impl InputArgs {
    pub fn load(&self) -> Result<ReportInput, Box<dyn std::error::Error>> {
        let mut report_input: ReportInput = input::read_input(self.input.as_deref(), "Report input")?;
        if let Some(preset) = self.market {
            report_input.market_preset = preset;
        }
        Ok(report_input)
    }
}

/// Settings shared by every command.
pub struct Context {
    pub config: AnalysisConfig,
}
