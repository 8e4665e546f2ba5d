use clap::Args;
use serde_json::Value;

use zonewise_core::setbacks::{check_setbacks, SetbackCheckInput};

use super::Context;
use crate::input;

/// Arguments for a standalone setback review
#[derive(Args)]
pub struct SetbackArgs {
    /// Path to a JSON or YAML file with `required`, `actual` and `site`
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_setbacks(args: SetbackArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let check: SetbackCheckInput = input::read_input(args.input.as_deref(), "Setback input")?;
    let output = check_setbacks(&check, &ctx.config)?;
    Ok(serde_json::to_value(output)?)
}
