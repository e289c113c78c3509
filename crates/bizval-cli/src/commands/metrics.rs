use clap::Args;
use serde_json::Value;

use bizval_core::metrics;

/// Arguments for the unit-economics summary
#[derive(Args)]
pub struct MetricsArgs {
    /// Path to a JSON or YAML model record (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_metrics(args: MetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let model = super::load_model(args.input.as_deref())?;
    let result = metrics::calculate_metrics(&model)?;
    Ok(serde_json::to_value(result)?)
}
