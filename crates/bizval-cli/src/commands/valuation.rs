use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use bizval_core::model::TaxTreatment;
use bizval_core::valuation;

/// Arguments for the DCF valuation
#[derive(Args)]
pub struct ValueArgs {
    /// Path to a JSON or YAML model record (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Share count for value per share (overrides the record)
    #[arg(long)]
    pub shares_outstanding: Option<Decimal>,

    /// How tax is levied on EBITDA
    #[arg(long, value_enum, default_value = "flat")]
    pub tax_treatment: TaxTreatmentArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TaxTreatmentArg {
    /// Tax = EBITDA x rate, negative in loss years
    Flat,
    /// No tax in years with negative EBITDA
    PositiveEbitdaOnly,
}

impl From<TaxTreatmentArg> for TaxTreatment {
    fn from(arg: TaxTreatmentArg) -> Self {
        match arg {
            TaxTreatmentArg::Flat => TaxTreatment::Flat,
            TaxTreatmentArg::PositiveEbitdaOnly => TaxTreatment::PositiveEbitdaOnly,
        }
    }
}

pub fn run_value(args: ValueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut model = super::load_model(args.input.as_deref())?;
    if args.shares_outstanding.is_some() {
        model.shares_outstanding = args.shares_outstanding;
    }
    model.assumptions.tax_treatment = args.tax_treatment.into();

    let result = valuation::calculate_valuation(&model)?;
    Ok(serde_json::to_value(result)?)
}
