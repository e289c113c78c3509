use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use bizval_core::model::{FinancialModelRecord, ScenarioAdjustmentsRecord};
use bizval_core::scenarios::{
    self, Perturbation, ScenarioAdjustments, ScenarioWeights, SensitivityDimension, DEFAULT_DELTAS,
};
use bizval_core::FinancialModel;

use crate::input;

/// Arguments for one-way sensitivity analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SensitivityArgs {
    /// Path to a JSON or YAML model record (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Assumption to perturb
    #[arg(long, value_enum)]
    pub dimension: DimensionArg,

    /// Comma-separated deltas (e.g. "-0.2,-0.1,0,0.1,0.2")
    #[arg(long)]
    pub deltas: Option<String>,

    /// Treat deltas as absolute shifts instead of relative multipliers
    #[arg(long)]
    pub absolute: bool,
}

/// Arguments for the two-way growth x discount-rate grid
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct GridArgs {
    /// Path to a JSON or YAML model record (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Comma-separated growth deltas (rows)
    #[arg(long)]
    pub growth_deltas: Option<String>,

    /// Comma-separated discount-rate deltas (columns)
    #[arg(long)]
    pub discount_deltas: Option<String>,

    /// Treat growth deltas as absolute shifts
    #[arg(long)]
    pub absolute_growth: bool,

    /// Treat discount-rate deltas as absolute shifts
    #[arg(long)]
    pub absolute_discount: bool,
}

/// Arguments for bear/base/bull comparison
#[derive(Args)]
pub struct ScenariosArgs {
    /// Path to a JSON or YAML scenario document (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DimensionArg {
    /// Both growth anchors
    Growth,
    DiscountRate,
}

impl From<DimensionArg> for SensitivityDimension {
    fn from(arg: DimensionArg) -> Self {
        match arg {
            DimensionArg::Growth => SensitivityDimension::Growth,
            DimensionArg::DiscountRate => SensitivityDimension::DiscountRate,
        }
    }
}

/// Model record plus bear/bull overrides, both on the platform's percent
/// scale. Weights are plain probabilities.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioDocument {
    model: FinancialModelRecord,
    #[serde(default)]
    bear: ScenarioAdjustmentsRecord,
    #[serde(default)]
    bull: ScenarioAdjustmentsRecord,
    #[serde(default)]
    weights: Option<ScenarioWeights>,
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let model = super::load_model(args.input.as_deref())?;
    let deltas = parse_deltas(args.deltas.as_deref(), args.absolute)?;

    let result = scenarios::analyze_sensitivity(&model, args.dimension.into(), &deltas)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_grid(args: GridArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let model = super::load_model(args.input.as_deref())?;
    let growth = parse_deltas(args.growth_deltas.as_deref(), args.absolute_growth)?;
    let discount = parse_deltas(args.discount_deltas.as_deref(), args.absolute_discount)?;

    let result = scenarios::sensitivity_grid(&model, &growth, &discount)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_scenarios(args: ScenariosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let doc: ScenarioDocument = input::read_document(args.input.as_deref())?;
    let model = FinancialModel::try_from(doc.model)?;
    let bear: ScenarioAdjustments = doc.bear.into();
    let bull: ScenarioAdjustments = doc.bull.into();

    let result = scenarios::compare_scenarios(&model, &bear, &bull, doc.weights.as_ref())?;
    Ok(serde_json::to_value(result)?)
}

/// Parse a comma-separated delta list; `None` yields the default five.
fn parse_deltas(
    raw: Option<&str>,
    absolute: bool,
) -> Result<Vec<Perturbation>, Box<dyn std::error::Error>> {
    let raw = match raw {
        Some(r) => r,
        None => return Ok(DEFAULT_DELTAS.to_vec()),
    };

    let mut deltas = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let x: Decimal = part
            .parse()
            .map_err(|e| format!("Invalid delta '{}': {}", part, e))?;
        deltas.push(if absolute {
            Perturbation::Absolute(x)
        } else {
            Perturbation::Relative(x)
        });
    }

    if deltas.is_empty() {
        return Err(format!("No deltas found in '{}'", raw).into());
    }
    Ok(deltas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_deltas_when_omitted() {
        assert_eq!(parse_deltas(None, false).unwrap(), DEFAULT_DELTAS.to_vec());
    }

    #[test]
    fn test_parse_relative_and_absolute() {
        assert_eq!(
            parse_deltas(Some("-0.1, 0 ,0.25"), false).unwrap(),
            vec![
                Perturbation::Relative(dec!(-0.1)),
                Perturbation::Relative(dec!(0)),
                Perturbation::Relative(dec!(0.25)),
            ]
        );
        assert_eq!(
            parse_deltas(Some("0.01"), true).unwrap(),
            vec![Perturbation::Absolute(dec!(0.01))]
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_deltas(Some("ten"), false).is_err());
        assert!(parse_deltas(Some(" , "), false).is_err());
    }

    #[test]
    fn test_scenario_document_defaults() {
        let doc: ScenarioDocument = serde_json::from_str(
            r#"{"model": {"businessType": "saas"}, "bull": {"growthYear1": 60}}"#,
        )
        .unwrap();
        assert!(doc.weights.is_none());
        assert_eq!(doc.bull.growth_year1, Some(dec!(60)));
        assert!(doc.bear.discount_rate.is_none());
    }
}
