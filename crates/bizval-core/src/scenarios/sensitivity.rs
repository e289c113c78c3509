use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::BizValError;
use crate::model::FinancialModel;
use crate::types::{
    change_from_base, checked_add, checked_mul, with_metadata, ComputationOutput, Money, Rate,
};
use crate::valuation::{value, ValuationResult};
use crate::BizValResult;

use super::AssumptionSet;

/// Relative perturbations used when the caller does not supply any.
pub const DEFAULT_DELTAS: [Perturbation; 5] = [
    Perturbation::Relative(dec!(-0.20)),
    Perturbation::Relative(dec!(-0.10)),
    Perturbation::Relative(Decimal::ZERO),
    Perturbation::Relative(dec!(0.10)),
    Perturbation::Relative(dec!(0.20)),
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input the sensitivity run varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityDimension {
    /// Both growth anchors together
    Growth,
    DiscountRate,
}

/// A shift applied to a rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Perturbation {
    /// `rate * (1 + x)`
    Relative(Decimal),
    /// `rate + x`
    Absolute(Decimal),
}

impl Perturbation {
    /// The shifted rate; a shift that leaves the decimal range is an error.
    pub fn apply(&self, rate: Rate) -> BizValResult<Rate> {
        match *self {
            Perturbation::Relative(x) => {
                checked_mul(rate, checked_add(Decimal::ONE, x, "delta")?, "delta")
            }
            Perturbation::Absolute(x) => checked_add(rate, x, "delta"),
        }
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            Perturbation::Relative(x) | Perturbation::Absolute(x) => x.is_zero(),
        }
    }

    /// Display label: `Base`, `+10%` for relative shifts, `-1.50pp` for absolute.
    pub fn label(&self) -> String {
        if self.is_zero() {
            return "Base".to_string();
        }
        match *self {
            Perturbation::Relative(x) => {
                format!("{:+}%", x.saturating_mul(dec!(100)).normalize())
            }
            Perturbation::Absolute(x) => format!("{:+.2}pp", x.saturating_mul(dec!(100))),
        }
    }
}

/// Result of one perturbed valuation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityScenario {
    pub label: String,
    pub delta: Perturbation,
    /// Perturbed growth_year_1 (growth) or discount_rate
    pub perturbed_value: Rate,
    pub assumptions: AssumptionSet,
    /// `None` when the perturbed model breaks an invariant
    pub enterprise_value: Option<Money>,
    pub equity_value: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_per_share: Option<Money>,
    /// (EV - base EV) / |base EV|
    pub percent_change_from_base: Option<Rate>,
}

/// Output of a one-dimensional sensitivity run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub dimension: SensitivityDimension,
    pub base_enterprise_value: Money,
    /// In the order the deltas were supplied
    pub scenarios: Vec<SensitivityScenario>,
}

/// Two-way growth x discount-rate table of enterprise values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityGrid {
    pub growth_labels: Vec<String>,
    pub discount_rate_labels: Vec<String>,
    pub discount_rates: Vec<Rate>,
    /// matrix[i][j] = EV at growth delta i and discount-rate delta j
    pub matrix: Vec<Vec<Option<Money>>>,
    pub base_enterprise_value: Money,
    /// Cell where both deltas are zero, if the axes include it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_case_position: Option<(usize, usize)>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Clone `model` with only the targeted dimension perturbed.
pub fn perturb(
    model: &FinancialModel,
    dimension: SensitivityDimension,
    delta: &Perturbation,
) -> BizValResult<FinancialModel> {
    let mut perturbed = model.clone();
    let a = &mut perturbed.assumptions;
    match dimension {
        SensitivityDimension::Growth => {
            a.growth_year_1 = delta.apply(a.growth_year_1)?;
            a.growth_year_5 = delta.apply(a.growth_year_5)?;
        }
        SensitivityDimension::DiscountRate => {
            a.discount_rate = delta.apply(a.discount_rate)?;
        }
    }
    Ok(perturbed)
}

/// Re-value the model once per delta along a single dimension.
///
/// Runs are independent and evaluated in parallel; the output keeps the
/// order of `deltas`. A perturbation that breaks an invariant, or whose
/// valuation leaves the decimal range, is reported with empty values and a
/// warning rather than failing the whole run. A delta that cannot be applied
/// to the base rate at all is an input error.
pub fn analyze_sensitivity(
    model: &FinancialModel,
    dimension: SensitivityDimension,
    deltas: &[Perturbation],
) -> BizValResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();

    if deltas.is_empty() {
        return Err(BizValError::InsufficientData(
            "At least one sensitivity delta is required".into(),
        ));
    }

    let base = value(model)?;
    let base_ev = base.enterprise_value;

    let perturbed = deltas
        .iter()
        .map(|delta| perturb(model, dimension, delta))
        .collect::<BizValResult<Vec<_>>>()?;

    let runs: Vec<(SensitivityScenario, Option<String>)> = deltas
        .par_iter()
        .zip(perturbed.par_iter())
        .map(|(delta, p)| run_perturbation(p, dimension, delta, base_ev))
        .collect();

    let mut warnings = Vec::new();
    let mut scenarios = Vec::with_capacity(runs.len());
    for (scenario, warning) in runs {
        warnings.extend(warning);
        scenarios.push(scenario);
    }

    let output = SensitivityOutput {
        dimension,
        base_enterprise_value: base_ev,
        scenarios,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "One-Way DCF Sensitivity",
        &serde_json::json!({
            "dimension": dimension,
            "deltas": deltas,
            "base": AssumptionSet::from_model(model),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Evaluate the 2-way growth x discount-rate grid.
pub fn sensitivity_grid(
    model: &FinancialModel,
    growth_deltas: &[Perturbation],
    discount_deltas: &[Perturbation],
) -> BizValResult<ComputationOutput<SensitivityGrid>> {
    let start = Instant::now();

    if growth_deltas.is_empty() || discount_deltas.is_empty() {
        return Err(BizValError::InsufficientData(
            "Both grid axes need at least one delta".into(),
        ));
    }

    let base = value(model)?;

    let discount_rates = discount_deltas
        .iter()
        .map(|d| d.apply(model.assumptions.discount_rate))
        .collect::<BizValResult<Vec<_>>>()?;
    let grown_models = growth_deltas
        .iter()
        .map(|g| perturb(model, SensitivityDimension::Growth, g))
        .collect::<BizValResult<Vec<_>>>()?;

    let rows: Vec<(Vec<Option<Money>>, Vec<String>)> = growth_deltas
        .par_iter()
        .zip(grown_models.par_iter())
        .map(|(g, grown)| {
            let mut row = Vec::with_capacity(discount_deltas.len());
            let mut failures = Vec::new();
            for (d, rate) in discount_deltas.iter().zip(&discount_rates) {
                let mut cell = grown.clone();
                cell.assumptions.discount_rate = *rate;
                match value(&cell) {
                    Ok(v) => row.push(Some(v.enterprise_value)),
                    Err(e) => {
                        failures.push(format!(
                            "Evaluation failed at growth {}, discount rate {}: {e}",
                            g.label(),
                            d.label()
                        ));
                        row.push(None);
                    }
                }
            }
            (row, failures)
        })
        .collect();

    let mut warnings = Vec::new();
    let mut matrix = Vec::with_capacity(rows.len());
    for (row, failures) in rows {
        warnings.extend(failures);
        matrix.push(row);
    }

    let base_row = growth_deltas.iter().position(Perturbation::is_zero);
    let base_col = discount_deltas.iter().position(Perturbation::is_zero);

    let output = SensitivityGrid {
        growth_labels: growth_deltas.iter().map(Perturbation::label).collect(),
        discount_rate_labels: discount_deltas.iter().map(Perturbation::label).collect(),
        discount_rates,
        matrix,
        base_enterprise_value: base.enterprise_value,
        base_case_position: base_row.zip(base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Two-Way DCF Sensitivity (Growth x Discount Rate)",
        &serde_json::json!({
            "growth_deltas": growth_deltas,
            "discount_deltas": discount_deltas,
            "base": AssumptionSet::from_model(model),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn run_perturbation(
    perturbed: &FinancialModel,
    dimension: SensitivityDimension,
    delta: &Perturbation,
    base_ev: Money,
) -> (SensitivityScenario, Option<String>) {
    let assumptions = AssumptionSet::from_model(perturbed);
    let perturbed_value = match dimension {
        SensitivityDimension::Growth => assumptions.growth_year_1,
        SensitivityDimension::DiscountRate => assumptions.discount_rate,
    };

    let (outcome, warning): (Option<ValuationResult>, Option<String>) = match value(perturbed) {
        Ok(v) => (Some(v), None),
        Err(e) => {
            tracing::warn!(label = %delta.label(), error = %e, "sensitivity run failed");
            (None, Some(format!("Scenario {} skipped: {e}", delta.label())))
        }
    };

    let enterprise_value = outcome.as_ref().map(|v| v.enterprise_value);
    let scenario = SensitivityScenario {
        label: delta.label(),
        delta: *delta,
        perturbed_value,
        assumptions,
        enterprise_value,
        equity_value: outcome.as_ref().map(|v| v.equity_value),
        value_per_share: outcome.as_ref().and_then(|v| v.value_per_share),
        percent_change_from_base: enterprise_value.and_then(|ev| change_from_base(ev, base_ev)),
    };
    (scenario, warning)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
