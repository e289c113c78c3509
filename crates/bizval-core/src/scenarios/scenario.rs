use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::BizValError;
use crate::model::{BusinessModel, FinancialModel};
use crate::types::{
    change_from_base, checked_add, checked_mul, with_metadata, ComputationOutput, Count, Money,
    Rate,
};
use crate::valuation::{value, ValuationResult};
use crate::BizValResult;

const PROBABILITY_TOLERANCE: Decimal = dec!(0.001);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The assumption triple that distinguishes one case from another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssumptionSet {
    pub growth_year_1: Rate,
    pub growth_year_5: Rate,
    pub discount_rate: Rate,
}

impl AssumptionSet {
    pub fn from_model(model: &FinancialModel) -> Self {
        Self {
            growth_year_1: model.assumptions.growth_year_1,
            growth_year_5: model.assumptions.growth_year_5,
            discount_rate: model.assumptions.discount_rate,
        }
    }
}

/// Overrides that turn the base model into an alternate case. Unset fields
/// keep the base value.
///
/// Unit-economics overrides belong to one business variant; setting one on a
/// model of the other variant is a configuration error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioAdjustments {
    // DCF assumptions
    pub growth_year_1: Option<Rate>,
    pub growth_year_5: Option<Rate>,
    pub discount_rate: Option<Rate>,
    pub terminal_growth_rate: Option<Rate>,
    pub tax_rate: Option<Rate>,
    pub capex_rate_pct: Option<Rate>,
    pub projection_years: Option<u32>,

    // Operating ratios
    pub gross_margin_pct: Option<Rate>,
    pub marketing_spend_pct: Option<Rate>,
    pub rd_spend_pct: Option<Rate>,
    pub ga_spend_pct: Option<Rate>,

    // Subscription economics
    pub customers: Option<Count>,
    pub monthly_churn_rate: Option<Rate>,
    pub customer_acquisition_cost: Option<Money>,
    pub average_revenue_per_user: Option<Money>,

    // Channel economics
    pub cost_of_goods_per_unit: Option<Money>,
    pub wholesale_units_per_month: Option<Count>,
    pub wholesale_price_per_unit: Option<Money>,
    pub retail_units_per_month: Option<Count>,
    pub retail_price_per_unit: Option<Money>,
    pub inventory_turnover_per_year: Option<Decimal>,
    pub distribution_cost_pct: Option<Rate>,
}

fn set<T: Copy>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

impl ScenarioAdjustments {
    /// A full alternate model: a clone of `base` with every set override applied.
    pub fn apply_to(&self, base: &FinancialModel) -> BizValResult<FinancialModel> {
        let mut model = base.clone();

        let a = &mut model.assumptions;
        set(&mut a.growth_year_1, self.growth_year_1);
        set(&mut a.growth_year_5, self.growth_year_5);
        set(&mut a.discount_rate, self.discount_rate);
        set(&mut a.terminal_growth_rate, self.terminal_growth_rate);
        set(&mut a.tax_rate, self.tax_rate);
        set(&mut a.capex_rate_pct, self.capex_rate_pct);
        set(&mut a.projection_years, self.projection_years);

        let ops = &mut model.operating;
        set(&mut ops.gross_margin_pct, self.gross_margin_pct);
        set(&mut ops.marketing_spend_pct, self.marketing_spend_pct);
        set(&mut ops.rd_spend_pct, self.rd_spend_pct);
        set(&mut ops.ga_spend_pct, self.ga_spend_pct);

        match &mut model.business {
            BusinessModel::Subscription(s) => {
                self.reject_overrides(&self.channel_fields(), "subscription")?;
                set(&mut s.customers, self.customers);
                set(&mut s.monthly_churn_rate, self.monthly_churn_rate);
                set(&mut s.customer_acquisition_cost, self.customer_acquisition_cost);
                set(&mut s.average_revenue_per_user, self.average_revenue_per_user);
            }
            BusinessModel::Channel(c) => {
                self.reject_overrides(&self.subscription_fields(), "channel")?;
                set(&mut c.cost_of_goods_per_unit, self.cost_of_goods_per_unit);
                set(&mut c.wholesale_units_per_month, self.wholesale_units_per_month);
                set(&mut c.wholesale_price_per_unit, self.wholesale_price_per_unit);
                set(&mut c.retail_units_per_month, self.retail_units_per_month);
                set(&mut c.retail_price_per_unit, self.retail_price_per_unit);
                set(&mut c.inventory_turnover_per_year, self.inventory_turnover_per_year);
                set(&mut c.distribution_cost_pct, self.distribution_cost_pct);
            }
        }
        Ok(model)
    }

    fn subscription_fields(&self) -> [(&'static str, bool); 4] {
        [
            ("customers", self.customers.is_some()),
            ("monthly_churn_rate", self.monthly_churn_rate.is_some()),
            ("customer_acquisition_cost", self.customer_acquisition_cost.is_some()),
            ("average_revenue_per_user", self.average_revenue_per_user.is_some()),
        ]
    }

    fn channel_fields(&self) -> [(&'static str, bool); 7] {
        [
            ("cost_of_goods_per_unit", self.cost_of_goods_per_unit.is_some()),
            ("wholesale_units_per_month", self.wholesale_units_per_month.is_some()),
            ("wholesale_price_per_unit", self.wholesale_price_per_unit.is_some()),
            ("retail_units_per_month", self.retail_units_per_month.is_some()),
            ("retail_price_per_unit", self.retail_price_per_unit.is_some()),
            ("inventory_turnover_per_year", self.inventory_turnover_per_year.is_some()),
            ("distribution_cost_pct", self.distribution_cost_pct.is_some()),
        ]
    }

    fn reject_overrides(&self, fields: &[(&'static str, bool)], business: &str) -> BizValResult<()> {
        match fields.iter().find(|(_, is_set)| *is_set) {
            Some((field, _)) => Err(BizValError::configuration(
                *field,
                format!("Override does not apply to a {business} business"),
            )),
            None => Ok(()),
        }
    }
}

/// Probabilities attached to the three cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioWeights {
    pub bear: Rate,
    pub base: Rate,
    pub bull: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioCase {
    pub name: String,
    pub assumptions: AssumptionSet,
    pub valuation: ValuationResult,
    /// Enterprise value change against the base case
    pub change_from_base_pct: Option<Rate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub bear_case: ScenarioCase,
    pub base_case: ScenarioCase,
    pub bull_case: ScenarioCase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability_weighted_value: Option<Money>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Value the base model and the bear and bull alternates side by side.
///
/// The three runs are independent and evaluated in parallel. Any case that
/// fails validation fails the comparison.
pub fn compare_scenarios(
    base: &FinancialModel,
    bear: &ScenarioAdjustments,
    bull: &ScenarioAdjustments,
    weights: Option<&ScenarioWeights>,
) -> BizValResult<ComputationOutput<ScenarioComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if let Some(w) = weights {
        validate_weights(w, &mut warnings)?;
    }

    let cases = [
        ("Bear", bear.apply_to(base).map_err(|e| prefix_case("Bear", e))?),
        ("Base", base.clone()),
        ("Bull", bull.apply_to(base).map_err(|e| prefix_case("Bull", e))?),
    ];

    let valuations: Vec<ValuationResult> = cases
        .par_iter()
        .map(|(name, model)| value(model).map_err(|e| prefix_case(name, e)))
        .collect::<BizValResult<_>>()?;

    let base_ev = valuations[1].enterprise_value;
    let mut built = cases
        .iter()
        .zip(valuations)
        .map(|((name, model), valuation)| ScenarioCase {
            name: name.to_string(),
            assumptions: AssumptionSet::from_model(model),
            change_from_base_pct: change_from_base(valuation.enterprise_value, base_ev),
            valuation,
        });

    let (bear_case, base_case, bull_case) = match (built.next(), built.next(), built.next()) {
        (Some(bear), Some(base), Some(bull)) => (bear, base, bull),
        _ => {
            return Err(BizValError::InsufficientData(
                "Scenario comparison needs bear, base and bull results".into(),
            ))
        }
    };

    if bear_case.valuation.enterprise_value > base_ev {
        warnings.push("Bear case enterprise value exceeds the base case".to_string());
    }
    if bull_case.valuation.enterprise_value < base_ev {
        warnings.push("Bull case enterprise value is below the base case".to_string());
    }

    let probability_weighted_value = weights
        .map(|w| {
            [
                (w.bear, bear_case.valuation.enterprise_value),
                (w.base, base_case.valuation.enterprise_value),
                (w.bull, bull_case.valuation.enterprise_value),
            ]
            .into_iter()
            .try_fold(Decimal::ZERO, |acc, (p, ev)| {
                let weighted = checked_mul(p, ev, "probability_weighted_value")?;
                checked_add(acc, weighted, "probability_weighted_value")
            })
        })
        .transpose()?;

    let output = ScenarioComparison {
        bear_case,
        base_case,
        bull_case,
        probability_weighted_value,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Bear/Base/Bull Scenario Analysis",
        &serde_json::json!({
            "bear": bear,
            "bull": bull,
            "weights": weights,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Tag a case's error with the case it came from, e.g. `bull_case.discount_rate`.
fn prefix_case(name: &str, e: BizValError) -> BizValError {
    let case = name.to_lowercase();
    match e {
        BizValError::InvalidAssumption { field, reason } => BizValError::InvalidAssumption {
            field: format!("{case}_case.{field}"),
            reason,
        },
        BizValError::Configuration { field, reason } => BizValError::Configuration {
            field: format!("{case}_case.{field}"),
            reason,
        },
        other => other,
    }
}

fn validate_weights(w: &ScenarioWeights, warnings: &mut Vec<String>) -> BizValResult<()> {
    for (name, p) in [("bear", w.bear), ("base", w.base), ("bull", w.bull)] {
        if p < Decimal::ZERO || p > Decimal::ONE {
            return Err(BizValError::invalid_assumption(
                format!("weights.{name}"),
                "Probability must be between 0 and 1",
            ));
        }
    }

    let total = w.bear + w.base + w.bull;
    let gap = (total - Decimal::ONE).abs();
    if gap > PROBABILITY_TOLERANCE {
        return Err(BizValError::invalid_assumption(
            "weights",
            format!("Probabilities must sum to 1.0 (got {total})"),
        ));
    }
    if !gap.is_zero() {
        warnings.push(format!(
            "Probabilities sum to {total}; treated as approximately 1.0"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
