use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::BizValError;
use crate::model::{FinancialModel, TaxTreatment};
use crate::projection::{project_operations, OperatingYear};
use crate::time_value::{discount_factor, gordon_growth_value, present_value};
use crate::types::{checked_add, checked_div, checked_mul, with_metadata, ComputationOutput, Money, Rate};
use crate::BizValResult;

/// Terminal value share of EV above which a warning is raised.
const TERMINAL_CONCENTRATION_WARNING: Decimal = dec!(0.75);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One projected year of the DCF, including its discounted cash flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// 1-based projection year
    pub year: u32,
    pub growth_rate: Rate,
    pub revenue: Money,
    pub gross_profit: Money,
    pub operating_expenses: Money,
    pub ebitda: Money,
    pub taxes: Money,
    pub capex: Money,
    pub free_cash_flow: Money,
    pub discount_factor: Rate,
    pub present_value: Money,
}

/// Output of the DCF valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// PV(explicit free cash flows) + PV(terminal value)
    pub enterprise_value: Money,
    /// Equal to enterprise value: the model carries no net debt
    pub equity_value: Money,
    /// Only present when the caller supplied a share count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_per_share: Option<Money>,
    /// Gordon growth terminal value at the end of the final projection year
    pub terminal_value: Money,
    pub pv_of_terminal_value: Money,
    pub pv_of_cash_flows: Money,
    /// PV of terminal value as a fraction of enterprise value
    pub terminal_value_pct: Rate,
    /// Ordered by year ascending; one entry per projection year
    pub projections: Vec<Projection>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Value a business by discounting its projected free cash flows.
///
/// Pure function of the model: no shared state, safe to call from many
/// threads at once. Intermediate values that leave the decimal range are
/// returned as `InvalidAssumption` errors.
pub fn value(model: &FinancialModel) -> BizValResult<ValuationResult> {
    model.validate()?;
    let a = &model.assumptions;

    let projections = discount_operations(project_operations(model)?, a.discount_rate)?;
    let pv_of_cash_flows = projections.iter().try_fold(Decimal::ZERO, |acc, p| {
        checked_add(acc, p.present_value, "pv_of_cash_flows")
    })?;

    let last = projections.last().ok_or_else(|| {
        BizValError::InsufficientData("No projection years generated".into())
    })?;

    let terminal_value =
        gordon_growth_value(last.free_cash_flow, a.discount_rate, a.terminal_growth_rate)?;
    let pv_of_terminal_value =
        checked_mul(terminal_value, last.discount_factor, "pv_of_terminal_value")?;

    let enterprise_value = checked_add(pv_of_cash_flows, pv_of_terminal_value, "enterprise_value")?;
    // Extension point: subtract net debt here once the model carries it
    let equity_value = enterprise_value;

    let value_per_share = match model.shares_outstanding {
        Some(shares) if shares > Decimal::ZERO => {
            Some(checked_div(equity_value, shares, "shares_outstanding")?)
        }
        _ => None,
    };

    let terminal_value_pct = if enterprise_value.is_zero() {
        Decimal::ZERO
    } else {
        checked_div(pv_of_terminal_value, enterprise_value, "terminal_value_pct")?
    };

    tracing::debug!(
        business = model.business.label(),
        years = a.projection_years,
        %enterprise_value,
        "valuation complete"
    );

    Ok(ValuationResult {
        enterprise_value,
        equity_value,
        value_per_share,
        terminal_value,
        pv_of_terminal_value,
        pv_of_cash_flows,
        terminal_value_pct,
        projections,
    })
}

/// Run [`value`] and wrap the result with methodology, warnings and timing.
pub fn calculate_valuation(
    model: &FinancialModel,
) -> BizValResult<ComputationOutput<ValuationResult>> {
    let start = Instant::now();
    let result = value(model)?;
    let warnings = valuation_warnings(&result, model.assumptions.tax_treatment);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "FCF DCF (end-of-year discounting, Gordon growth terminal value)",
        model,
        warnings,
        elapsed,
        result,
    ))
}

/// Diagnostics worth surfacing alongside a valuation.
pub fn valuation_warnings(result: &ValuationResult, tax_treatment: TaxTreatment) -> Vec<String> {
    let mut warnings = Vec::new();

    if result.terminal_value_pct > TERMINAL_CONCENTRATION_WARNING {
        warnings.push(format!(
            "Terminal value represents {:.1}% of enterprise value; consider extending the projection horizon",
            result.terminal_value_pct.saturating_mul(dec!(100))
        ));
    }

    let loss_years: Vec<String> = result
        .projections
        .iter()
        .filter(|p| p.ebitda < Decimal::ZERO)
        .map(|p| p.year.to_string())
        .collect();
    if !loss_years.is_empty() {
        let tax_note = match tax_treatment {
            TaxTreatment::Flat => "flat tax treatment credits tax on losses",
            TaxTreatment::PositiveEbitdaOnly => "no tax is charged in those years",
        };
        warnings.push(format!(
            "Negative EBITDA in year(s) {}; {}",
            loss_years.join(", "),
            tax_note
        ));
    }

    if let Some(last) = result.projections.last() {
        if last.free_cash_flow < Decimal::ZERO {
            warnings.push(
                "Final-year free cash flow is negative; terminal value is negative".to_string(),
            );
        }
    }

    warnings
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn discount_operations(
    years: Vec<OperatingYear>,
    discount_rate: Rate,
) -> BizValResult<Vec<Projection>> {
    years
        .into_iter()
        .map(|y| {
            let df = discount_factor(discount_rate, y.year)?;
            let pv = present_value(y.free_cash_flow, discount_rate, y.year)?;
            Ok(Projection {
                year: y.year,
                growth_rate: y.growth_rate,
                revenue: y.revenue,
                gross_profit: y.gross_profit,
                operating_expenses: y.operating_expenses,
                ebitda: y.ebitda,
                taxes: y.taxes,
                capex: y.capex,
                free_cash_flow: y.free_cash_flow,
                discount_factor: df,
                present_value: pv,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::financial_model::fixtures::{channel_model, subscription_model};
    use rust_decimal::MathematicalOps;

    #[test]
    fn test_basic_subscription_valuation() {
        let out = value(&subscription_model()).unwrap();

        assert_eq!(out.projections.len(), 5);
        assert_eq!(out.projections[0].revenue, dec!(1_200_000));
        assert!(out.enterprise_value > Decimal::ZERO);
        assert_eq!(out.equity_value, out.enterprise_value);
        assert!(out.value_per_share.is_none());
    }

    #[test]
    fn test_year_one_discounting() {
        let out = value(&subscription_model()).unwrap();
        let y1 = &out.projections[0];
        assert_eq!(y1.discount_factor, Decimal::ONE / dec!(1.12));
        assert_eq!(y1.present_value, dec!(276_000) * (Decimal::ONE / dec!(1.12)));
    }

    #[test]
    fn test_discount_factor_uses_year_index() {
        let out = value(&channel_model()).unwrap();
        for p in &out.projections {
            let expected = Decimal::ONE / dec!(1.10).powi(i64::from(p.year));
            assert_eq!(p.discount_factor, expected, "year {}", p.year);
        }
    }

    #[test]
    fn test_enterprise_value_composition() {
        let out = value(&channel_model()).unwrap();
        let pv_sum: Money = out.projections.iter().map(|p| p.present_value).sum();
        assert_eq!(out.pv_of_cash_flows, pv_sum);
        assert_eq!(out.enterprise_value, pv_sum + out.pv_of_terminal_value);
    }

    #[test]
    fn test_terminal_value_gordon_from_final_year() {
        let out = value(&channel_model()).unwrap();
        let last = out.projections.last().unwrap();
        // FCF_N * 1.02 / (0.10 - 0.02)
        let expected = last.free_cash_flow * dec!(1.02) / dec!(0.08);
        assert_eq!(out.terminal_value, expected);
        assert_eq!(out.pv_of_terminal_value, expected * last.discount_factor);
    }

    #[test]
    fn test_terminal_growth_at_discount_rate_rejected() {
        let mut m = subscription_model();
        m.assumptions.terminal_growth_rate = dec!(0.12);
        assert!(matches!(
            value(&m),
            Err(BizValError::InvalidAssumption { .. })
        ));
    }

    #[test]
    fn test_terminal_growth_above_discount_rate_rejected() {
        let mut m = subscription_model();
        m.assumptions.terminal_growth_rate = dec!(0.15);
        assert!(value(&m).is_err());
    }

    #[test]
    fn test_value_per_share_when_shares_supplied() {
        let mut m = subscription_model();
        m.shares_outstanding = Some(dec!(1_000_000));
        let out = value(&m).unwrap();
        assert_eq!(
            out.value_per_share,
            Some(out.equity_value / dec!(1_000_000))
        );
    }

    #[test]
    fn test_single_year_horizon() {
        let mut m = channel_model();
        m.assumptions.projection_years = 1;
        let out = value(&m).unwrap();
        assert_eq!(out.projections.len(), 1);
        let y1 = &out.projections[0];
        assert_eq!(out.pv_of_terminal_value, out.terminal_value * y1.discount_factor);
    }

    #[test]
    fn test_higher_discount_rate_lowers_value() {
        let base = value(&channel_model()).unwrap();
        let mut m = channel_model();
        m.assumptions.discount_rate = dec!(0.14);
        let higher = value(&m).unwrap();
        assert!(higher.enterprise_value < base.enterprise_value);
    }

    #[test]
    fn test_positive_only_tax_lowers_value_for_loss_making_business() {
        let mut flat = subscription_model();
        flat.operating.gross_margin_pct = dec!(0.40);
        let mut positive_only = flat.clone();
        positive_only.assumptions.tax_treatment = TaxTreatment::PositiveEbitdaOnly;

        let flat_out = value(&flat).unwrap();
        let positive_out = value(&positive_only).unwrap();
        // Flat tax credits losses, so it produces the smaller loss after tax
        assert!(flat_out.enterprise_value > positive_out.enterprise_value);
    }

    #[test]
    fn test_calculate_valuation_envelope() {
        let out = calculate_valuation(&subscription_model()).unwrap();
        assert_eq!(
            out.methodology,
            "FCF DCF (end-of-year discounting, Gordon growth terminal value)"
        );
        assert_eq!(out.assumptions["business"]["business_type"], "subscription");
    }

    #[test]
    fn test_loss_year_warning() {
        let mut m = subscription_model();
        m.operating.gross_margin_pct = dec!(0.40);
        let out = calculate_valuation(&m).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("Negative EBITDA")));
        assert!(out.warnings.iter().any(|w| w.contains("terminal value is negative")));
    }

    #[test]
    fn test_loss_year_warning_follows_tax_treatment() {
        let mut m = subscription_model();
        m.operating.gross_margin_pct = dec!(0.40);
        m.assumptions.tax_treatment = TaxTreatment::PositiveEbitdaOnly;
        let out = calculate_valuation(&m).unwrap();
        let loss = out
            .warnings
            .iter()
            .find(|w| w.contains("Negative EBITDA"))
            .expect("loss-year warning");
        assert!(loss.contains("no tax is charged"), "warning = {loss}");
        assert!(!loss.contains("credits tax"));
    }

    #[test]
    fn test_long_horizon_at_high_discount_rate() {
        let mut m = channel_model();
        m.assumptions.discount_rate = dec!(1.0);
        m.assumptions.projection_years = 100;
        let out = value(&m).unwrap();
        assert_eq!(out.projections.len(), 100);
        // The far years discount to nothing, the near years still count
        assert_eq!(out.projections[99].discount_factor, Decimal::ZERO);
        assert_eq!(out.pv_of_terminal_value, Decimal::ZERO);
        assert!(out.enterprise_value > Decimal::ZERO);
    }

    #[test]
    fn test_extreme_growth_returns_error() {
        let mut m = channel_model();
        m.assumptions.growth_year_1 = dec!(20.0);
        m.assumptions.growth_year_5 = dec!(20.0);
        m.assumptions.projection_years = 25;
        assert!(matches!(
            value(&m),
            Err(BizValError::InvalidAssumption { .. })
        ));
    }

    #[test]
    fn test_terminal_value_pct_bounds() {
        let out = value(&channel_model()).unwrap();
        assert!(out.terminal_value_pct > Decimal::ZERO);
        assert!(out.terminal_value_pct < Decimal::ONE);
    }
}
