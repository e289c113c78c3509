use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{DcfAssumptions, TaxTreatment};
use crate::types::{checked_mul, checked_sub, Money};
use crate::BizValResult;

/// Cash-flow lines below EBITDA for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowLines {
    /// Tax charge; negative under a flat rate in a loss year
    pub taxes: Money,
    pub capex: Money,
    pub free_cash_flow: Money,
}

/// `FCF = EBITDA * (1 - t) - revenue * capex_rate`.
///
/// Under [`TaxTreatment::Flat`] the tax multiplier is applied whatever the
/// sign of EBITDA, so a loss year carries a tax credit.
pub fn project_cash_flow(
    revenue: Money,
    ebitda: Money,
    assumptions: &DcfAssumptions,
) -> BizValResult<CashFlowLines> {
    let taxable = match assumptions.tax_treatment {
        TaxTreatment::Flat => ebitda,
        TaxTreatment::PositiveEbitdaOnly => ebitda.max(Decimal::ZERO),
    };
    let taxes = checked_mul(taxable, assumptions.tax_rate, "taxes")?;
    let capex = checked_mul(revenue, assumptions.capex_rate_pct, "capex")?;
    let after_tax = checked_sub(ebitda, taxes, "free_cash_flow")?;

    Ok(CashFlowLines {
        taxes,
        capex,
        free_cash_flow: checked_sub(after_tax, capex, "free_cash_flow")?,
    })
}
