use serde::{Deserialize, Serialize};

use crate::model::OperatingRatios;
use crate::types::{checked_add, checked_mul, checked_sub, Money};
use crate::BizValResult;

/// Income-statement lines down to EBITDA for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeLines {
    pub gross_profit: Money,
    pub marketing: Money,
    pub research_and_development: Money,
    pub general_and_administrative: Money,
    pub operating_expenses: Money,
    /// May be negative for an unprofitable year
    pub ebitda: Money,
}

/// Derive gross profit, operating expenses and EBITDA from revenue.
pub fn project_income(revenue: Money, ratios: &OperatingRatios) -> BizValResult<IncomeLines> {
    let gross_profit = checked_mul(revenue, ratios.gross_margin_pct, "gross_profit")?;
    let marketing = checked_mul(revenue, ratios.marketing_spend_pct, "operating_expenses")?;
    let research_and_development = checked_mul(revenue, ratios.rd_spend_pct, "operating_expenses")?;
    let general_and_administrative = checked_mul(revenue, ratios.ga_spend_pct, "operating_expenses")?;
    let operating_expenses = checked_add(
        checked_add(marketing, research_and_development, "operating_expenses")?,
        general_and_administrative,
        "operating_expenses",
    )?;

    Ok(IncomeLines {
        gross_profit,
        marketing,
        research_and_development,
        general_and_administrative,
        operating_expenses,
        ebitda: checked_sub(gross_profit, operating_expenses, "ebitda")?,
    })
}
