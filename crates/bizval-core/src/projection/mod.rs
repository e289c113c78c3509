//! Operating projection: growth curve -> revenue -> income -> free cash flow.

pub mod cash_flow;
pub mod growth;
pub mod income;
pub mod revenue;

use serde::{Deserialize, Serialize};

use crate::model::FinancialModel;
use crate::types::{Money, Rate};
use crate::BizValResult;

pub use growth::{rate_for_year, GrowthCurve};

/// One projected year of operations, before discounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingYear {
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
}

/// Run the operating chain for every year of the model's horizon.
pub fn project_operations(model: &FinancialModel) -> BizValResult<Vec<OperatingYear>> {
    let years = model.assumptions.projection_years;
    let curve = GrowthCurve::from_assumptions(&model.assumptions);

    revenue::project_revenue(model, years)?
        .into_iter()
        .zip(1..=years)
        .map(|(revenue, year)| {
            let income = income::project_income(revenue, &model.operating)?;
            let cash = cash_flow::project_cash_flow(revenue, income.ebitda, &model.assumptions)?;
            Ok(OperatingYear {
                year,
                growth_rate: curve.rate_for_year(year),
                revenue,
                gross_profit: income.gross_profit,
                operating_expenses: income.operating_expenses,
                ebitda: income.ebitda,
                taxes: cash.taxes,
                capex: cash.capex,
                free_cash_flow: cash.free_cash_flow,
            })
        })
        .collect()
}
