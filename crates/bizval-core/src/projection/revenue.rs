use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::BizValError;
use crate::model::{BusinessModel, ChannelEconomics, FinancialModel, SubscriptionEconomics};
use crate::types::{checked_add, checked_mul, Money, Rate};
use crate::BizValResult;

use super::growth::GrowthCurve;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Year-1 (base) revenue for the business model.
pub fn base_revenue(business: &BusinessModel) -> BizValResult<Money> {
    match business {
        BusinessModel::Subscription(s) => subscription_base_revenue(s),
        BusinessModel::Channel(c) => channel_base_revenue(c),
    }
}

fn subscription_base_revenue(s: &SubscriptionEconomics) -> BizValResult<Money> {
    let monthly = checked_mul(s.customers, s.average_revenue_per_user, "revenue")?;
    checked_mul(monthly, MONTHS_PER_YEAR, "revenue")
}

fn channel_base_revenue(c: &ChannelEconomics) -> BizValResult<Money> {
    let wholesale = checked_mul(c.wholesale_units_per_month, c.wholesale_price_per_unit, "revenue")?;
    let retail = checked_mul(c.retail_units_per_month, c.retail_price_per_unit, "revenue")?;
    checked_mul(checked_add(wholesale, retail, "revenue")?, MONTHS_PER_YEAR, "revenue")
}

/// Fraction of the existing base retained over a year of monthly churn.
pub fn annual_retention(monthly_churn_rate: Rate) -> Rate {
    (Decimal::ONE - monthly_churn_rate).powi(12)
}

/// Multiplier carrying revenue from year `n - 1` into year `n`.
///
/// New-business growth and existing-base attrition compound separately: the
/// subscription factor is `(1 + g(n)) * (1 - churn)^12`, never a merged rate.
fn year_over_year_factor(
    business: &BusinessModel,
    curve: &GrowthCurve,
    year: u32,
) -> BizValResult<Rate> {
    let growth = checked_add(Decimal::ONE, curve.rate_for_year(year), "growth_rate")?;
    match business {
        BusinessModel::Subscription(s) => {
            checked_mul(growth, annual_retention(s.monthly_churn_rate), "growth_rate")
        }
        BusinessModel::Channel(_) => Ok(growth),
    }
}

/// Revenue for years `1..=years`, ordered by year.
///
/// Compounding that leaves the decimal range is an `InvalidAssumption`
/// error naming the year, never a silent clamp.
pub fn project_revenue(model: &FinancialModel, years: u32) -> BizValResult<Vec<Money>> {
    let curve = GrowthCurve::from_assumptions(&model.assumptions);
    let mut schedule = Vec::with_capacity(years as usize);
    let mut revenue = base_revenue(&model.business)?;

    for year in 1..=years {
        if year > 1 {
            let factor = year_over_year_factor(&model.business, &curve, year)?;
            revenue = revenue.checked_mul(factor).ok_or_else(|| {
                BizValError::invalid_assumption(
                    "growth_rate",
                    format!("Projected revenue for year {year} exceeds the decimal range"),
                )
            })?;
        }
        schedule.push(revenue);
    }
    Ok(schedule)
}

/// Revenue for a single 1-based projection year.
pub fn revenue_for_year(model: &FinancialModel, year: u32) -> BizValResult<Money> {
    if year == 0 {
        return Err(BizValError::invalid_assumption(
            "year",
            "Projection years are 1-based",
        ));
    }
    project_revenue(model, year)?
        .pop()
        .ok_or_else(|| BizValError::InsufficientData(format!("No revenue projected for year {year}")))
}
