use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::BizValError;
use crate::types::{checked_add, checked_div, checked_mul, checked_sub, Money, Rate};
use crate::BizValResult;

/// End-of-period discount factor `1 / (1 + rate)^periods`.
///
/// When the compounded growth leaves the decimal range the factor is below
/// the smallest representable step and is reported as zero.
pub fn discount_factor(rate: Rate, periods: u32) -> BizValResult<Rate> {
    if rate <= dec!(-1) {
        return Err(BizValError::invalid_assumption(
            "discount_rate",
            "Discount rate must be greater than -100%",
        ));
    }
    let compound = match Decimal::ONE
        .checked_add(rate)
        .and_then(|base| base.checked_powi(i64::from(periods)))
    {
        Some(c) => c,
        None => return Ok(Decimal::ZERO),
    };
    if compound.is_zero() {
        return Err(BizValError::invalid_assumption(
            "discount_rate",
            format!("Discount factor underflows at period {periods}"),
        ));
    }
    Ok(Decimal::ONE / compound)
}

/// Present value of a single amount received at the end of `periods`.
pub fn present_value(amount: Money, rate: Rate, periods: u32) -> BizValResult<Money> {
    checked_mul(amount, discount_factor(rate, periods)?, "present_value")
}

/// Gordon growth perpetuity: `cash_flow * (1 + g) / (r - g)`.
///
/// The value sits at the end of the period in which `cash_flow` falls; callers
/// discount it from there.
pub fn gordon_growth_value(cash_flow: Money, discount_rate: Rate, growth: Rate) -> BizValResult<Money> {
    let spread = checked_sub(discount_rate, growth, "terminal_growth_rate")?;
    if spread <= Decimal::ZERO {
        return Err(BizValError::invalid_assumption(
            "terminal_growth_rate",
            format!(
                "Terminal growth rate ({growth}) must be less than the discount rate ({discount_rate}) for the Gordon growth model"
            ),
        ));
    }
    let grown = checked_mul(
        cash_flow,
        checked_add(Decimal::ONE, growth, "terminal_growth_rate")?,
        "terminal_value",
    )?;
    checked_div(grown, spread, "terminal_value")
}
