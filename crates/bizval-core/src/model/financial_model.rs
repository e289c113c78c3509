use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BizValError;
use crate::types::{Count, Money, Rate};
use crate::BizValResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Unit economics of a subscription (SaaS) business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionEconomics {
    /// Paying customers at the start of the projection
    pub customers: Count,
    /// Fraction of the customer base lost each month
    pub monthly_churn_rate: Rate,
    /// Cost to acquire one customer
    pub customer_acquisition_cost: Money,
    /// Monthly revenue per customer (ARPU)
    pub average_revenue_per_user: Money,
}

/// Unit economics of a channel (consumer packaged goods) business selling
/// through wholesale and retail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelEconomics {
    pub cost_of_goods_per_unit: Money,
    pub wholesale_units_per_month: Count,
    pub wholesale_price_per_unit: Money,
    pub retail_units_per_month: Count,
    pub retail_price_per_unit: Money,
    pub inventory_turnover_per_year: Decimal,
    /// Distribution cost as a fraction of revenue
    pub distribution_cost_pct: Rate,
}

/// Business-model variant. Selects how revenue is built and which unit
/// economics are summarised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "business_type", rename_all = "snake_case")]
pub enum BusinessModel {
    Subscription(SubscriptionEconomics),
    Channel(ChannelEconomics),
}

impl BusinessModel {
    pub fn label(&self) -> &'static str {
        match self {
            BusinessModel::Subscription(_) => "subscription",
            BusinessModel::Channel(_) => "channel",
        }
    }
}

/// Operating ratios shared by both business models, as fractions of revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingRatios {
    pub gross_margin_pct: Rate,
    pub marketing_spend_pct: Rate,
    pub rd_spend_pct: Rate,
    pub ga_spend_pct: Rate,
}

/// How tax is applied to EBITDA when deriving free cash flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxTreatment {
    /// `EBITDA * (1 - t)` in every year, including loss years.
    #[default]
    Flat,
    /// No tax in years with negative EBITDA.
    PositiveEbitdaOnly,
}

/// Growth and discounting assumptions driving the projection and the DCF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfAssumptions {
    /// Revenue growth anchor for year 1
    pub growth_year_1: Rate,
    /// Revenue growth anchor for year 5 and beyond
    pub growth_year_5: Rate,
    /// Discount rate (WACC)
    pub discount_rate: Rate,
    /// Perpetuity growth after the explicit horizon
    pub terminal_growth_rate: Rate,
    /// Explicit forecast horizon in years
    pub projection_years: u32,
    pub tax_rate: Rate,
    /// Capital expenditure as a fraction of revenue
    pub capex_rate_pct: Rate,
    #[serde(default)]
    pub tax_treatment: TaxTreatment,
}

/// The single input aggregate of the engine. Rates are fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialModel {
    pub business: BusinessModel,
    pub operating: OperatingRatios,
    pub assumptions: DcfAssumptions,
    /// Diluted share count for per-share value; supplied by the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares_outstanding: Option<Count>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl FinancialModel {
    /// Check every invariant the projection chain relies on.
    pub fn validate(&self) -> BizValResult<()> {
        validate_business(&self.business)?;
        validate_operating(&self.operating)?;
        validate_assumptions(&self.assumptions)?;

        if let Some(shares) = self.shares_outstanding {
            if shares <= Decimal::ZERO {
                return Err(BizValError::invalid_assumption(
                    "shares_outstanding",
                    "Share count must be positive when supplied",
                ));
            }
        }
        Ok(())
    }
}

fn validate_business(business: &BusinessModel) -> BizValResult<()> {
    match business {
        BusinessModel::Subscription(s) => {
            non_negative("customers", s.customers)?;
            unit_interval("monthly_churn_rate", s.monthly_churn_rate)?;
            non_negative("customer_acquisition_cost", s.customer_acquisition_cost)?;
            non_negative("average_revenue_per_user", s.average_revenue_per_user)?;
        }
        BusinessModel::Channel(c) => {
            non_negative("cost_of_goods_per_unit", c.cost_of_goods_per_unit)?;
            non_negative("wholesale_units_per_month", c.wholesale_units_per_month)?;
            non_negative("wholesale_price_per_unit", c.wholesale_price_per_unit)?;
            non_negative("retail_units_per_month", c.retail_units_per_month)?;
            non_negative("retail_price_per_unit", c.retail_price_per_unit)?;
            non_negative("inventory_turnover_per_year", c.inventory_turnover_per_year)?;
            unit_interval("distribution_cost_pct", c.distribution_cost_pct)?;
        }
    }
    Ok(())
}

fn validate_operating(ops: &OperatingRatios) -> BizValResult<()> {
    unit_interval("gross_margin_pct", ops.gross_margin_pct)?;
    unit_interval("marketing_spend_pct", ops.marketing_spend_pct)?;
    unit_interval("rd_spend_pct", ops.rd_spend_pct)?;
    unit_interval("ga_spend_pct", ops.ga_spend_pct)
}

fn validate_assumptions(a: &DcfAssumptions) -> BizValResult<()> {
    if a.projection_years < 1 {
        return Err(BizValError::invalid_assumption(
            "projection_years",
            "At least one projection year is required",
        ));
    }
    if a.discount_rate <= Decimal::ZERO {
        return Err(BizValError::invalid_assumption(
            "discount_rate",
            "Discount rate must be positive",
        ));
    }
    if a.terminal_growth_rate >= a.discount_rate {
        return Err(BizValError::invalid_assumption(
            "terminal_growth_rate",
            format!(
                "Terminal growth rate ({}) must be less than the discount rate ({})",
                a.terminal_growth_rate, a.discount_rate
            ),
        ));
    }
    for (field, g) in [("growth_year_1", a.growth_year_1), ("growth_year_5", a.growth_year_5)] {
        if g < dec!(-1) {
            return Err(BizValError::invalid_assumption(
                field,
                "Growth rate cannot be below -100%",
            ));
        }
    }
    unit_interval("tax_rate", a.tax_rate)?;
    non_negative("capex_rate_pct", a.capex_rate_pct)
}

fn unit_interval(field: &str, value: Rate) -> BizValResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(BizValError::invalid_assumption(
            field,
            format!("Must be between 0 and 1, got {value}"),
        ));
    }
    Ok(())
}

fn non_negative(field: &str, value: Decimal) -> BizValResult<()> {
    if value < Decimal::ZERO {
        return Err(BizValError::invalid_assumption(
            field,
            format!("Must not be negative, got {value}"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_reference_models_are_valid() {
        assert!(subscription_model().validate().is_ok());
        assert!(channel_model().validate().is_ok());
    }

    #[test]
    fn test_terminal_growth_equal_to_discount_rate_rejected() {
        let mut m = subscription_model();
        m.assumptions.terminal_growth_rate = m.assumptions.discount_rate;
        let err = m.validate().unwrap_err();
        assert!(matches!(
            err,
            BizValError::InvalidAssumption { ref field, .. } if field == "terminal_growth_rate"
        ));
    }

    #[test]
    fn test_zero_projection_years_rejected() {
        let mut m = channel_model();
        m.assumptions.projection_years = 0;
        assert!(matches!(
            m.validate(),
            Err(BizValError::InvalidAssumption { .. })
        ));
    }

    #[test]
    fn test_churn_above_one_rejected() {
        let mut m = subscription_model();
        if let BusinessModel::Subscription(ref mut s) = m.business {
            s.monthly_churn_rate = dec!(1.5);
        }
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_negative_growth_allowed_down_to_minus_100_pct() {
        let mut m = channel_model();
        m.assumptions.growth_year_1 = dec!(-0.30);
        m.assumptions.growth_year_5 = dec!(-1);
        assert!(m.validate().is_ok());

        m.assumptions.growth_year_5 = dec!(-1.01);
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_non_positive_share_count_rejected() {
        let mut m = subscription_model();
        m.shares_outstanding = Some(Decimal::ZERO);
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_zero_channel_units_is_valid() {
        let mut m = channel_model();
        if let BusinessModel::Channel(ref mut c) = m.business {
            c.wholesale_units_per_month = Decimal::ZERO;
            c.retail_units_per_month = Decimal::ZERO;
        }
        assert!(m.validate().is_ok());
    }

    #[test]
    fn test_business_model_serde_tag() {
        let m = subscription_model();
        let json = serde_json::to_value(&m.business).unwrap();
        assert_eq!(json["business_type"], "subscription");
        let back: BusinessModel = serde_json::from_value(json).unwrap();
        assert_eq!(back, m.business);
    }
}
