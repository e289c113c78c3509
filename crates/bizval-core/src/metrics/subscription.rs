use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::model::SubscriptionEconomics;
use crate::projection::revenue::annual_retention;
use crate::types::{checked_mul, Count, Money, Rate};
use crate::BizValResult;

use super::guarded_divide;

/// Recurring-revenue and unit-economics figures for a subscription business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionMetrics {
    pub mrr: Money,
    pub arr: Money,
    /// ARPU / monthly churn; `None` when churn is zero
    pub ltv: Option<Money>,
    /// LTV / CAC; `None` when either side is undefined or CAC is zero
    pub ltv_cac_ratio: Option<Decimal>,
    /// CAC / ARPU; `None` when ARPU is zero
    pub payback_period_months: Option<Decimal>,
    pub monthly_churned_customers: Count,
    /// Share of today's customers still active after twelve months
    pub annual_retention_rate: Rate,
}

pub fn summarize_subscription(s: &SubscriptionEconomics) -> BizValResult<SubscriptionMetrics> {
    let mrr = checked_mul(s.customers, s.average_revenue_per_user, "mrr")?;
    let ltv = guarded_divide(s.average_revenue_per_user, s.monthly_churn_rate);
    let ltv_cac_ratio = ltv.and_then(|ltv| guarded_divide(ltv, s.customer_acquisition_cost));

    Ok(SubscriptionMetrics {
        mrr,
        arr: checked_mul(mrr, dec!(12), "arr")?,
        ltv,
        ltv_cac_ratio,
        payback_period_months: guarded_divide(
            s.customer_acquisition_cost,
            s.average_revenue_per_user,
        ),
        monthly_churned_customers: checked_mul(s.customers, s.monthly_churn_rate, "customers")?,
        annual_retention_rate: annual_retention(s.monthly_churn_rate),
    })
}
