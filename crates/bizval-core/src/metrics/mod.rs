//! Unit-economics summaries computed straight from the model, independent of
//! the projection chain and the DCF.

pub mod channel;
pub mod subscription;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::model::{BusinessModel, FinancialModel};
use crate::types::{with_metadata, ComputationOutput};
use crate::BizValResult;

pub use channel::{summarize_channel, ChannelMetrics, ChannelMix};
pub use subscription::{summarize_subscription, SubscriptionMetrics};

/// Division that yields `None` on a zero denominator or an out-of-range
/// quotient, so one undefined metric never blocks the rest of a summary.
pub(crate) fn guarded_divide(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    numerator.checked_div(denominator)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "business_type", rename_all = "snake_case")]
pub enum MetricsSummary {
    Subscription(SubscriptionMetrics),
    Channel(ChannelMetrics),
}

pub fn summarize(business: &BusinessModel) -> BizValResult<MetricsSummary> {
    Ok(match business {
        BusinessModel::Subscription(s) => MetricsSummary::Subscription(summarize_subscription(s)?),
        BusinessModel::Channel(c) => MetricsSummary::Channel(summarize_channel(c)?),
    })
}

/// Validate the model, summarise its unit economics and note every metric
/// left undefined by a zero denominator.
pub fn calculate_metrics(model: &FinancialModel) -> BizValResult<ComputationOutput<MetricsSummary>> {
    let start = Instant::now();
    model.validate()?;

    let summary = summarize(&model.business)?;
    let mut warnings = Vec::new();
    match &summary {
        MetricsSummary::Subscription(m) => {
            if m.ltv.is_none() {
                warnings.push("LTV undefined: monthly churn rate is zero or too small".to_string());
            }
            if m.ltv_cac_ratio.is_none() {
                warnings.push("LTV/CAC undefined: LTV undefined or CAC is zero".to_string());
            }
            if m.payback_period_months.is_none() {
                warnings.push("Payback period undefined: ARPU is zero".to_string());
            }
        }
        MetricsSummary::Channel(m) => {
            if m.monthly_revenue.is_zero() {
                warnings.push("No channel revenue: channel mix reported as zero".to_string());
            }
            if m.average_inventory_value.is_none() {
                warnings.push("Average inventory undefined: inventory turnover is zero".to_string());
            }
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Unit Economics Summary",
        &model.business,
        warnings,
        elapsed,
        summary,
    ))
}
