use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::model::ChannelEconomics;
use crate::types::{checked_add, checked_mul, checked_sub, Count, Money, Rate};
use crate::BizValResult;

use super::guarded_divide;

/// Revenue split between the wholesale and retail channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMix {
    pub wholesale: Rate,
    pub retail: Rate,
}

/// Monthly and annual channel economics for a unit-sold business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMetrics {
    pub wholesale_revenue: Money,
    pub retail_revenue: Money,
    pub monthly_revenue: Money,
    pub annual_revenue: Money,
    /// Both shares are zero when there is no revenue
    pub channel_mix: ChannelMix,
    pub monthly_units: Count,
    pub monthly_cost_of_goods: Money,
    pub monthly_distribution_cost: Money,
    /// Revenue less cost of goods and distribution
    pub monthly_contribution: Money,
    /// Annual cost of goods / inventory turns; `None` when turnover is zero
    pub average_inventory_value: Option<Money>,
}

pub fn summarize_channel(c: &ChannelEconomics) -> BizValResult<ChannelMetrics> {
    let wholesale_revenue = checked_mul(
        c.wholesale_units_per_month,
        c.wholesale_price_per_unit,
        "wholesale_revenue",
    )?;
    let retail_revenue =
        checked_mul(c.retail_units_per_month, c.retail_price_per_unit, "retail_revenue")?;
    let monthly_revenue = checked_add(wholesale_revenue, retail_revenue, "monthly_revenue")?;

    let channel_mix = ChannelMix {
        wholesale: guarded_divide(wholesale_revenue, monthly_revenue).unwrap_or(Decimal::ZERO),
        retail: guarded_divide(retail_revenue, monthly_revenue).unwrap_or(Decimal::ZERO),
    };

    let monthly_units =
        checked_add(c.wholesale_units_per_month, c.retail_units_per_month, "monthly_units")?;
    let monthly_cost_of_goods =
        checked_mul(monthly_units, c.cost_of_goods_per_unit, "cost_of_goods")?;
    let monthly_distribution_cost =
        checked_mul(monthly_revenue, c.distribution_cost_pct, "distribution_cost")?;
    let monthly_contribution = checked_sub(
        checked_sub(monthly_revenue, monthly_cost_of_goods, "contribution")?,
        monthly_distribution_cost,
        "contribution",
    )?;

    Ok(ChannelMetrics {
        wholesale_revenue,
        retail_revenue,
        monthly_revenue,
        annual_revenue: checked_mul(monthly_revenue, dec!(12), "annual_revenue")?,
        channel_mix,
        monthly_units,
        monthly_cost_of_goods,
        monthly_distribution_cost,
        monthly_contribution,
        average_inventory_value: guarded_divide(
            checked_mul(monthly_cost_of_goods, dec!(12), "cost_of_goods")?,
            c.inventory_turnover_per_year,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn economics() -> ChannelEconomics {
        ChannelEconomics {
            cost_of_goods_per_unit: dec!(6),
            wholesale_units_per_month: dec!(5000),
            wholesale_price_per_unit: dec!(15),
            retail_units_per_month: dec!(2000),
            retail_price_per_unit: dec!(25),
            inventory_turnover_per_year: dec!(6),
            distribution_cost_pct: dec!(0.08),
        }
    }

    #[test]
    fn test_revenue_and_mix() {
        let m = summarize_channel(&economics()).unwrap();
        assert_eq!(m.wholesale_revenue, dec!(75_000));
        assert_eq!(m.retail_revenue, dec!(50_000));
        assert_eq!(m.monthly_revenue, dec!(125_000));
        assert_eq!(m.annual_revenue, dec!(1_500_000));
        assert_eq!(m.channel_mix.wholesale, dec!(0.6));
        assert_eq!(m.channel_mix.retail, dec!(0.4));
    }

    #[test]
    fn test_cost_lines() {
        let m = summarize_channel(&economics()).unwrap();
        assert_eq!(m.monthly_units, dec!(7000));
        assert_eq!(m.monthly_cost_of_goods, dec!(42_000));
        assert_eq!(m.monthly_distribution_cost, dec!(10_000));
        assert_eq!(m.monthly_contribution, dec!(73_000));
        // 42k * 12 / 6 turns
        assert_eq!(m.average_inventory_value, Some(dec!(84_000)));
    }

    #[test]
    fn test_no_revenue_mix_is_zero_not_nan() {
        let mut e = economics();
        e.wholesale_units_per_month = Decimal::ZERO;
        e.retail_units_per_month = Decimal::ZERO;
        let m = summarize_channel(&e).unwrap();
        assert_eq!(m.monthly_revenue, Decimal::ZERO);
        assert_eq!(m.channel_mix.wholesale, Decimal::ZERO);
        assert_eq!(m.channel_mix.retail, Decimal::ZERO);
    }

    #[test]
    fn test_zero_turnover_leaves_inventory_undefined() {
        let mut e = economics();
        e.inventory_turnover_per_year = Decimal::ZERO;
        assert_eq!(summarize_channel(&e).unwrap().average_inventory_value, None);
    }

    #[test]
    fn test_retail_only() {
        let mut e = economics();
        e.wholesale_units_per_month = Decimal::ZERO;
        let m = summarize_channel(&e).unwrap();
        assert_eq!(m.channel_mix.wholesale, Decimal::ZERO);
        assert_eq!(m.channel_mix.retail, Decimal::ONE);
    }

    #[test]
    fn test_revenue_overflow_is_an_error() {
        let mut e = economics();
        e.retail_price_per_unit = Decimal::MAX;
        match summarize_channel(&e) {
            Err(crate::error::BizValError::InvalidAssumption { field, .. }) => {
                assert_eq!(field, "retail_revenue")
            }
            other => panic!("expected overflow error, got {other:?}"),
        }
    }
}
