#![allow(dead_code)]

use bizval_core::model::{
    BusinessModel, ChannelEconomics, DcfAssumptions, FinancialModel, OperatingRatios,
    SubscriptionEconomics, TaxTreatment,
};
use rust_decimal_macros::dec;

/// customers=1000, churn=3%/month, CAC=500, ARPU=100, growth 40% -> 15%,
/// margin 80%, WACC 12%, terminal growth 2.5%, 5 years, tax 20%, capex 5%,
/// marketing 20%, R&D 15%, G&A 10%.
pub fn saas_model() -> FinancialModel {
    FinancialModel {
        business: BusinessModel::Subscription(SubscriptionEconomics {
            customers: dec!(1000),
            monthly_churn_rate: dec!(0.03),
            customer_acquisition_cost: dec!(500),
            average_revenue_per_user: dec!(100),
        }),
        operating: OperatingRatios {
            gross_margin_pct: dec!(0.80),
            marketing_spend_pct: dec!(0.20),
            rd_spend_pct: dec!(0.15),
            ga_spend_pct: dec!(0.10),
        },
        assumptions: DcfAssumptions {
            growth_year_1: dec!(0.40),
            growth_year_5: dec!(0.15),
            discount_rate: dec!(0.12),
            terminal_growth_rate: dec!(0.025),
            projection_years: 5,
            tax_rate: dec!(0.20),
            capex_rate_pct: dec!(0.05),
            tax_treatment: TaxTreatment::Flat,
        },
        shares_outstanding: None,
    }
}

/// 5,000 wholesale units at 15 and 2,000 retail units at 25 per month.
pub fn cpg_model() -> FinancialModel {
    FinancialModel {
        business: BusinessModel::Channel(ChannelEconomics {
            cost_of_goods_per_unit: dec!(6),
            wholesale_units_per_month: dec!(5000),
            wholesale_price_per_unit: dec!(15),
            retail_units_per_month: dec!(2000),
            retail_price_per_unit: dec!(25),
            inventory_turnover_per_year: dec!(6),
            distribution_cost_pct: dec!(0.08),
        }),
        operating: OperatingRatios {
            gross_margin_pct: dec!(0.55),
            marketing_spend_pct: dec!(0.12),
            rd_spend_pct: dec!(0.03),
            ga_spend_pct: dec!(0.08),
        },
        assumptions: DcfAssumptions {
            growth_year_1: dec!(0.25),
            growth_year_5: dec!(0.05),
            discount_rate: dec!(0.10),
            terminal_growth_rate: dec!(0.02),
            projection_years: 5,
            tax_rate: dec!(0.25),
            capex_rate_pct: dec!(0.04),
            tax_treatment: TaxTreatment::Flat,
        },
        shares_outstanding: None,
    }
}
