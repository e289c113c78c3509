//! Platform-facing shape of the financial model.
//!
//! The document platform stores a model as one flat row: every field is
//! optional, the business type is a free-form tag (`saas` / `cpg`), and all
//! percentage-typed fields are on a 0-100 scale. Conversion into
//! [`FinancialModel`] is the single place where percentages are normalised
//! to fractions and where missing or unknown configuration is rejected.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BizValError;
use crate::types::Rate;
use crate::BizValResult;

use super::financial_model::{
    BusinessModel, ChannelEconomics, DcfAssumptions, FinancialModel, OperatingRatios,
    SubscriptionEconomics, TaxTreatment,
};

const PERCENT: Decimal = dec!(100);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialModelRecord {
    pub business_type: Option<String>,

    // Subscription
    pub customers: Option<Decimal>,
    pub monthly_churn_rate: Option<Decimal>,
    pub customer_acquisition_cost: Option<Decimal>,
    pub average_revenue_per_user: Option<Decimal>,

    // Channel
    pub cost_of_goods_per_unit: Option<Decimal>,
    pub wholesale_units_per_month: Option<Decimal>,
    pub wholesale_price_per_unit: Option<Decimal>,
    pub retail_units_per_month: Option<Decimal>,
    pub retail_price_per_unit: Option<Decimal>,
    pub inventory_turnover_per_year: Option<Decimal>,
    pub distribution_cost_pct: Option<Decimal>,

    // Operating ratios
    pub marketing_spend_pct: Option<Decimal>,
    pub rd_spend_pct: Option<Decimal>,
    pub ga_spend_pct: Option<Decimal>,
    pub gross_margin_pct: Option<Decimal>,

    // Growth / DCF
    pub growth_year1: Option<Decimal>,
    pub growth_year5: Option<Decimal>,
    pub discount_rate: Option<Decimal>,
    pub terminal_growth_rate: Option<Decimal>,
    pub projection_years: Option<u32>,
    pub tax_rate: Option<Decimal>,
    pub capex_rate_pct: Option<Decimal>,

    pub shares_outstanding: Option<Decimal>,
}

/// Recognised business-type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BusinessKind {
    Subscription,
    Channel,
}

fn parse_business_type(tag: Option<&str>) -> BizValResult<BusinessKind> {
    let tag = tag.ok_or_else(|| BizValError::configuration("businessType", "Missing"))?;
    match tag.trim().to_ascii_lowercase().as_str() {
        "saas" | "subscription" => Ok(BusinessKind::Subscription),
        "cpg" | "channel" => Ok(BusinessKind::Channel),
        other => Err(BizValError::configuration(
            "businessType",
            format!("Unrecognized business type '{other}' (expected saas or cpg)"),
        )),
    }
}

fn required(field: &str, value: Option<Decimal>, kind: &str) -> BizValResult<Decimal> {
    value.ok_or_else(|| {
        BizValError::configuration(field, format!("Required for the {kind} business type"))
    })
}

fn required_pct(field: &str, value: Option<Decimal>, kind: &str) -> BizValResult<Rate> {
    Ok(required(field, value, kind)? / PERCENT)
}

impl TryFrom<FinancialModelRecord> for FinancialModel {
    type Error = BizValError;

    fn try_from(r: FinancialModelRecord) -> BizValResult<Self> {
        let kind = parse_business_type(r.business_type.as_deref())?;
        let label = match kind {
            BusinessKind::Subscription => "saas",
            BusinessKind::Channel => "cpg",
        };

        let business = match kind {
            BusinessKind::Subscription => BusinessModel::Subscription(SubscriptionEconomics {
                customers: required("customers", r.customers, label)?,
                monthly_churn_rate: required_pct("monthlyChurnRate", r.monthly_churn_rate, label)?,
                customer_acquisition_cost: required(
                    "customerAcquisitionCost",
                    r.customer_acquisition_cost,
                    label,
                )?,
                average_revenue_per_user: required(
                    "averageRevenuePerUser",
                    r.average_revenue_per_user,
                    label,
                )?,
            }),
            BusinessKind::Channel => BusinessModel::Channel(ChannelEconomics {
                cost_of_goods_per_unit: required("costOfGoodsPerUnit", r.cost_of_goods_per_unit, label)?,
                wholesale_units_per_month: required(
                    "wholesaleUnitsPerMonth",
                    r.wholesale_units_per_month,
                    label,
                )?,
                wholesale_price_per_unit: required(
                    "wholesalePricePerUnit",
                    r.wholesale_price_per_unit,
                    label,
                )?,
                retail_units_per_month: required("retailUnitsPerMonth", r.retail_units_per_month, label)?,
                retail_price_per_unit: required("retailPricePerUnit", r.retail_price_per_unit, label)?,
                inventory_turnover_per_year: required(
                    "inventoryTurnoverPerYear",
                    r.inventory_turnover_per_year,
                    label,
                )?,
                distribution_cost_pct: required_pct(
                    "distributionCostPct",
                    r.distribution_cost_pct,
                    label,
                )?,
            }),
        };

        let operating = OperatingRatios {
            gross_margin_pct: required_pct("grossMarginPct", r.gross_margin_pct, label)?,
            marketing_spend_pct: required_pct("marketingSpendPct", r.marketing_spend_pct, label)?,
            rd_spend_pct: required_pct("rdSpendPct", r.rd_spend_pct, label)?,
            ga_spend_pct: required_pct("gaSpendPct", r.ga_spend_pct, label)?,
        };

        let assumptions = DcfAssumptions {
            growth_year_1: required_pct("growthYear1", r.growth_year1, label)?,
            growth_year_5: required_pct("growthYear5", r.growth_year5, label)?,
            discount_rate: required_pct("discountRate", r.discount_rate, label)?,
            terminal_growth_rate: required_pct("terminalGrowthRate", r.terminal_growth_rate, label)?,
            projection_years: r.projection_years.ok_or_else(|| {
                BizValError::configuration(
                    "projectionYears",
                    format!("Required for the {label} business type"),
                )
            })?,
            tax_rate: required_pct("taxRate", r.tax_rate, label)?,
            capex_rate_pct: required_pct("capexRatePct", r.capex_rate_pct, label)?,
            tax_treatment: TaxTreatment::Flat,
        };

        let model = FinancialModel {
            business,
            operating,
            assumptions,
            shares_outstanding: r.shares_outstanding,
        };
        model.validate()?;
        Ok(model)
    }
}

/// Bear/bull overrides as the platform sends them (percent scale, camelCase).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioAdjustmentsRecord {
    pub growth_year1: Option<Decimal>,
    pub growth_year5: Option<Decimal>,
    pub discount_rate: Option<Decimal>,
    pub terminal_growth_rate: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub capex_rate_pct: Option<Decimal>,
    pub projection_years: Option<u32>,

    pub gross_margin_pct: Option<Decimal>,
    pub marketing_spend_pct: Option<Decimal>,
    pub rd_spend_pct: Option<Decimal>,
    pub ga_spend_pct: Option<Decimal>,

    pub customers: Option<Decimal>,
    pub monthly_churn_rate: Option<Decimal>,
    pub customer_acquisition_cost: Option<Decimal>,
    pub average_revenue_per_user: Option<Decimal>,

    pub cost_of_goods_per_unit: Option<Decimal>,
    pub wholesale_units_per_month: Option<Decimal>,
    pub wholesale_price_per_unit: Option<Decimal>,
    pub retail_units_per_month: Option<Decimal>,
    pub retail_price_per_unit: Option<Decimal>,
    pub inventory_turnover_per_year: Option<Decimal>,
    pub distribution_cost_pct: Option<Decimal>,
}

#[cfg(feature = "scenarios")]
impl From<ScenarioAdjustmentsRecord> for crate::scenarios::scenario::ScenarioAdjustments {
    fn from(r: ScenarioAdjustmentsRecord) -> Self {
        let pct = |v: Option<Decimal>| v.map(|x| x / PERCENT);
        Self {
            growth_year_1: pct(r.growth_year1),
            growth_year_5: pct(r.growth_year5),
            discount_rate: pct(r.discount_rate),
            terminal_growth_rate: pct(r.terminal_growth_rate),
            tax_rate: pct(r.tax_rate),
            capex_rate_pct: pct(r.capex_rate_pct),
            projection_years: r.projection_years,

            gross_margin_pct: pct(r.gross_margin_pct),
            marketing_spend_pct: pct(r.marketing_spend_pct),
            rd_spend_pct: pct(r.rd_spend_pct),
            ga_spend_pct: pct(r.ga_spend_pct),

            customers: r.customers,
            monthly_churn_rate: pct(r.monthly_churn_rate),
            customer_acquisition_cost: r.customer_acquisition_cost,
            average_revenue_per_user: r.average_revenue_per_user,

            cost_of_goods_per_unit: r.cost_of_goods_per_unit,
            wholesale_units_per_month: r.wholesale_units_per_month,
            wholesale_price_per_unit: r.wholesale_price_per_unit,
            retail_units_per_month: r.retail_units_per_month,
            retail_price_per_unit: r.retail_price_per_unit,
            inventory_turnover_per_year: r.inventory_turnover_per_year,
            distribution_cost_pct: pct(r.distribution_cost_pct),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saas_record() -> FinancialModelRecord {
        FinancialModelRecord {
            business_type: Some("saas".into()),
            customers: Some(dec!(1000)),
            monthly_churn_rate: Some(dec!(3)),
            customer_acquisition_cost: Some(dec!(500)),
            average_revenue_per_user: Some(dec!(100)),
            marketing_spend_pct: Some(dec!(20)),
            rd_spend_pct: Some(dec!(15)),
            ga_spend_pct: Some(dec!(10)),
            gross_margin_pct: Some(dec!(80)),
            growth_year1: Some(dec!(40)),
            growth_year5: Some(dec!(15)),
            discount_rate: Some(dec!(12)),
            terminal_growth_rate: Some(dec!(2.5)),
            projection_years: Some(5),
            tax_rate: Some(dec!(20)),
            capex_rate_pct: Some(dec!(5)),
            ..Default::default()
        }
    }

    #[test]
    fn test_saas_record_normalises_percentages() {
        let model = FinancialModel::try_from(saas_record()).unwrap();
        match &model.business {
            BusinessModel::Subscription(s) => {
                assert_eq!(s.monthly_churn_rate, dec!(0.03));
                assert_eq!(s.customers, dec!(1000));
                assert_eq!(s.average_revenue_per_user, dec!(100));
            }
            other => panic!("expected subscription, got {other:?}"),
        }
        assert_eq!(model.operating.gross_margin_pct, dec!(0.8));
        assert_eq!(model.assumptions.growth_year_1, dec!(0.4));
        assert_eq!(model.assumptions.terminal_growth_rate, dec!(0.025));
        assert_eq!(model.assumptions.tax_treatment, TaxTreatment::Flat);
    }

    #[test]
    fn test_business_type_aliases_case_insensitive() {
        let mut r = saas_record();
        r.business_type = Some(" Subscription ".into());
        assert!(FinancialModel::try_from(r).is_ok());
    }

    #[test]
    fn test_unknown_business_type_is_configuration_error() {
        let mut r = saas_record();
        r.business_type = Some("marketplace".into());
        let err = FinancialModel::try_from(r).unwrap_err();
        assert!(matches!(err, BizValError::Configuration { .. }));
    }

    #[test]
    fn test_missing_business_type_is_configuration_error() {
        let mut r = saas_record();
        r.business_type = None;
        assert!(matches!(
            FinancialModel::try_from(r),
            Err(BizValError::Configuration { .. })
        ));
    }

    #[test]
    fn test_missing_variant_field_is_configuration_error() {
        let mut r = saas_record();
        r.average_revenue_per_user = None;
        let err = FinancialModel::try_from(r).unwrap_err();
        match err {
            BizValError::Configuration { field, .. } => assert_eq!(field, "averageRevenuePerUser"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_cpg_record_requires_channel_fields() {
        // A saas row relabelled as cpg has none of the channel fields
        let mut r = saas_record();
        r.business_type = Some("cpg".into());
        assert!(matches!(
            FinancialModel::try_from(r),
            Err(BizValError::Configuration { .. })
        ));
    }

    #[test]
    fn test_invariants_checked_after_normalisation() {
        let mut r = saas_record();
        r.terminal_growth_rate = Some(dec!(12));
        assert!(matches!(
            FinancialModel::try_from(r),
            Err(BizValError::InvalidAssumption { .. })
        ));
    }

    #[test]
    fn test_record_deserialises_from_platform_json() {
        let json = serde_json::json!({
            "businessType": "cpg",
            "costOfGoodsPerUnit": 6,
            "wholesaleUnitsPerMonth": 5000,
            "wholesalePricePerUnit": 15,
            "retailUnitsPerMonth": 2000,
            "retailPricePerUnit": 25,
            "inventoryTurnoverPerYear": 6,
            "distributionCostPct": 8,
            "marketingSpendPct": 12,
            "rdSpendPct": 3,
            "gaSpendPct": 8,
            "grossMarginPct": 55,
            "growthYear1": 25,
            "growthYear5": 5,
            "discountRate": 10,
            "terminalGrowthRate": 2,
            "projectionYears": 5,
            "taxRate": 25,
            "capexRatePct": 4
        });
        let record: FinancialModelRecord = serde_json::from_value(json).unwrap();
        let model = FinancialModel::try_from(record).unwrap();
        assert_eq!(model.business.label(), "channel");
        assert_eq!(model.assumptions.discount_rate, dec!(0.1));
    }

    #[cfg(feature = "scenarios")]
    #[test]
    fn test_adjustment_record_scales_percent_fields_only() {
        use crate::scenarios::scenario::ScenarioAdjustments;

        let json = serde_json::json!({
            "discountRate": 14,
            "monthlyChurnRate": 5,
            "marketingSpendPct": 25,
            "averageRevenuePerUser": 90,
            "customers": 800
        });
        let record: ScenarioAdjustmentsRecord = serde_json::from_value(json).unwrap();
        let adj = ScenarioAdjustments::from(record);
        assert_eq!(adj.discount_rate, Some(dec!(0.14)));
        assert_eq!(adj.monthly_churn_rate, Some(dec!(0.05)));
        assert_eq!(adj.marketing_spend_pct, Some(dec!(0.25)));
        assert_eq!(adj.average_revenue_per_user, Some(dec!(90)));
        assert_eq!(adj.customers, Some(dec!(800)));
        assert_eq!(adj.growth_year_1, None);
    }
}
