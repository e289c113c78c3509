mod common;

use bizval_core::metrics::{calculate_metrics, MetricsSummary};
use bizval_core::model::BusinessModel;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{cpg_model, saas_model};

#[test]
fn test_saas_reference_metrics() {
    let out = calculate_metrics(&saas_model()).unwrap();
    let m = match out.result {
        MetricsSummary::Subscription(m) => m,
        other => panic!("expected subscription metrics, got {other:?}"),
    };
    assert_eq!(m.mrr, dec!(100_000));
    assert_eq!(m.arr, dec!(1_200_000));
    assert!((m.ltv.unwrap() - dec!(3333.33)).abs() < dec!(0.01));
    assert!((m.ltv_cac_ratio.unwrap() - dec!(6.67)).abs() < dec!(0.01));
    assert_eq!(m.payback_period_months, Some(dec!(5.0)));
}

#[test]
fn test_cpg_reference_metrics() {
    let out = calculate_metrics(&cpg_model()).unwrap();
    let m = match out.result {
        MetricsSummary::Channel(m) => m,
        other => panic!("expected channel metrics, got {other:?}"),
    };
    assert_eq!(m.monthly_revenue, dec!(125_000));
    assert_eq!(m.annual_revenue, dec!(1_500_000));
    assert_eq!(m.channel_mix.wholesale, dec!(0.60));
    assert_eq!(m.channel_mix.retail, dec!(0.40));
}

#[test]
fn test_zero_churn_ltv_is_null_in_json() {
    let mut model = saas_model();
    if let BusinessModel::Subscription(ref mut s) = model.business {
        s.monthly_churn_rate = Decimal::ZERO;
    }
    let out = calculate_metrics(&model).unwrap();
    let json = serde_json::to_value(&out.result).unwrap();
    assert!(json["ltv"].is_null());
    assert!(json["ltv_cac_ratio"].is_null());
    assert_eq!(json["business_type"], "subscription");
    assert!(!json["mrr"].is_null());
}

#[test]
fn test_metrics_independent_of_dcf_assumptions() {
    let mut model = cpg_model();
    model.assumptions.projection_years = 12;
    model.assumptions.growth_year_1 = dec!(0.90);
    let a = calculate_metrics(&model).unwrap().result;
    let b = calculate_metrics(&cpg_model()).unwrap().result;
    assert_eq!(a, b);
}
