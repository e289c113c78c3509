use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use bizval_core::model::{FinancialModelRecord, ScenarioAdjustmentsRecord};
use bizval_core::scenarios::{
    Perturbation, ScenarioAdjustments, ScenarioWeights, SensitivityDimension, DEFAULT_DELTAS,
};
use bizval_core::FinancialModel;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_model(record: FinancialModelRecord) -> NapiResult<FinancialModel> {
    FinancialModel::try_from(record).map_err(to_napi_error)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SensitivityRequest {
    model: FinancialModelRecord,
    dimension: SensitivityDimension,
    #[serde(default)]
    deltas: Option<Vec<Perturbation>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridRequest {
    model: FinancialModelRecord,
    #[serde(default)]
    growth_deltas: Option<Vec<Perturbation>>,
    #[serde(default)]
    discount_deltas: Option<Vec<Perturbation>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioRequest {
    model: FinancialModelRecord,
    #[serde(default)]
    bear: ScenarioAdjustmentsRecord,
    #[serde(default)]
    bull: ScenarioAdjustmentsRecord,
    #[serde(default)]
    weights: Option<ScenarioWeights>,
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

/// Full DCF valuation of a platform model record.
#[napi]
pub fn value_model(model_json: String) -> NapiResult<String> {
    let record: FinancialModelRecord = serde_json::from_str(&model_json).map_err(to_napi_error)?;
    let model = parse_model(record)?;
    let output = bizval_core::valuation::calculate_valuation(&model).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn sensitivity_analysis(input_json: String) -> NapiResult<String> {
    let request: SensitivityRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let model = parse_model(request.model)?;
    let deltas = request.deltas.unwrap_or_else(|| DEFAULT_DELTAS.to_vec());
    let output = bizval_core::scenarios::analyze_sensitivity(&model, request.dimension, &deltas)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sensitivity_grid(input_json: String) -> NapiResult<String> {
    let request: GridRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let model = parse_model(request.model)?;
    let growth = request.growth_deltas.unwrap_or_else(|| DEFAULT_DELTAS.to_vec());
    let discount = request.discount_deltas.unwrap_or_else(|| DEFAULT_DELTAS.to_vec());
    let output = bizval_core::scenarios::sensitivity_grid(&model, &growth, &discount)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_scenarios(input_json: String) -> NapiResult<String> {
    let request: ScenarioRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let model = parse_model(request.model)?;
    let bear: ScenarioAdjustments = request.bear.into();
    let bull: ScenarioAdjustments = request.bull.into();
    let output = bizval_core::scenarios::compare_scenarios(
        &model,
        &bear,
        &bull,
        request.weights.as_ref(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[napi]
pub fn unit_economics(model_json: String) -> NapiResult<String> {
    let record: FinancialModelRecord = serde_json::from_str(&model_json).map_err(to_napi_error)?;
    let model = parse_model(record)?;
    let output = bizval_core::metrics::calculate_metrics(&model).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
