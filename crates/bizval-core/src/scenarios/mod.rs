//! Re-running the full valuation under perturbed or alternate assumptions.

pub mod scenario;
pub mod sensitivity;

pub use scenario::{
    compare_scenarios, AssumptionSet, ScenarioAdjustments, ScenarioCase, ScenarioComparison,
    ScenarioWeights,
};
pub use sensitivity::{
    analyze_sensitivity, perturb, sensitivity_grid, Perturbation, SensitivityDimension,
    SensitivityGrid, SensitivityOutput, SensitivityScenario, DEFAULT_DELTAS,
};
