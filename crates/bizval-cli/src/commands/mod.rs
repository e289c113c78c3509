pub mod metrics;
pub mod scenarios;
pub mod valuation;

use bizval_core::{FinancialModel, FinancialModelRecord};

use crate::input;

/// Load a platform-form model record and convert it into a validated model.
pub fn load_model(path: Option<&str>) -> Result<FinancialModel, Box<dyn std::error::Error>> {
    let record: FinancialModelRecord = input::read_document(path)?;
    Ok(FinancialModel::try_from(record)?)
}
