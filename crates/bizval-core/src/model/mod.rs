pub mod financial_model;
pub mod record;

pub use financial_model::{
    BusinessModel, ChannelEconomics, DcfAssumptions, FinancialModel, OperatingRatios,
    SubscriptionEconomics, TaxTreatment,
};
pub use record::{FinancialModelRecord, ScenarioAdjustmentsRecord};
