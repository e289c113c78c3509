pub mod error;
pub mod model;
pub mod projection;
pub mod time_value;
pub mod types;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "scenarios")]
pub mod scenarios;

#[cfg(feature = "metrics")]
pub mod metrics;

pub use error::BizValError;
pub use model::{FinancialModel, FinancialModelRecord};
pub use types::*;

/// Standard result type for all valuation-engine operations
pub type BizValResult<T> = Result<T, BizValError>;
