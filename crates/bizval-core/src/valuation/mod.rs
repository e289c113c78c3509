pub mod dcf;

pub use dcf::{calculate_valuation, value, valuation_warnings, Projection, ValuationResult};
