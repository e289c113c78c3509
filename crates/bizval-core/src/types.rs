use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BizValError;
use crate::BizValResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Customer, unit and share counts.
pub type Count = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Percentage change of `value` against `base`, as a fraction.
/// `None` when the base is zero or the change is outside the decimal range.
pub fn change_from_base(value: Money, base: Money) -> Option<Rate> {
    if base.is_zero() {
        return None;
    }
    value.checked_sub(base)?.checked_div(base.abs())
}

// ---------------------------------------------------------------------------
// Checked arithmetic
// ---------------------------------------------------------------------------

fn out_of_range(field: &str) -> BizValError {
    BizValError::invalid_assumption(field, "Result exceeds the representable decimal range")
}

/// `a * b`; overflow is reported against `field`.
pub(crate) fn checked_mul(a: Decimal, b: Decimal, field: &str) -> BizValResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| out_of_range(field))
}

pub(crate) fn checked_add(a: Decimal, b: Decimal, field: &str) -> BizValResult<Decimal> {
    a.checked_add(b).ok_or_else(|| out_of_range(field))
}

pub(crate) fn checked_sub(a: Decimal, b: Decimal, field: &str) -> BizValResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| out_of_range(field))
}

/// `a / b`; a zero divisor is reported the same way as overflow.
pub(crate) fn checked_div(a: Decimal, b: Decimal, field: &str) -> BizValResult<Decimal> {
    a.checked_div(b).ok_or_else(|| out_of_range(field))
}
