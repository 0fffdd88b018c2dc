use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::ProjectionResult;

/// All monetary values (millions-equivalent). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages expressed on a 0-100 scale (16 = 16%), as the levers are entered.
pub type Percent = Decimal;

/// Rates expressed as decimals (0.16 = 16%). Used only for calibration factors.
pub type Rate = Decimal;

/// Multiples (e.g., 8x EV/EBITDA)
pub type Multiple = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

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

// ---------------------------------------------------------------------------
// Shared validation and rounding helpers
// ---------------------------------------------------------------------------

pub(crate) fn validate_non_negative(field: &str, value: Money) -> ProjectionResult<()> {
    if value < Decimal::ZERO {
        return Err(ProjectionError::InvalidInput {
            field: field.into(),
            reason: format!("Value must be non-negative, got {value}"),
        });
    }
    Ok(())
}

/// Largest accepted monetary input. At the maximum growth lever every
/// projected line and valuation stays well inside `Decimal` range.
pub const MAX_AMOUNT: Money = dec!(1000000000000000);

/// Largest accepted EV/EBITDA multiple.
pub const MAX_MULTIPLE: Multiple = dec!(1000);

/// Non-negative and no larger than [`MAX_AMOUNT`].
pub(crate) fn validate_amount(field: &str, value: Money) -> ProjectionResult<()> {
    validate_non_negative(field, value)?;
    if value > MAX_AMOUNT {
        return Err(ProjectionError::InvalidInput {
            field: field.into(),
            reason: format!("Value must not exceed {MAX_AMOUNT}, got {value}"),
        });
    }
    Ok(())
}

pub(crate) fn validate_range(
    field: &str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> ProjectionResult<()> {
    if value < min || value > max {
        return Err(ProjectionError::InvalidInput {
            field: field.into(),
            reason: format!("Value must be between {min} and {max}, got {value}"),
        });
    }
    Ok(())
}

/// `100 * part / whole`. `None` when `whole` is zero or the ratio does not
/// fit in a `Decimal` (a vanishingly small `whole`).
pub fn percent_of(part: Decimal, whole: Decimal) -> Option<Percent> {
    if whole.is_zero() {
        return None;
    }
    dec!(100).checked_mul(part)?.checked_div(whole)
}

/// Round half away from zero and pin the scale, so `342` renders as `342.0`.
pub fn round_fixed(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}
