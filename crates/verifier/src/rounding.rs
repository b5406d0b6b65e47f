//! Two-decimal rounding on the exact binary value of an `f64`.
//!
//! `x * 100.0` is itself rounded, which moves values such as 1.005 (stored
//! as 1.00499999...) onto a false tie. Rounding here works on the integer
//! mantissa instead, so only values that are exact ties in binary (0.125,
//! 0.375, ...) are treated as ties.

use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Tie-breaking rule for exact ties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Ties go to the even cent (0.125 -> 0.12)
    #[default]
    HalfEven,
    /// Ties go away from zero (0.125 -> 0.13)
    HalfUp,
}

/// Round to 2 decimal places.
pub fn round_to_cents(value: f64, mode: RoundingMode) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let (mantissa, exponent, _sign) = Float::integer_decode(value);
    if exponent >= 0 {
        // already an integer
        return value;
    }

    let shift = (-exponent) as u32;
    let scaled = mantissa as u128 * 100;
    let cents = if shift >= 120 {
        0
    } else {
        let quotient = scaled >> shift;
        let remainder = scaled & ((1u128 << shift) - 1);
        let half = 1u128 << (shift - 1);
        let round_up = match mode {
            RoundingMode::HalfEven => remainder > half || (remainder == half && quotient & 1 == 1),
            RoundingMode::HalfUp => remainder >= half,
        };
        quotient + round_up as u128
    };

    (cents as f64 / 100.0).copysign(value)
}
