// ============================================================================
// Fixed-Point Helpers
// Precision limits and mantissa conversions shared by Price and Quantity
// ============================================================================
//
// A value is stored as `mantissa / 10^prec`. Every conversion from `f64`
// rounds half away from zero. Cross-precision work (comparison, addition,
// rescaling) is done on i128 so that a mantissa at precision 0 can be lifted
// to `MAX_PRECISION` without overflow.

use super::errors::{NumericError, NumericResult};
use std::cmp::Ordering;

/// Maximum number of decimal places supported by `Price` and `Quantity`.
pub const MAX_PRECISION: usize = 9;

/// Largest scale a `rust_decimal::Decimal` can carry.
pub(crate) const DECIMAL_MAX_SCALE: usize = 28;

/// 2^63 as f64, the first float that does not fit in an i64.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// 2^64 as f64, the first float that does not fit in a u64.
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Compute 10^n at compile time
///
/// Valid for `n <= 18`.
pub const fn pow10(n: usize) -> i64 {
    let mut result: i64 = 1;
    let mut i = 0;
    while i < n {
        result *= 10;
        i += 1;
    }
    result
}

/// Compute 10^n as i128. Valid for `n <= 38`.
pub(crate) const fn pow10_i128(n: usize) -> i128 {
    let mut result: i128 = 1;
    let mut i = 0;
    while i < n {
        result *= 10;
        i += 1;
    }
    result
}

/// Compute 10^n as i128, or `None` once it no longer fits.
#[inline]
pub(crate) fn checked_pow10_i128(n: usize) -> Option<i128> {
    u32::try_from(n).ok().and_then(|n| 10i128.checked_pow(n))
}

/// 10^prec as f64 for any precision, without integer overflow.
#[inline]
fn scale_f64(prec: usize) -> f64 {
    if prec <= 18 {
        pow10(prec) as f64
    } else {
        10f64.powi(i32::try_from(prec).unwrap_or(i32::MAX))
    }
}

/// Checks that `prec` is within `0..=MAX_PRECISION`.
///
/// # Errors
/// Returns `PrecisionExceeded` if `prec > MAX_PRECISION`.
#[inline]
pub fn check_precision(prec: usize) -> NumericResult<()> {
    if prec > MAX_PRECISION {
        return Err(NumericError::PrecisionExceeded);
    }
    Ok(())
}

/// Checks that `value` is neither NaN nor infinite.
///
/// # Errors
/// Returns `NonFinite` otherwise.
#[inline]
pub fn check_finite(value: f64) -> NumericResult<()> {
    if !value.is_finite() {
        return Err(NumericError::NonFinite);
    }
    Ok(())
}

/// Converts `value` to a signed mantissa at `prec` decimal places.
///
/// The mantissa is `round(value * 10^prec)`, with ties rounded away from zero.
///
/// # Errors
/// - `NonFinite` if `value` is NaN or infinite
/// - `PrecisionExceeded` if `prec > MAX_PRECISION`
/// - `Overflow` / `Underflow` if the scaled value does not fit in an i64
pub fn f64_to_mantissa_i64(value: f64, prec: usize) -> NumericResult<i64> {
    check_finite(value)?;
    check_precision(prec)?;

    let scaled = (value * pow10(prec) as f64).round();
    if scaled >= TWO_POW_63 {
        Err(NumericError::Overflow)
    } else if scaled < -TWO_POW_63 {
        Err(NumericError::Underflow)
    } else {
        Ok(scaled as i64)
    }
}

/// Converts a non-negative `value` to an unsigned mantissa at `prec` decimal places.
///
/// `-0.0` is accepted and yields zero.
///
/// # Errors
/// - `NonFinite` if `value` is NaN or infinite
/// - `Negative` if `value < 0.0`
/// - `PrecisionExceeded` if `prec > MAX_PRECISION`
/// - `Overflow` if the scaled value does not fit in a u64
pub fn f64_to_mantissa_u64(value: f64, prec: usize) -> NumericResult<u64> {
    check_finite(value)?;
    if value < 0.0 {
        return Err(NumericError::Negative);
    }
    check_precision(prec)?;

    let scaled = (value * pow10(prec) as f64).round();
    if scaled >= TWO_POW_64 {
        Err(NumericError::Overflow)
    } else {
        Ok(scaled as u64)
    }
}

/// Converts a signed mantissa back to an `f64`.
#[inline]
pub fn mantissa_i64_to_f64(value: i64, prec: usize) -> f64 {
    value as f64 / scale_f64(prec)
}

/// Converts an unsigned mantissa back to an `f64`.
#[inline]
pub fn mantissa_u64_to_f64(value: u64, prec: usize) -> f64 {
    value as f64 / scale_f64(prec)
}

/// Integer division rounding half away from zero. `d` must be positive.
#[inline]
pub(crate) fn div_round_half_away(n: i128, d: i128) -> i128 {
    debug_assert!(d > 0);
    let half = d / 2;
    if n >= 0 {
        (n + half) / d
    } else {
        (n - half) / d
    }
}

/// Moves a mantissa from precision `from` to precision `to`.
///
/// Raising the precision is exact and expects `to` within `MAX_PRECISION`;
/// lowering it rounds half away from zero and accepts any gap.
#[inline]
pub(crate) fn rescale_i128(value: i128, from: usize, to: usize) -> i128 {
    match from.cmp(&to) {
        Ordering::Equal => value,
        Ordering::Less => value * pow10_i128(to - from),
        Ordering::Greater => match checked_pow10_i128(from - to) {
            Some(divisor) => div_round_half_away(value, divisor),
            // Every i128 rounds to zero past 10^38
            None => 0,
        },
    }
}

/// Multiplies by 10^by, or `None` if the result leaves i128.
#[inline]
fn checked_upscale(value: i128, by: usize) -> Option<i128> {
    if value == 0 {
        return Some(0);
    }
    checked_pow10_i128(by).and_then(|factor| value.checked_mul(factor))
}

/// Compares two mantissas that may carry different precisions.
///
/// Total for any precision: a side whose upscale leaves i128 is larger in
/// magnitude than the other, so only its sign decides.
#[inline]
pub(crate) fn cmp_scaled(a: i128, a_prec: usize, b: i128, b_prec: usize) -> Ordering {
    let prec = a_prec.max(b_prec);
    match (checked_upscale(a, prec - a_prec), checked_upscale(b, prec - b_prec)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (None, _) => a.cmp(&0),
        (_, None) => 0.cmp(&b),
    }
}

/// Strips trailing fractional zeros, giving one canonical form per numeric value.
#[inline]
pub(crate) fn normalize(mut value: i128, mut prec: usize) -> (i128, usize) {
    if value == 0 {
        return (0, 0);
    }
    while prec > 0 && value % 10 == 0 {
        value /= 10;
        prec -= 1;
    }
    (value, prec)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pow10() {
        assert_eq!(pow10(0), 1);
        assert_eq!(pow10(9), 1_000_000_000);
        assert_eq!(pow10(18), 1_000_000_000_000_000_000);
        assert_eq!(pow10_i128(20), 100_000_000_000_000_000_000);
    }

    #[test]
    fn test_precision_boundaries() {
        assert!(check_precision(0).is_ok());
        assert!(check_precision(MAX_PRECISION).is_ok());
        assert_eq!(
            check_precision(MAX_PRECISION + 1),
            Err(NumericError::PrecisionExceeded)
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(f64_to_mantissa_i64(f64::NAN, 2), Err(NumericError::NonFinite));
        assert_eq!(
            f64_to_mantissa_i64(f64::INFINITY, 2),
            Err(NumericError::NonFinite)
        );
        assert_eq!(
            f64_to_mantissa_u64(f64::NEG_INFINITY, 2),
            Err(NumericError::NonFinite)
        );
    }

    #[test]
    fn test_precision_specific_values() {
        assert_eq!(f64_to_mantissa_i64(123456.0, 0), Ok(123_456));
        assert_eq!(f64_to_mantissa_i64(123456.7, 0), Ok(123_457));
        assert_eq!(f64_to_mantissa_i64(123456.7, 1), Ok(1_234_567));
        assert_eq!(f64_to_mantissa_i64(123456.78, 2), Ok(12_345_678));
        assert_eq!(f64_to_mantissa_i64(123456.12345678, 8), Ok(12_345_612_345_678));
        assert_eq!(f64_to_mantissa_i64(123456.123456789, 9), Ok(123_456_123_456_789));
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        let cases: [(usize, f64, i64); 9] = [
            (0, 1.4, 1),
            (0, 1.5, 2),
            (0, 1.6, 2),
            (1, 1.44, 14),
            (1, 1.45, 15),
            (1, 1.46, 15),
            (2, 1.444, 144),
            (2, 1.445, 145),
            (2, 1.446, 145),
        ];
        for (prec, input, expected) in cases {
            assert_eq!(f64_to_mantissa_i64(input, prec), Ok(expected), "{input}@{prec}");
            assert_eq!(f64_to_mantissa_i64(-input, prec), Ok(-expected), "-{input}@{prec}");
        }
    }

    #[test]
    fn test_repeating_fives() {
        let cases: [(usize, f64, i64); 10] = [
            (0, 5.5, 6),
            (1, 5.55, 56),
            (2, 5.555, 556),
            (3, 5.5555, 5_556),
            (4, 5.55555, 55_556),
            (5, 5.555_555, 555_556),
            (6, 5.555_555_5, 5_555_556),
            (7, 5.555_555_55, 55_555_556),
            (8, 5.555_555_555, 555_555_556),
            (9, 5.555_555_555_5, 5_555_555_556),
        ];
        for (prec, input, expected) in cases {
            assert_eq!(f64_to_mantissa_i64(input, prec), Ok(expected));
            assert_eq!(f64_to_mantissa_u64(input, prec), Ok(expected as u64));
        }
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(f64_to_mantissa_i64(-0.0, 9), Ok(0));
        assert_eq!(f64_to_mantissa_u64(-0.0, 9), Ok(0));
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        assert_eq!(f64_to_mantissa_u64(-0.1, 1), Err(NumericError::Negative));
        // Still negative even when it would round to zero
        assert_eq!(f64_to_mantissa_u64(-1e-12, 0), Err(NumericError::Negative));
    }

    #[test]
    fn test_mantissa_overflow() {
        assert_eq!(f64_to_mantissa_i64(1e19, 0), Err(NumericError::Overflow));
        assert_eq!(f64_to_mantissa_i64(-1e19, 0), Err(NumericError::Underflow));
        assert_eq!(f64_to_mantissa_u64(2e19, 0), Err(NumericError::Overflow));
        assert_eq!(f64_to_mantissa_u64(1e19, 0), Ok(10_000_000_000_000_000_000));
    }

    #[test]
    fn test_mantissa_to_f64() {
        assert_eq!(mantissa_i64_to_f64(12_345, 2), 123.45);
        assert_eq!(mantissa_i64_to_f64(-1, 9), -0.000_000_001);
        assert_eq!(mantissa_u64_to_f64(1, 0), 1.0);
        assert_eq!(mantissa_u64_to_f64(11, 1), 1.1);
    }

    #[test]
    fn test_mantissa_to_f64_beyond_i64_scale() {
        let tiny = mantissa_i64_to_f64(1, 19);
        assert!(tiny > 0.0 && tiny < 1e-18);
        assert_eq!(mantissa_u64_to_f64(5, 400), 0.0);
        assert_eq!(mantissa_i64_to_f64(-5, usize::MAX), 0.0);
    }

    #[test]
    fn test_div_round_half_away() {
        assert_eq!(div_round_half_away(15, 10), 2);
        assert_eq!(div_round_half_away(14, 10), 1);
        assert_eq!(div_round_half_away(-15, 10), -2);
        assert_eq!(div_round_half_away(-14, 10), -1);
        assert_eq!(div_round_half_away(0, 10), 0);
    }

    #[test]
    fn test_rescale() {
        assert_eq!(rescale_i128(12_345, 2, 4), 1_234_500);
        assert_eq!(rescale_i128(12_345, 2, 1), 1_235);
        assert_eq!(rescale_i128(-12_345, 2, 1), -1_235);
        assert_eq!(rescale_i128(12_345, 2, 2), 12_345);
    }

    #[test]
    fn test_rescale_down_any_gap() {
        assert_eq!(rescale_i128(i64::MAX as i128, 40, 0), 0);
        assert_eq!(rescale_i128(-7, usize::MAX, 28), 0);
        assert_eq!(rescale_i128(5, 38, 37), 1);
        assert_eq!(checked_pow10_i128(38), Some(pow10_i128(38)));
        assert_eq!(checked_pow10_i128(39), None);
    }

    #[test]
    fn test_cmp_scaled() {
        assert_eq!(cmp_scaled(10, 1, 100, 2), Ordering::Equal);
        assert_eq!(cmp_scaled(11, 1, 100, 2), Ordering::Greater);
        assert_eq!(cmp_scaled(-1, 0, 1, 9), Ordering::Less);
    }

    #[test]
    fn test_cmp_scaled_wide_precision_gap() {
        // Gap past 10^38
        assert_eq!(cmp_scaled(1, 0, 1, 40), Ordering::Greater);
        assert_eq!(cmp_scaled(1, 40, 1, 0), Ordering::Less);
        assert_eq!(cmp_scaled(-1, 0, 5, 40), Ordering::Less);
        assert_eq!(cmp_scaled(0, 0, 1, 40), Ordering::Less);
        assert_eq!(cmp_scaled(0, 0, 0, usize::MAX), Ordering::Equal);

        // Gap that fits but whose product leaves i128
        let big = i64::MAX as i128;
        assert_eq!(cmp_scaled(big, 0, 1, 30), Ordering::Greater);
        assert_eq!(cmp_scaled(-big, 0, -1, 30), Ordering::Less);

        // Equal values stay equal across wide gaps that fit
        assert_eq!(cmp_scaled(1, 0, pow10_i128(30), 30), Ordering::Equal);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(1_500, 3), (15, 1));
        assert_eq!(normalize(1_500, 0), (1_500, 0));
        assert_eq!(normalize(0, 7), (0, 0));
        assert_eq!(normalize(-2_000_000_000, 9), (-2, 0));
    }

    #[test]
    fn test_integer_conversion_is_exact() {
        fn prop(value: i32, prec: u8) -> bool {
            let prec = (prec as usize) % (MAX_PRECISION + 1);
            match f64_to_mantissa_i64(value as f64, prec) {
                Ok(mantissa) => mantissa == value as i64 * pow10(prec),
                Err(_) => false,
            }
        }
        quickcheck::quickcheck(prop as fn(i32, u8) -> bool);
    }

    proptest! {
        #[test]
        fn prop_rescale_up_then_down_is_identity(
            value in -1_000_000_000_000i128..1_000_000_000_000i128,
            from in 0usize..=MAX_PRECISION,
            extra in 0usize..=MAX_PRECISION,
        ) {
            let up = rescale_i128(value, from, from + extra);
            prop_assert_eq!(rescale_i128(up, from + extra, from), value);
        }

        #[test]
        fn prop_normalize_preserves_value(
            value in -1_000_000_000_000i128..1_000_000_000_000i128,
            prec in 0usize..=MAX_PRECISION,
        ) {
            let (norm, norm_prec) = normalize(value, prec);
            prop_assert_eq!(cmp_scaled(norm, norm_prec, value, prec), Ordering::Equal);
        }
    }
}
