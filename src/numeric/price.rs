// ============================================================================
// Price
// Signed fixed-precision price: an i64 mantissa scaled by 10^prec
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::fixed::{
    check_precision, cmp_scaled, div_round_half_away, f64_to_mantissa_i64, mantissa_i64_to_f64,
    normalize, pow10_i128, rescale_i128, DECIMAL_MAX_SCALE, MAX_PRECISION,
};
use super::quantity::Quantity;
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

/// The largest price magnitude that can be represented at every precision.
pub const PRICE_MAX: f64 = 9_223_372_036.0;

/// The smallest price that can be represented at every precision.
pub const PRICE_MIN: f64 = -9_223_372_036.0;

/// Sentinel mantissa for an unset price. Always paired with `prec == 0`.
pub const PRICE_UNDEF: i64 = i64::MAX;

/// Whole units of [`PRICE_MAX`], used to bound the mantissa at each precision.
const PRICE_MAX_UNITS: i128 = 9_223_372_036;

/// Signed decimal price stored as `value / 10^prec`.
///
/// The layout is part of the C ABI (`int64_t value; uintptr_t prec;`), so the
/// fields stay public and in this order.
///
/// Two prices are equal when they denote the same number, whatever their
/// precision: `1.0` at precision 1 equals `1.00` at precision 2.
///
/// # Value Range
/// - Minimum: [`PRICE_MIN`]
/// - Maximum: [`PRICE_MAX`]
/// - Precision: 0 to [`MAX_PRECISION`] decimal places
///
/// # Example
/// ```
/// use nautilus_model::numeric::Price;
///
/// let price = Price::new_checked(101.255, 2)?;
/// assert_eq!(price.value, 10_126);
/// assert_eq!(price.to_string(), "101.26");
/// # Ok::<(), nautilus_model::numeric::NumericError>(())
/// ```
#[repr(C)]
#[derive(Clone, Copy)]
pub struct Price {
    /// Signed mantissa.
    pub value: i64,
    /// Number of decimal places the mantissa is scaled by.
    pub prec: usize,
}

impl Price {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Creates a price from a float, rounding half away from zero to `prec` places.
    ///
    /// # Errors
    /// - `NonFinite` if `value` is NaN or infinite
    /// - `PrecisionExceeded` if `prec > MAX_PRECISION`
    /// - `OutOfRange` if `value` is outside [`PRICE_MIN`, `PRICE_MAX`]
    pub fn new_checked(value: f64, prec: usize) -> NumericResult<Self> {
        if !value.is_finite() {
            return Err(NumericError::NonFinite);
        }
        check_precision(prec)?;
        if !(PRICE_MIN..=PRICE_MAX).contains(&value) {
            return Err(NumericError::OutOfRange);
        }

        // f64 scaling can land a few ulps past the bound at the range edge
        let bound = PRICE_MAX_UNITS * pow10_i128(prec);
        let raw = (f64_to_mantissa_i64(value, prec)? as i128).clamp(-bound, bound);
        Ok(Self {
            value: raw as i64,
            prec,
        })
    }

    /// Creates a price from a float.
    ///
    /// # Panics
    /// Panics if the conversion fails, see [`Price::new_checked`].
    pub fn new(value: f64, prec: usize) -> Self {
        Self::new_checked(value, prec).unwrap_or_else(|e| panic!("invalid `Price`: {e}"))
    }

    /// Creates a price from an already scaled mantissa.
    ///
    /// The undefined sentinel is accepted only with precision 0.
    ///
    /// # Errors
    /// - `PrecisionExceeded` if `prec > MAX_PRECISION`
    /// - `OutOfRange` if the mantissa is beyond the representable range
    pub fn from_raw(value: i64, prec: usize) -> NumericResult<Self> {
        if value == PRICE_UNDEF {
            return match prec {
                0 => Ok(Self::undefined()),
                _ => Err(NumericError::InvalidInput),
            };
        }
        check_precision(prec)?;
        Self::from_scaled(value as i128, prec).map_err(|_| NumericError::OutOfRange)
    }

    /// Creates a whole-number price (precision 0).
    ///
    /// # Errors
    /// Returns `OutOfRange` if `value` exceeds [`PRICE_MAX`] in magnitude.
    pub fn from_int(value: i64) -> NumericResult<Self> {
        Self::from_scaled(value as i128, 0).map_err(|_| NumericError::OutOfRange)
    }

    /// Creates a price from a `Decimal`, rounding half away from zero to `prec` places.
    ///
    /// # Errors
    /// - `PrecisionExceeded` if `prec > MAX_PRECISION`
    /// - `OutOfRange` if the rounded value is beyond the representable range
    pub fn from_decimal(decimal: Decimal, prec: usize) -> NumericResult<Self> {
        check_precision(prec)?;
        let rounded =
            decimal.round_dp_with_strategy(prec as u32, RoundingStrategy::MidpointAwayFromZero);
        let raw = rescale_i128(rounded.mantissa(), rounded.scale() as usize, prec);
        Self::from_scaled(raw, prec).map_err(|_| NumericError::OutOfRange)
    }

    /// Zero at the given precision.
    ///
    /// # Errors
    /// Returns `PrecisionExceeded` if `prec > MAX_PRECISION`.
    pub fn zero(prec: usize) -> NumericResult<Self> {
        check_precision(prec)?;
        Ok(Self { value: 0, prec })
    }

    /// The undefined sentinel price.
    #[inline]
    pub const fn undefined() -> Self {
        Self {
            value: PRICE_UNDEF,
            prec: 0,
        }
    }

    /// Builds a price from an i128 mantissa, checking it against the range at `prec`.
    fn from_scaled(raw: i128, prec: usize) -> NumericResult<Self> {
        let bound = PRICE_MAX_UNITS * pow10_i128(prec);
        if raw > bound {
            Err(NumericError::Overflow)
        } else if raw < -bound {
            Err(NumericError::Underflow)
        } else {
            Ok(Self {
                value: raw as i64,
                prec,
            })
        }
    }

    /// Rejects the sentinel and any precision above `MAX_PRECISION`.
    #[inline]
    fn check_valid(&self) -> NumericResult<()> {
        if self.is_undefined() {
            return Err(NumericError::Undefined);
        }
        check_precision(self.prec)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Check if this is the undefined sentinel.
    #[inline]
    pub const fn is_undefined(&self) -> bool {
        self.value == PRICE_UNDEF
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.value == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.value > 0 && !self.is_undefined()
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.value < 0
    }

    /// Returns the value as an `f64`.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        mantissa_i64_to_f64(self.value, self.prec)
    }

    /// Returns the value as a `Decimal` carrying exactly `prec` decimal places.
    ///
    /// A hand-built value finer than 28 places is rounded half away from zero
    /// to 28, the most a `Decimal` can hold.
    #[inline]
    pub fn as_decimal(&self) -> Decimal {
        let scale = self.prec.min(DECIMAL_MAX_SCALE);
        let raw = rescale_i128(self.value as i128, self.prec, scale);
        Decimal::from_i128_with_scale(raw, scale as u32)
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Returns the same value at a different precision.
    ///
    /// Raising the precision is exact; lowering it rounds half away from zero.
    ///
    /// # Errors
    /// - `PrecisionExceeded` if `prec > MAX_PRECISION`
    /// - `Undefined` if this is the sentinel
    pub fn rescale(self, prec: usize) -> NumericResult<Self> {
        self.check_valid()?;
        check_precision(prec)?;
        Self::from_scaled(rescale_i128(self.value as i128, self.prec, prec), prec)
    }

    /// Checked addition. The result carries the larger of the two precisions.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the result is out of range.
    pub fn checked_add(self, rhs: Self) -> NumericResult<Self> {
        self.check_valid()?;
        rhs.check_valid()?;
        let prec = self.prec.max(rhs.prec);
        let sum = rescale_i128(self.value as i128, self.prec, prec)
            + rescale_i128(rhs.value as i128, rhs.prec, prec);
        Self::from_scaled(sum, prec)
    }

    /// Checked subtraction. The result carries the larger of the two precisions.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the result is out of range.
    pub fn checked_sub(self, rhs: Self) -> NumericResult<Self> {
        self.check_valid()?;
        rhs.check_valid()?;
        let prec = self.prec.max(rhs.prec);
        let diff = rescale_i128(self.value as i128, self.prec, prec)
            - rescale_i128(rhs.value as i128, rhs.prec, prec);
        Self::from_scaled(diff, prec)
    }

    /// Checked negation.
    ///
    /// # Errors
    /// Returns `Undefined` for the sentinel.
    pub fn checked_neg(self) -> NumericResult<Self> {
        self.check_valid()?;
        Ok(Self {
            value: -self.value,
            prec: self.prec,
        })
    }

    /// Absolute value.
    ///
    /// # Errors
    /// Returns `Undefined` for the sentinel.
    pub fn abs(self) -> NumericResult<Self> {
        self.check_valid()?;
        Ok(Self {
            value: self.value.abs(),
            prec: self.prec,
        })
    }

    /// Notional value `price * qty`, rounded half away from zero to this price's precision.
    ///
    /// Uses an i128 intermediate, so only the final result is range checked.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the notional is out of range.
    pub fn checked_mul_qty(self, qty: Quantity) -> NumericResult<Self> {
        self.check_valid()?;
        if qty.is_undefined() {
            return Err(NumericError::Undefined);
        }
        check_precision(qty.prec)?;

        let product = (self.value as i128)
            .checked_mul(qty.value as i128)
            .ok_or(NumericError::Overflow)?;
        let raw = div_round_half_away(product, pow10_i128(qty.prec));
        Self::from_scaled(raw, self.prec)
    }

    /// Returns the minimum of two values.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }

    /// Returns the maximum of two values.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for Price {
    #[inline]
    fn default() -> Self {
        Self { value: 0, prec: 0 }
    }
}

impl PartialEq for Price {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Price {}

impl PartialOrd for Price {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_scaled(self.value as i128, self.prec, other.value as i128, other.prec)
    }
}

impl Hash for Price {
    fn hash<H: Hasher>(&self, state: &mut H) {
        normalize(self.value as i128, self.prec).hash(state);
    }
}

// Infallible operators for ergonomics (panic on overflow - use checked_* in production)
impl Add for Price {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).expect("Price addition overflow")
    }
}

impl Sub for Price {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).expect("Price subtraction overflow")
    }
}

impl Neg for Price {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        self.checked_neg().expect("cannot negate an undefined Price")
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.as_f64()
    }
}

impl From<&Price> for f64 {
    fn from(price: &Price) -> Self {
        price.as_f64()
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price({})", self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() {
            write!(f, "UNDEF")
        } else if self.prec > DECIMAL_MAX_SCALE {
            // Exact scientific form when Decimal cannot carry the scale
            write!(f, "{}e-{}", self.value, self.prec)
        } else {
            write!(f, "{}", self.as_decimal())
        }
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl FromStr for Price {
    type Err = NumericError;

    /// Parse from a decimal or scientific string.
    ///
    /// The precision is the number of fractional digits written.
    ///
    /// # Examples
    /// - "123" -> 123 (precision 0)
    /// - "1_000.50" -> 1000.50 (precision 2)
    /// - "1.5e-3" -> 0.0015 (precision 4)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clean = s.trim().replace('_', "");
        if clean.is_empty() {
            return Err(NumericError::InvalidInput);
        }
        if clean == "UNDEF" {
            return Ok(Self::undefined());
        }

        let decimal = if clean.contains(['e', 'E']) {
            Decimal::from_scientific(&clean)
        } else {
            Decimal::from_str(&clean)
        }
        .map_err(|_| NumericError::InvalidInput)?;

        let prec = decimal.scale() as usize;
        if prec > MAX_PRECISION {
            return Err(NumericError::PrecisionLoss);
        }
        Self::from_decimal(decimal, prec)
    }
}

// ============================================================================
// Serialization (string form, so no precision is lost in transit)
// ============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
