// ============================================================================
// Quantity
// Non-negative fixed-precision quantity: a u64 mantissa scaled by 10^prec
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::fixed::{
    check_precision, cmp_scaled, div_round_half_away, f64_to_mantissa_u64, mantissa_u64_to_f64,
    normalize, pow10_i128, rescale_i128, DECIMAL_MAX_SCALE, MAX_PRECISION,
};
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};
use std::str::FromStr;

/// The largest quantity that can be represented at every precision.
pub const QUANTITY_MAX: f64 = 18_446_744_073.0;

/// The smallest representable quantity.
pub const QUANTITY_MIN: f64 = 0.0;

/// Sentinel mantissa for an unset quantity. Always paired with `prec == 0`.
pub const QUANTITY_UNDEF: u64 = u64::MAX;

const QUANTITY_MAX_UNITS: i128 = 18_446_744_073;

/// Non-negative decimal quantity stored as `value / 10^prec`.
///
/// Holds whole numbers of contracts or shares (precision 0) as well as
/// fractional sizes. The layout is part of the C ABI
/// (`uint64_t value; uintptr_t prec;`).
///
/// Equality and ordering are by numeric value, independent of precision.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct Quantity {
    /// Unsigned mantissa.
    pub value: u64,
    /// Number of decimal places the mantissa is scaled by.
    pub prec: usize,
}

impl Quantity {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Creates a quantity from a float, rounding half away from zero to `prec` places.
    ///
    /// `-0.0` is treated as zero.
    ///
    /// # Errors
    /// - `NonFinite` if `value` is NaN or infinite
    /// - `Negative` if `value < 0.0`
    /// - `PrecisionExceeded` if `prec > MAX_PRECISION`
    /// - `OutOfRange` if `value > QUANTITY_MAX`
    pub fn new_checked(value: f64, prec: usize) -> NumericResult<Self> {
        if !value.is_finite() {
            return Err(NumericError::NonFinite);
        }
        if value < QUANTITY_MIN {
            return Err(NumericError::Negative);
        }
        check_precision(prec)?;
        if value > QUANTITY_MAX {
            return Err(NumericError::OutOfRange);
        }

        // f64 scaling can land a few ulps past the bound at the range edge
        let bound = QUANTITY_MAX_UNITS * pow10_i128(prec);
        let raw = (f64_to_mantissa_u64(value, prec)? as i128).min(bound);
        Ok(Self {
            value: raw as u64,
            prec,
        })
    }

    /// Creates a quantity from a float.
    ///
    /// # Panics
    /// Panics if the conversion fails, see [`Quantity::new_checked`].
    pub fn new(value: f64, prec: usize) -> Self {
        Self::new_checked(value, prec).unwrap_or_else(|e| panic!("invalid `Quantity`: {e}"))
    }

    /// Creates a quantity that is guaranteed to be non-zero after rounding.
    ///
    /// # Errors
    /// Returns `InvalidInput` if `value` is zero or rounds to zero at `prec`,
    /// plus every error of [`Quantity::new_checked`].
    pub fn non_zero_checked(value: f64, prec: usize) -> NumericResult<Self> {
        let qty = Self::new_checked(value, prec)?;
        if qty.is_zero() {
            return Err(NumericError::InvalidInput);
        }
        Ok(qty)
    }

    /// Creates a non-zero quantity.
    ///
    /// # Panics
    /// Panics if the conversion fails, see [`Quantity::non_zero_checked`].
    pub fn non_zero(value: f64, prec: usize) -> Self {
        Self::non_zero_checked(value, prec)
            .unwrap_or_else(|e| panic!("invalid non-zero `Quantity`: {e}"))
    }

    /// Creates a quantity from an already scaled mantissa.
    ///
    /// The undefined sentinel is accepted only with precision 0.
    ///
    /// # Errors
    /// - `PrecisionExceeded` if `prec > MAX_PRECISION`
    /// - `OutOfRange` if the mantissa is beyond the representable range
    pub fn from_raw(value: u64, prec: usize) -> NumericResult<Self> {
        if value == QUANTITY_UNDEF {
            return match prec {
                0 => Ok(Self::undefined()),
                _ => Err(NumericError::InvalidInput),
            };
        }
        check_precision(prec)?;
        Self::from_scaled(value as i128, prec).map_err(|_| NumericError::OutOfRange)
    }

    /// Creates a whole-number quantity (precision 0).
    ///
    /// # Errors
    /// Returns `OutOfRange` if `value` exceeds [`QUANTITY_MAX`].
    pub fn from_int(value: u64) -> NumericResult<Self> {
        Self::from_scaled(value as i128, 0).map_err(|_| NumericError::OutOfRange)
    }

    /// Creates a quantity from a `Decimal`, rounding half away from zero to `prec` places.
    ///
    /// # Errors
    /// - `Negative` if `decimal` is below zero
    /// - `PrecisionExceeded` if `prec > MAX_PRECISION`
    /// - `OutOfRange` if the rounded value is beyond the representable range
    pub fn from_decimal(decimal: Decimal, prec: usize) -> NumericResult<Self> {
        if decimal.is_sign_negative() && !decimal.is_zero() {
            return Err(NumericError::Negative);
        }
        check_precision(prec)?;
        let rounded =
            decimal.round_dp_with_strategy(prec as u32, RoundingStrategy::MidpointAwayFromZero);
        let raw = rescale_i128(rounded.mantissa().abs(), rounded.scale() as usize, prec);
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

    /// The undefined sentinel quantity.
    #[inline]
    pub const fn undefined() -> Self {
        Self {
            value: QUANTITY_UNDEF,
            prec: 0,
        }
    }

    fn from_scaled(raw: i128, prec: usize) -> NumericResult<Self> {
        if raw < 0 {
            Err(NumericError::Underflow)
        } else if raw > QUANTITY_MAX_UNITS * pow10_i128(prec) {
            Err(NumericError::Overflow)
        } else {
            Ok(Self {
                value: raw as u64,
                prec,
            })
        }
    }

    #[inline]
    fn check_valid(&self) -> NumericResult<()> {
        if self.is_undefined() {
            return Err(NumericError::Undefined);
        }
        check_precision(self.prec)
    }

    /// Lifts both operands to the larger precision.
    #[inline]
    fn aligned(self, rhs: Self) -> (i128, i128, usize) {
        let prec = self.prec.max(rhs.prec);
        (
            rescale_i128(self.value as i128, self.prec, prec),
            rescale_i128(rhs.value as i128, rhs.prec, prec),
            prec,
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub const fn is_undefined(&self) -> bool {
        self.value == QUANTITY_UNDEF
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Check if value is strictly positive (and defined).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.value > 0 && !self.is_undefined()
    }

    #[inline]
    pub fn as_f64(&self) -> f64 {
        mantissa_u64_to_f64(self.value, self.prec)
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
    /// # Errors
    /// - `PrecisionExceeded` if `prec > MAX_PRECISION`
    /// - `Undefined` if this is the sentinel
    pub fn rescale(self, prec: usize) -> NumericResult<Self> {
        self.check_valid()?;
        check_precision(prec)?;
        Self::from_scaled(rescale_i128(self.value as i128, self.prec, prec), prec)
    }

    /// Checked addition at the larger of the two precisions.
    ///
    /// # Errors
    /// Returns `Overflow` if the sum exceeds [`QUANTITY_MAX`].
    pub fn checked_add(self, rhs: Self) -> NumericResult<Self> {
        self.check_valid()?;
        rhs.check_valid()?;
        let (a, b, prec) = self.aligned(rhs);
        Self::from_scaled(a + b, prec)
    }

    /// Checked subtraction at the larger of the two precisions.
    ///
    /// # Errors
    /// Returns `Underflow` if `rhs > self`.
    pub fn checked_sub(self, rhs: Self) -> NumericResult<Self> {
        self.check_valid()?;
        rhs.check_valid()?;
        let (a, b, prec) = self.aligned(rhs);
        Self::from_scaled(a - b, prec)
    }

    /// Checked multiplication at the larger of the two precisions,
    /// rounded half away from zero.
    ///
    /// # Errors
    /// Returns `Overflow` if the product exceeds [`QUANTITY_MAX`].
    pub fn checked_mul(self, rhs: Self) -> NumericResult<Self> {
        self.check_valid()?;
        rhs.check_valid()?;
        let (a, b, prec) = self.aligned(rhs);
        let product = a.checked_mul(b).ok_or(NumericError::Overflow)?;
        Self::from_scaled(div_round_half_away(product, pow10_i128(prec)), prec)
    }

    /// Subtraction that clamps at zero instead of failing.
    ///
    /// Logs a warning when the result is clamped, since that usually means
    /// fills exceeded the order or position size upstream.
    ///
    /// # Errors
    /// Returns `Undefined` if either operand is the sentinel.
    pub fn saturating_sub(self, rhs: Self) -> NumericResult<Self> {
        self.check_valid()?;
        rhs.check_valid()?;
        let (a, b, prec) = self.aligned(rhs);
        if b > a {
            tracing::warn!(
                "Saturating Quantity subtraction: {} - {} < 0, clamped to 0 (prec={})",
                self,
                rhs,
                prec
            );
            return Ok(Self { value: 0, prec });
        }
        Self::from_scaled(a - b, prec)
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

impl Default for Quantity {
    #[inline]
    fn default() -> Self {
        Self { value: 0, prec: 0 }
    }
}

impl PartialEq for Quantity {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_scaled(self.value as i128, self.prec, other.value as i128, other.prec)
    }
}

impl Hash for Quantity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        normalize(self.value as i128, self.prec).hash(state);
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).expect("Quantity addition overflow")
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).expect("Quantity subtraction underflow")
    }
}

impl From<Quantity> for f64 {
    fn from(qty: Quantity) -> Self {
        qty.as_f64()
    }
}

impl From<&Quantity> for f64 {
    fn from(qty: &Quantity) -> Self {
        qty.as_f64()
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quantity({})", self)
    }
}

impl fmt::Display for Quantity {
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

impl FromStr for Quantity {
    type Err = NumericError;

    /// Parse from a decimal or scientific string, e.g. "1e7" or "0.001_5".
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

#[cfg(feature = "serde")]
impl serde::Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Quantity {
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
