// ============================================================================
// Numeric Errors
// Error types for fixed-precision conversions and arithmetic
// ============================================================================

use std::fmt;

/// Errors that can occur while building or combining fixed-precision values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Result exceeded the largest representable mantissa
    Overflow,
    /// Result below the smallest representable mantissa
    Underflow,
    /// Conversion would lose significant digits
    PrecisionLoss,
    /// Input string or value is invalid
    InvalidInput,
    /// Increment or operand is not representable at the target precision
    ScaleMismatch,
    /// Input float was NaN or infinite
    NonFinite,
    /// Requested precision is above `MAX_PRECISION`
    PrecisionExceeded,
    /// Negative input for an unsigned value type
    Negative,
    /// Input lies outside the representable value range
    OutOfRange,
    /// Operand is the undefined sentinel
    Undefined,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::Overflow => {
                write!(f, "arithmetic overflow: result exceeded maximum value")
            },
            NumericError::Underflow => {
                write!(f, "arithmetic underflow: result below minimum value")
            },
            NumericError::PrecisionLoss => write!(
                f,
                "precision loss: conversion would lose significant digits"
            ),
            NumericError::InvalidInput => write!(f, "invalid input: could not parse value"),
            NumericError::ScaleMismatch => write!(
                f,
                "scale mismatch: value not representable at the target precision"
            ),
            NumericError::NonFinite => write!(f, "invalid input: value was NaN or infinite"),
            NumericError::PrecisionExceeded => {
                write!(f, "precision exceeded the maximum supported decimal places")
            },
            NumericError::Negative => {
                write!(f, "invalid input: value must not be negative")
            },
            NumericError::OutOfRange => {
                write!(f, "invalid input: value outside the representable range")
            },
            NumericError::Undefined => write!(f, "operand was the undefined sentinel"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;
