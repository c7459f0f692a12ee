// ============================================================================
// Numeric Module
// Fixed-precision value types for prices and quantities
// ============================================================================
//
// This module provides:
// - Price: signed i64 mantissa + decimal precision
// - Quantity: unsigned u64 mantissa + decimal precision
// - NumericError: Error types for conversions and arithmetic
// - fixed: precision limits and f64 <-> mantissa conversions
//
// Design principles:
// - Both value types are #[repr(C)] plain data, passed by value over the C ABI
// - Every f64 conversion rounds half away from zero
// - Fallible operations return NumericResult; only the std operator impls panic
// - Values compare by number, not by representation

pub mod fixed;

mod errors;
mod price;
mod quantity;

pub use errors::{NumericError, NumericResult};
pub use fixed::MAX_PRECISION;
pub use price::{Price, PRICE_MAX, PRICE_MIN, PRICE_UNDEF};
pub use quantity::{Quantity, QUANTITY_MAX, QUANTITY_MIN, QUANTITY_UNDEF};
