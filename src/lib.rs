// ============================================================================
// Nautilus Model Library
// Fixed-precision Price and Quantity value types with a C ABI
// ============================================================================

//! # Nautilus Model
//!
//! Fixed-precision decimal value types for trading systems, usable natively
//! from Rust and by value across a C ABI.
//!
//! ## Features
//!
//! - **`Price`**: signed i64 mantissa plus decimal precision
//! - **`Quantity`**: unsigned u64 mantissa plus decimal precision
//! - **C ABI** constructors `new_price` / `new_qty` (see `include/nautilus_model.h`)
//! - **Instrument configuration** to snap prices and sizes to tick and lot increments
//! - Optional `serde` support and `tracing-subscriber` setup (`logging` feature)
//!
//! ## Example
//!
//! ```rust
//! use nautilus_model::prelude::*;
//!
//! // Round half away from zero to two decimal places
//! let price = Price::new_checked(101.255, 2).unwrap();
//! assert_eq!(price.value, 10_126);
//!
//! // Values compare by number, not representation
//! assert_eq!(Quantity::new(1.0, 0), Quantity::new(1.000, 3));
//!
//! // Snap to the instrument's tick size
//! let config = InstrumentConfig::btcusdt_binance();
//! let bid = config.make_price(50_000.126).unwrap();
//! let size = config.make_qty(0.25).unwrap();
//! println!("Bid {} x {} = {}", bid, size, bid.checked_mul_qty(size).unwrap());
//! ```

pub mod domain;
pub mod ffi;
pub mod numeric;

#[cfg(feature = "logging")]
pub mod logging;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::InstrumentConfig;
    pub use crate::ffi::{new_price, new_qty};
    pub use crate::numeric::{
        NumericError, NumericResult, Price, Quantity, MAX_PRECISION, PRICE_MAX, PRICE_MIN,
        QUANTITY_MAX, QUANTITY_MIN,
    };
}
