// ============================================================================
// FFI Bindings
// C-compatible constructors and accessors for Price and Quantity
// ============================================================================
//
// The declarations in `include/nautilus_model.h` mirror this module. Nothing
// here unwinds across the boundary: a conversion that cannot be represented
// returns the undefined sentinel (value = MAX, prec = 0) and logs the cause.

use crate::numeric::fixed::check_precision;
use crate::numeric::{Price, Quantity};

/// Creates a `Price` from a double, rounding half away from zero to `prec` places.
///
/// Returns the undefined price (`PRICE_UNDEF`, precision 0) if `value` is not
/// finite, `prec` exceeds 9, or `value` is out of range.
#[no_mangle]
pub extern "C" fn new_price(value: f64, prec: usize) -> Price {
    match Price::new_checked(value, prec) {
        Ok(price) => price,
        Err(e) => {
            tracing::error!(value, prec, error = %e, "new_price rejected input");
            Price::undefined()
        },
    }
}

/// Creates a `Quantity` from a double, rounding half away from zero to `prec` places.
///
/// Returns the undefined quantity (`QUANTITY_UNDEF`, precision 0) if `value`
/// is negative, not finite, out of range, or `prec` exceeds 9.
#[no_mangle]
pub extern "C" fn new_qty(value: f64, prec: usize) -> Quantity {
    match Quantity::new_checked(value, prec) {
        Ok(qty) => qty,
        Err(e) => {
            tracing::error!(value, prec, error = %e, "new_qty rejected input");
            Quantity::undefined()
        },
    }
}

/// Creates a `Price` from a mantissa. Invalid input yields the undefined price.
#[no_mangle]
pub extern "C" fn price_from_raw(value: i64, prec: usize) -> Price {
    Price::from_raw(value, prec).unwrap_or_else(|e| {
        tracing::error!(value, prec, error = %e, "price_from_raw rejected input");
        Price::undefined()
    })
}

/// Creates a `Quantity` from a mantissa. Invalid input yields the undefined quantity.
#[no_mangle]
pub extern "C" fn qty_from_raw(value: u64, prec: usize) -> Quantity {
    Quantity::from_raw(value, prec).unwrap_or_else(|e| {
        tracing::error!(value, prec, error = %e, "qty_from_raw rejected input");
        Quantity::undefined()
    })
}

/// Returns the price as a double, or NaN if `prec` exceeds 9.
#[no_mangle]
pub extern "C" fn price_as_f64(price: Price) -> f64 {
    if let Err(e) = check_precision(price.prec) {
        tracing::error!(
            value = price.value,
            prec = price.prec,
            error = %e,
            "price_as_f64 rejected input"
        );
        return f64::NAN;
    }
    price.as_f64()
}

/// Returns the quantity as a double, or NaN if `prec` exceeds 9.
#[no_mangle]
pub extern "C" fn qty_as_f64(qty: Quantity) -> f64 {
    if let Err(e) = check_precision(qty.prec) {
        tracing::error!(
            value = qty.value,
            prec = qty.prec,
            error = %e,
            "qty_as_f64 rejected input"
        );
        return f64::NAN;
    }
    qty.as_f64()
}

#[no_mangle]
pub extern "C" fn price_is_undefined(price: Price) -> bool {
    price.is_undefined()
}

#[no_mangle]
pub extern "C" fn qty_is_undefined(qty: Quantity) -> bool {
    qty.is_undefined()
}
