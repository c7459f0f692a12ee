// ============================================================================
// Instrument Configuration
// Per-instrument precision, increments and limits for prices and sizes
// ============================================================================

use crate::numeric::fixed::div_round_half_away;
use crate::numeric::{NumericError, NumericResult, Price, Quantity, MAX_PRECISION};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Quantisation rules for one tradable instrument.
///
/// Every price and size the venue accepts is expressed at the configured
/// precision and, when an increment is set, as a whole multiple of it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstrumentConfig {
    /// The trading instrument (e.g., "BTC/USDT.BINANCE", "AUD/USD.SIM")
    pub instrument: String,

    /// Decimal places for prices
    pub price_precision: usize,

    /// Decimal places for order sizes
    pub size_precision: usize,

    /// Optional: Minimum price increment (tick size)
    pub price_increment: Option<Price>,

    /// Optional: Minimum size increment
    pub size_increment: Option<Quantity>,

    /// Optional: Standard lot size
    pub lot_size: Option<Quantity>,

    pub min_quantity: Option<Quantity>,
    pub max_quantity: Option<Quantity>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
}

impl InstrumentConfig {
    /// Create a new configuration with required parameters
    pub fn new(instrument: String, price_precision: usize, size_precision: usize) -> Self {
        Self {
            instrument,
            price_precision,
            size_precision,
            price_increment: None,
            size_increment: None,
            lot_size: None,
            min_quantity: None,
            max_quantity: None,
            min_price: None,
            max_price: None,
        }
    }

    /// Builder method: Set price increment (tick size)
    pub fn with_price_increment(mut self, increment: Price) -> Self {
        self.price_increment = Some(increment);
        self
    }

    /// Builder method: Set size increment
    pub fn with_size_increment(mut self, increment: Quantity) -> Self {
        self.size_increment = Some(increment);
        self
    }

    /// Builder method: Set lot size
    pub fn with_lot_size(mut self, lot: Quantity) -> Self {
        self.lot_size = Some(lot);
        self
    }

    /// Builder method: Set quantity limits
    pub fn with_quantity_limits(mut self, min: Option<Quantity>, max: Option<Quantity>) -> Self {
        self.min_quantity = min;
        self.max_quantity = max;
        self
    }

    /// Builder method: Set price limits
    pub fn with_price_limits(mut self, min: Option<Price>, max: Option<Price>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.instrument.is_empty() {
            return Err("Instrument cannot be empty".to_string());
        }

        if self.price_precision > MAX_PRECISION {
            return Err(format!(
                "Price precision cannot exceed {MAX_PRECISION}, was {}",
                self.price_precision
            ));
        }
        if self.size_precision > MAX_PRECISION {
            return Err(format!(
                "Size precision cannot exceed {MAX_PRECISION}, was {}",
                self.size_precision
            ));
        }

        if let Some(tick) = self.price_increment {
            if !tick.is_positive() {
                return Err("Price increment must be positive".to_string());
            }
            if tick.prec != self.price_precision {
                return Err(format!(
                    "Price increment precision {} does not match price precision {}",
                    tick.prec, self.price_precision
                ));
            }
        }

        if let Some(step) = self.size_increment {
            if !step.is_positive() {
                return Err("Size increment must be positive".to_string());
            }
            if step.prec != self.size_precision {
                return Err(format!(
                    "Size increment precision {} does not match size precision {}",
                    step.prec, self.size_precision
                ));
            }
        }

        if let Some(lot) = self.lot_size {
            if !lot.is_positive() {
                return Err("Lot size must be positive".to_string());
            }
        }

        if let (Some(min), Some(max)) = (self.min_quantity, self.max_quantity) {
            if min > max {
                return Err(format!("Minimum quantity {min} exceeds maximum {max}"));
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(format!("Minimum price {min} exceeds maximum {max}"));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Value Construction
    // ========================================================================

    /// Builds a price at this instrument's precision, snapped to the price increment.
    ///
    /// # Errors
    /// - Any conversion error of [`Price::new_checked`]
    /// - `ScaleMismatch` if the increment is not a whole number of units at the
    ///   price precision
    /// - `OutOfRange` if snapping to the increment leaves the representable range
    pub fn make_price(&self, value: f64) -> NumericResult<Price> {
        let price = Price::new_checked(value, self.price_precision)?;
        match self.price_increment {
            Some(tick) if tick.is_positive() => {
                let snapped = tick.rescale(self.price_precision)?;
                if !snapped.is_positive() || snapped != tick {
                    return Err(NumericError::ScaleMismatch);
                }
                let raw = snap_to_increment(price.value as i128, snapped.value as i128);
                let raw = i64::try_from(raw).map_err(|_| NumericError::OutOfRange)?;
                Price::from_raw(raw, self.price_precision)
            },
            _ => Ok(price),
        }
    }

    /// Builds a quantity at this instrument's size precision, snapped to the size increment.
    ///
    /// # Errors
    /// - Any conversion error of [`Quantity::new_checked`]
    /// - `ScaleMismatch` if the increment is not a whole number of units at the
    ///   size precision
    /// - `OutOfRange` if snapping to the increment leaves the representable range
    pub fn make_qty(&self, value: f64) -> NumericResult<Quantity> {
        let qty = Quantity::new_checked(value, self.size_precision)?;
        match self.size_increment {
            Some(step) if step.is_positive() => {
                let snapped = step.rescale(self.size_precision)?;
                if !snapped.is_positive() || snapped != step {
                    return Err(NumericError::ScaleMismatch);
                }
                let raw = snap_to_increment(qty.value as i128, snapped.value as i128);
                let raw = u64::try_from(raw).map_err(|_| NumericError::OutOfRange)?;
                Quantity::from_raw(raw, self.size_precision)
            },
            _ => Ok(qty),
        }
    }

    /// Checks a price against the configured limits.
    pub fn check_price(&self, price: &Price) -> Result<(), String> {
        let result = if price.is_undefined() {
            Err("Price is undefined".to_string())
        } else if self.min_price.is_some_and(|min| *price < min) {
            Err(format!("Price {price} below minimum for {}", self.instrument))
        } else if self.max_price.is_some_and(|max| *price > max) {
            Err(format!("Price {price} above maximum for {}", self.instrument))
        } else {
            Ok(())
        };

        if let Err(reason) = &result {
            tracing::debug!(instrument = %self.instrument, "{}", reason);
        }
        result
    }

    /// Checks a quantity against the configured limits.
    pub fn check_quantity(&self, qty: &Quantity) -> Result<(), String> {
        let result = if qty.is_undefined() {
            Err("Quantity is undefined".to_string())
        } else if self.min_quantity.is_some_and(|min| *qty < min) {
            Err(format!("Quantity {qty} below minimum for {}", self.instrument))
        } else if self.max_quantity.is_some_and(|max| *qty > max) {
            Err(format!("Quantity {qty} above maximum for {}", self.instrument))
        } else {
            Ok(())
        };

        if let Err(reason) = &result {
            tracing::debug!(instrument = %self.instrument, "{}", reason);
        }
        result
    }
}

/// Rounds `raw` to the nearest multiple of `increment`, ties away from zero.
fn snap_to_increment(raw: i128, increment: i128) -> i128 {
    div_round_half_away(raw, increment) * increment
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl InstrumentConfig {
    /// Binance BTC/USDT spot
    /// - Price precision 2, tick $0.01
    /// - Size precision 6
    pub fn btcusdt_binance() -> Self {
        Self::new("BTC/USDT.BINANCE".to_string(), 2, 6)
            .with_price_increment(Price { value: 1, prec: 2 })
            .with_size_increment(Quantity { value: 1, prec: 6 })
            .with_quantity_limits(
                Some(Quantity { value: 1, prec: 6 }),
                Some(Quantity {
                    value: 9_000_000_000,
                    prec: 6,
                }),
            )
            .with_price_limits(
                Some(Price { value: 1, prec: 2 }),
                Some(Price {
                    value: 100_000_000,
                    prec: 2,
                }),
            )
    }

    /// Binance ADA/BTC spot
    /// - Price and size precision 8
    pub fn adabtc_binance() -> Self {
        Self::new("ADA/BTC.BINANCE".to_string(), 8, 8)
            .with_price_increment(Price { value: 1, prec: 8 })
            .with_size_increment(Quantity { value: 1, prec: 8 })
            .with_quantity_limits(
                Some(Quantity { value: 1, prec: 0 }),
                Some(Quantity {
                    value: 90_000_000,
                    prec: 0,
                }),
            )
            .with_price_limits(
                Some(Price { value: 1, prec: 8 }),
                Some(Price {
                    value: 100_000_000_000,
                    prec: 8,
                }),
            )
    }

    /// Simulated FX spot pair such as "AUDUSD" or "USDJPY"
    /// - Price precision 3 for JPY quoted pairs, 5 otherwise
    /// - Whole-unit sizes in lots of 1,000
    pub fn default_fx_ccy(symbol: &str) -> Result<Self, String> {
        if !(6..=7).contains(&symbol.len()) || !symbol.is_ascii() {
            return Err(format!("FX symbol must be 6 or 7 ASCII characters, was '{symbol}'"));
        }

        let base = &symbol[..3];
        let quote = &symbol[symbol.len() - 3..];
        let price_precision = if quote == "JPY" { 3 } else { 5 };

        Ok(Self::new(format!("{base}/{quote}.SIM"), price_precision, 0)
            .with_price_increment(Price {
                value: 1,
                prec: price_precision,
            })
            .with_size_increment(Quantity { value: 1, prec: 0 })
            .with_lot_size(Quantity {
                value: 1_000,
                prec: 0,
            })
            .with_quantity_limits(
                Some(Quantity {
                    value: 1_000,
                    prec: 0,
                }),
                Some(Quantity {
                    value: 10_000_000,
                    prec: 0,
                }),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = InstrumentConfig::new("ETH/USD.SIM".to_string(), 2, 4);

        assert_eq!(config.instrument, "ETH/USD.SIM");
        assert_eq!(config.price_precision, 2);
        assert_eq!(config.size_precision, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = InstrumentConfig::new("ES.CME".to_string(), 2, 0)
            .with_price_increment(Price::new(0.25, 2))
            .with_lot_size(Quantity::new(1.0, 0));

        assert_eq!(config.price_increment, Some(Price::new(0.25, 2)));
        assert_eq!(config.lot_size, Some(Quantity::new(1.0, 0)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let config = InstrumentConfig::new("".to_string(), 2, 2);
        assert!(config.validate().is_err());

        let config = InstrumentConfig::new("X".to_string(), MAX_PRECISION + 1, 2);
        assert!(config.validate().unwrap_err().contains("Price precision"));

        let config = InstrumentConfig::new("X".to_string(), 2, 2)
            .with_price_increment(Price::new(0.001, 3));
        assert!(config.validate().unwrap_err().contains("does not match"));

        let config =
            InstrumentConfig::new("X".to_string(), 2, 2).with_size_increment(Quantity::zero(2).unwrap());
        assert!(config.validate().unwrap_err().contains("must be positive"));

        let config = InstrumentConfig::new("X".to_string(), 2, 2).with_quantity_limits(
            Some(Quantity::new(10.0, 2)),
            Some(Quantity::new(1.0, 2)),
        );
        assert!(config.validate().unwrap_err().contains("Minimum quantity"));
    }

    #[test]
    fn test_make_with_increment_finer_than_precision() {
        let config = InstrumentConfig::new("X".to_string(), 2, 2)
            .with_price_increment(Price::new(0.001, 3));
        assert_eq!(config.make_price(1.0), Err(NumericError::ScaleMismatch));

        let config = InstrumentConfig::new("X".to_string(), 2, 2)
            .with_size_increment(Quantity::new(0.004, 3));
        assert_eq!(config.make_qty(1.0), Err(NumericError::ScaleMismatch));

        // Finer but rounding to a non-zero step is still not a whole multiple
        let config = InstrumentConfig::new("X".to_string(), 2, 2)
            .with_price_increment(Price::new(0.015, 3));
        assert_eq!(config.make_price(1.0), Err(NumericError::ScaleMismatch));

        // Written at a finer precision but exact at the configured one
        let config = InstrumentConfig::new("X".to_string(), 2, 2)
            .with_price_increment(Price::new(0.050, 3))
            .with_size_increment(Quantity::new(0.5, 1));
        assert_eq!(config.make_price(1.02).unwrap(), Price::new(1.0, 2));
        assert_eq!(config.make_price(1.02).unwrap().prec, 2);
        assert_eq!(config.make_qty(1.3).unwrap(), Quantity::new(1.5, 2));
    }

    #[test]
    fn test_make_snapped_past_range() {
        let config = InstrumentConfig::new("X".to_string(), 0, 0)
            .with_price_increment(Price::from_int(5_000_000_000).unwrap())
            .with_size_increment(Quantity::from_int(10_000_000_000).unwrap());

        assert_eq!(config.make_price(9_000_000_000.0), Err(NumericError::OutOfRange));
        assert_eq!(config.make_price(7_000_000_000.0).unwrap().value, 5_000_000_000);
        assert_eq!(config.make_qty(16_000_000_000.0), Err(NumericError::OutOfRange));
    }

    #[test]
    fn test_make_price_snaps_to_increment() {
        let config = InstrumentConfig::new("ES.CME".to_string(), 2, 0)
            .with_price_increment(Price::new(0.25, 2));

        assert_eq!(config.make_price(4500.10).unwrap(), Price::new(4500.0, 2));
        assert_eq!(config.make_price(4500.13).unwrap(), Price::new(4500.25, 2));
        assert_eq!(config.make_price(-1.37).unwrap(), Price::new(-1.25, 2));
        assert_eq!(config.make_price(4500.10).unwrap().prec, 2);
    }

    #[test]
    fn test_make_price_without_increment() {
        let config = InstrumentConfig::new("X".to_string(), 3, 0);
        let price = config.make_price(1.23456).unwrap();
        assert_eq!(price.value, 1_235);
        assert_eq!(price.prec, 3);

        assert_eq!(config.make_price(f64::NAN), Err(NumericError::NonFinite));
    }

    #[test]
    fn test_make_qty() {
        let config = InstrumentConfig::new("X".to_string(), 2, 3)
            .with_size_increment(Quantity::new(0.005, 3));

        let qty = config.make_qty(1.2374).unwrap();
        assert_eq!(qty.value, 1_235);
        assert_eq!(qty.prec, 3);

        assert_eq!(config.make_qty(-1.0), Err(NumericError::Negative));
    }

    #[test]
    fn test_check_limits() {
        let config = InstrumentConfig::btcusdt_binance();

        assert!(config.check_price(&Price::new(50_000.0, 2)).is_ok());
        assert!(config.check_price(&Price::new(2_000_000.0, 2)).is_err());
        assert!(config.check_price(&Price::undefined()).is_err());

        assert!(config.check_quantity(&Quantity::new(0.5, 6)).is_ok());
        assert!(config.check_quantity(&Quantity::new(9_000.000_001, 6)).is_err());
        assert!(config.check_quantity(&Quantity::zero(6).unwrap()).is_err());
    }

    #[test]
    fn test_preset_configs() {
        let btc = InstrumentConfig::btcusdt_binance();
        assert!(btc.validate().is_ok());
        assert_eq!(btc.make_price(50_000.123).unwrap().to_string(), "50000.12");

        let ada = InstrumentConfig::adabtc_binance();
        assert!(ada.validate().is_ok());
        assert_eq!(ada.make_qty(1.5).unwrap().to_string(), "1.50000000");

        let usdjpy = InstrumentConfig::default_fx_ccy("USDJPY").unwrap();
        assert_eq!(usdjpy.instrument, "USD/JPY.SIM");
        assert_eq!(usdjpy.price_precision, 3);
        assert!(usdjpy.validate().is_ok());

        let audusd = InstrumentConfig::default_fx_ccy("AUDUSD").unwrap();
        assert_eq!(audusd.price_precision, 5);
        assert_eq!(audusd.make_price(0.712345).unwrap().to_string(), "0.71235");

        assert!(InstrumentConfig::default_fx_ccy("AUD").is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let config = InstrumentConfig::btcusdt_binance();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"price_increment\":\"0.01\""));

        let back: InstrumentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
