// ============================================================================
// Basic Usage Example
// ============================================================================
//
// Run with: cargo run --example basic_usage --features logging
// Set RUST_LOG=nautilus_model=debug to see limit-check rejections.

use nautilus_model::logging::init_logging;
use nautilus_model::prelude::*;

fn main() {
    init_logging("nautilus_model=warn");

    println!("=== Fixed-Precision Value Types ===\n");

    // Native constructors round half away from zero
    let price = Price::new(101.255, 2);
    let qty = Quantity::new(0.125, 2);
    println!("Price: {} (mantissa={}, prec={})", price, price.value, price.prec);
    println!("Qty:   {} (mantissa={}, prec={})", qty, qty.value, qty.prec);

    // The C entry points return the undefined sentinel instead of failing
    let bad = new_qty(-5.0, 2);
    println!("new_qty(-5.0, 2) -> {} (undefined={})", bad, bad.is_undefined());

    // Instruments snap values to their tick and lot increments
    println!("\n=== Instruments ===");
    let instruments = [
        InstrumentConfig::btcusdt_binance(),
        InstrumentConfig::adabtc_binance(),
        InstrumentConfig::default_fx_ccy("USDJPY").expect("valid FX symbol"),
        InstrumentConfig::default_fx_ccy("AUDUSD").expect("valid FX symbol"),
    ];

    for config in &instruments {
        if let Err(reason) = config.validate() {
            println!("{}: invalid config: {}", config.instrument, reason);
            continue;
        }

        let bid = config.make_price(1.234_567_891);
        let size = config.make_qty(1_500.75);
        match (bid, size) {
            (Ok(bid), Ok(size)) => {
                let limits = config.check_quantity(&size);
                println!(
                    "{:<18} bid={:<12} size={:<16} limits={}",
                    config.instrument,
                    bid.to_string(),
                    size.to_string(),
                    if limits.is_ok() { "ok" } else { "rejected" }
                );
            },
            (Err(e), _) | (_, Err(e)) => println!("{}: {}", config.instrument, e),
        }
    }

    // Fill accounting
    println!("\n=== Fill Accounting ===");
    let config = InstrumentConfig::btcusdt_binance();
    let order_qty = Quantity::new(1.5, 6);
    let mut leaves = order_qty;
    for fill in [0.4, 0.35, 0.9] {
        let fill = match config.make_qty(fill) {
            Ok(fill) => fill,
            Err(e) => {
                println!("bad fill: {}", e);
                continue;
            },
        };
        leaves = match leaves.saturating_sub(fill) {
            Ok(remaining) => remaining,
            Err(e) => {
                println!("cannot apply fill: {}", e);
                break;
            },
        };
        println!("filled {:<10} leaves {}", fill.to_string(), leaves);
    }
}
