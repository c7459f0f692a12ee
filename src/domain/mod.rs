// ============================================================================
// Domain Models Module
// Instrument-level rules built on top of the numeric value types
// ============================================================================

pub mod config;

pub use config::InstrumentConfig;
