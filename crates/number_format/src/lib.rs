#![warn(missing_docs)]

//! Locale-aware number formatting, parsing and step validation.
//!
//! This crate holds the GPUI-independent half of the number field: it knows
//! how to render an `f64` the way a locale expects it, how to read one back
//! from text written in Latin, Arabic-indic or Han numerals, and how to snap a
//! raw value onto a `[min, max]` step lattice without floating-point drift.

/// Shared formatter cache keyed by locale and serialized options.
pub mod cache;

/// Intl-style number formatter producing strings and typed parts.
pub mod format;

/// Numeral scripts, numbering systems and per-locale symbol data.
pub mod locale;

/// Formatting options record.
pub mod options;

/// Text to number conversion.
pub mod parse;

/// Clamping, step quantization and floating-point correction.
pub mod validate;

mod error;
pub use error::*;

pub use cache::NumberFormatCache;
pub use format::{NumberFormatter, NumberPart, NumberPartKind, NumberParts, format_number};
pub use locale::{LocaleSymbols, NumeralScript, NumberingSystem};
pub use options::{CurrencyDisplay, NumberFormatOptions, NumberStyle, SignDisplay};
pub use parse::parse_number;
pub use validate::{
    DEFAULT_STEP, MAX_SAFE_INTEGER, MIN_SAFE_INTEGER, StepConfig, remove_floating_point_errors,
    validate_value,
};

/// Locale used when a caller does not provide one.
pub const DEFAULT_LOCALE: &str = "en-US";
