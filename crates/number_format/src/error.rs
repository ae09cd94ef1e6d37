use thiserror::Error;

/// Problems found while checking a [`NumberFormatOptions`](crate::NumberFormatOptions) record.
///
/// Formatting itself never fails; these are reported by
/// [`NumberFormatOptions::validate`](crate::NumberFormatOptions::validate) so
/// configuration layers can reject bad input early.
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatOptionsError {
    #[error("The currency style requires a currency code.")]
    MissingCurrency,
    #[error("'{0}' is not a well-formed ISO 4217 currency code.")]
    InvalidCurrencyCode(String),
    #[error("{name} must be within {min}..={max}, got {value}.")]
    DigitsOutOfRange {
        name: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },
    #[error("minimumFractionDigits ({min}) is greater than maximumFractionDigits ({max}).")]
    FractionDigitsOrder { min: u8, max: u8 },
}
