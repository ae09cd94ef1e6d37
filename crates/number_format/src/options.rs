use serde::{Deserialize, Serialize};

use crate::FormatOptionsError;

/// Upper bound Intl places on fraction digit options.
pub const MAX_FRACTION_DIGITS: u8 = 100;

/// Significant digits kept when removing binary floating-point noise.
pub(crate) const ROUND_TRIP_SIGNIFICANT_DIGITS: u8 = 15;

/// How the number is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberStyle {
    /// Plain decimal number.
    #[default]
    Decimal,
    /// Monetary amount; requires [`NumberFormatOptions::currency`].
    Currency,
    /// The value multiplied by 100 and followed by a percent glyph.
    Percent,
}

/// How a currency is labelled when [`NumberStyle::Currency`] is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CurrencyDisplay {
    /// Localized symbol, e.g. `US$` outside of English locales.
    #[default]
    Symbol,
    /// Shortest symbol, e.g. `$`.
    NarrowSymbol,
    /// ISO 4217 code, e.g. `USD`.
    Code,
}

/// When to show a sign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignDisplay {
    /// Negative numbers only (negative zero included).
    #[default]
    Auto,
    /// Always, including `+0`.
    Always,
    /// Positive and negative numbers, but never for zero.
    ExceptZero,
    /// Never.
    Never,
}

/// Formatting options, modelled on `Intl.NumberFormat` options.
///
/// The record serializes with Intl's camelCase key names so it can be shared
/// with JSON configuration as-is. Options are treated as immutable once handed
/// to a formatter; the serialized form is the formatter cache key.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberFormatOptions {
    pub style: NumberStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub currency_display: CurrencyDisplay,
    pub use_grouping: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_integer_digits: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_fraction_digits: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_fraction_digits: Option<u8>,
    /// When set together with `maximum_fraction_digits`, the stricter of the two wins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_significant_digits: Option<u8>,
    pub sign_display: SignDisplay,
}

impl Default for NumberFormatOptions {
    fn default() -> Self {
        Self {
            style: NumberStyle::Decimal,
            currency: None,
            currency_display: CurrencyDisplay::Symbol,
            use_grouping: true,
            minimum_integer_digits: None,
            minimum_fraction_digits: None,
            maximum_fraction_digits: None,
            maximum_significant_digits: None,
            sign_display: SignDisplay::Auto,
        }
    }
}

#[allow(missing_docs)]
impl NumberFormatOptions {
    pub fn decimal() -> Self {
        Self::default()
    }

    pub fn percent() -> Self {
        Self {
            style: NumberStyle::Percent,
            ..Self::default()
        }
    }

    pub fn currency(code: impl Into<String>) -> Self {
        Self {
            style: NumberStyle::Currency,
            currency: Some(code.into()),
            ..Self::default()
        }
    }

    pub fn currency_display(mut self, display: CurrencyDisplay) -> Self {
        self.currency_display = display;
        self
    }

    pub fn use_grouping(mut self, use_grouping: bool) -> Self {
        self.use_grouping = use_grouping;
        self
    }

    pub fn minimum_integer_digits(mut self, digits: u8) -> Self {
        self.minimum_integer_digits = Some(digits);
        self
    }

    pub fn minimum_fraction_digits(mut self, digits: u8) -> Self {
        self.minimum_fraction_digits = Some(digits);
        self
    }

    pub fn maximum_fraction_digits(mut self, digits: u8) -> Self {
        self.maximum_fraction_digits = Some(digits);
        self
    }

    pub fn maximum_significant_digits(mut self, digits: u8) -> Self {
        self.maximum_significant_digits = Some(digits);
        self
    }

    pub fn sign_display(mut self, sign_display: SignDisplay) -> Self {
        self.sign_display = sign_display;
        self
    }

    /// Checks the record the way `Intl.NumberFormat` would reject it.
    pub fn validate(&self) -> Result<(), FormatOptionsError> {
        if self.style == NumberStyle::Currency && self.currency.is_none() {
            return Err(FormatOptionsError::MissingCurrency);
        }

        if let Some(code) = &self.currency {
            if !is_well_formed_currency_code(code) {
                return Err(FormatOptionsError::InvalidCurrencyCode(code.clone()));
            }
        }

        check_range("minimumIntegerDigits", self.minimum_integer_digits, 1, 21)?;
        check_range(
            "minimumFractionDigits",
            self.minimum_fraction_digits,
            0,
            MAX_FRACTION_DIGITS,
        )?;
        check_range(
            "maximumFractionDigits",
            self.maximum_fraction_digits,
            0,
            MAX_FRACTION_DIGITS,
        )?;
        check_range(
            "maximumSignificantDigits",
            self.maximum_significant_digits,
            1,
            21,
        )?;

        if let (Some(min), Some(max)) = (self.minimum_fraction_digits, self.maximum_fraction_digits)
        {
            if min > max {
                return Err(FormatOptionsError::FractionDigitsOrder { min, max });
            }
        }

        Ok(())
    }

    /// Whether values formatted with these options can carry a fractional part.
    pub fn allows_fraction(&self) -> bool {
        match self.maximum_fraction_digits {
            Some(digits) => digits > 0,
            None => self.style != NumberStyle::Percent,
        }
    }

    /// Stable serialization used as the formatter cache key.
    pub fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }

    /// Options for the ungrouped `en-US` format/parse round trip that strips
    /// binary representation noise from a computed value.
    pub(crate) fn round_trip(&self) -> Self {
        let fraction_digits = self.maximum_fraction_digits.map(|digits| {
            if self.style == NumberStyle::Percent {
                digits.saturating_add(2).min(MAX_FRACTION_DIGITS)
            } else {
                digits
            }
        });

        Self {
            use_grouping: false,
            maximum_fraction_digits: Some(fraction_digits.unwrap_or(MAX_FRACTION_DIGITS)),
            maximum_significant_digits: Some(ROUND_TRIP_SIGNIFICANT_DIGITS),
            ..Self::default()
        }
    }
}

fn is_well_formed_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

fn check_range(
    name: &'static str,
    value: Option<u8>,
    min: u8,
    max: u8,
) -> Result<(), FormatOptionsError> {
    match value {
        Some(value) if value < min || value > max => {
            Err(FormatOptionsError::DigitsOutOfRange {
                name,
                value,
                min,
                max,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_validate() {
        assert_eq!(NumberFormatOptions::default().validate(), Ok(()));
        assert!(NumberFormatOptions::default().use_grouping);
    }

    #[test]
    fn test_currency_style_requires_code() {
        let options = NumberFormatOptions {
            style: NumberStyle::Currency,
            ..Default::default()
        };
        assert_eq!(
            options.validate(),
            Err(FormatOptionsError::MissingCurrency)
        );
    }

    #[test]
    fn test_currency_code_must_be_well_formed() {
        assert_eq!(
            NumberFormatOptions::currency("US").validate(),
            Err(FormatOptionsError::InvalidCurrencyCode("US".into()))
        );
        assert_eq!(NumberFormatOptions::currency("eur").validate(), Ok(()));
    }

    #[test]
    fn test_fraction_digit_order() {
        let options = NumberFormatOptions::default()
            .minimum_fraction_digits(4)
            .maximum_fraction_digits(2);
        assert_eq!(
            options.validate(),
            Err(FormatOptionsError::FractionDigitsOrder { min: 4, max: 2 })
        );
    }

    #[test]
    fn test_significant_digits_range() {
        let options = NumberFormatOptions::default().maximum_significant_digits(0);
        assert!(matches!(
            options.validate(),
            Err(FormatOptionsError::DigitsOutOfRange {
                name: "maximumSignificantDigits",
                ..
            })
        ));
    }

    #[test]
    fn test_json_uses_intl_key_names() {
        let options: NumberFormatOptions = serde_json::from_str(
            r#"{ "style": "currency", "currency": "EUR", "maximumFractionDigits": 2 }"#,
        )
        .unwrap();
        assert_eq!(options.style, NumberStyle::Currency);
        assert_eq!(options.currency.as_deref(), Some("EUR"));
        assert_eq!(options.maximum_fraction_digits, Some(2));
        assert!(options.use_grouping, "Missing keys fall back to defaults");

        let key = options.cache_key();
        assert!(key.contains("\"maximumFractionDigits\":2"));
        assert!(!key.contains("minimumFractionDigits"));
    }

    #[test]
    fn test_cache_key_is_stable() {
        let a = NumberFormatOptions::percent().maximum_fraction_digits(1);
        let b = NumberFormatOptions::percent().maximum_fraction_digits(1);
        assert_eq!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), NumberFormatOptions::percent().cache_key());
    }

    #[test]
    fn test_round_trip_options_widen_percent_digits() {
        let options = NumberFormatOptions::percent().maximum_fraction_digits(1);
        let round_trip = options.round_trip();
        assert_eq!(round_trip.style, NumberStyle::Decimal);
        assert_eq!(round_trip.maximum_fraction_digits, Some(3));
        assert!(!round_trip.use_grouping);

        let unbounded = NumberFormatOptions::default().round_trip();
        assert_eq!(unbounded.maximum_fraction_digits, Some(MAX_FRACTION_DIGITS));
        assert_eq!(
            unbounded.maximum_significant_digits,
            Some(ROUND_TRIP_SIGNIFICANT_DIGITS)
        );
    }

    #[test]
    fn test_allows_fraction() {
        assert!(NumberFormatOptions::default().allows_fraction());
        assert!(!NumberFormatOptions::default().maximum_fraction_digits(0).allows_fraction());
        assert!(!NumberFormatOptions::percent().allows_fraction());
    }
}
