use smallvec::SmallVec;

use crate::{
    CurrencyDisplay, NumberFormatCache, NumberFormatOptions, NumberStyle, SignDisplay,
    locale::{LocaleData, LocaleTag, NumberingSystem},
};

const NO_BREAK_SPACE: &str = "\u{A0}";

/// Largest value whose half-way ties are detected exactly when rounding.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// The role a piece of formatted output plays, like `Intl.NumberFormat#formatToParts`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberPartKind {
    MinusSign,
    PlusSign,
    Integer,
    Group,
    Decimal,
    Fraction,
    PercentSign,
    Currency,
    Literal,
    Nan,
    Infinity,
}

/// A typed slice of formatted output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberPart {
    /// What the slice represents.
    pub kind: NumberPartKind,
    /// The text, already transliterated into the locale's numbering system.
    pub value: String,
}

impl NumberPart {
    fn new(kind: NumberPartKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Formatted output split into typed parts. Most numbers fit inline.
pub type NumberParts = SmallVec<[NumberPart; 8]>;

/// Fraction digit bounds after defaults and significant-digit limits are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FractionDigits {
    min: usize,
    max: usize,
}

/// Locale-aware number formatter.
///
/// Immutable once built. Obtain shared instances through
/// [`NumberFormatCache::get_formatter`] rather than building one per call.
#[derive(Debug, Clone)]
pub struct NumberFormatter {
    locale: String,
    options: NumberFormatOptions,
    data: LocaleData,
    fraction: FractionDigits,
    currency_symbol: Option<String>,
}

impl NumberFormatter {
    /// Builds a formatter. Options are used as given; invalid combinations
    /// are resolved leniently rather than rejected.
    pub fn new(locale: impl Into<String>, options: NumberFormatOptions) -> Self {
        let locale = locale.into();
        let data = LocaleData::for_locale(&locale);
        let fraction = resolve_fraction_digits(&options);
        let currency_symbol = match (options.style, options.currency.as_deref()) {
            (NumberStyle::Currency, Some(code)) => {
                Some(currency_symbol(code, options.currency_display, &locale))
            }
            _ => None,
        };

        Self {
            locale,
            options,
            data,
            fraction,
            currency_symbol,
        }
    }

    /// The locale tag the formatter was built for.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The options the formatter was built with.
    pub fn options(&self) -> &NumberFormatOptions {
        &self.options
    }

    /// The numbering system digits are written in.
    pub fn numbering_system(&self) -> NumberingSystem {
        self.data.numbering
    }

    /// Formats `value` into a single string.
    pub fn format(&self, value: f64) -> String {
        self.format_to_parts(value)
            .into_iter()
            .map(|part| part.value)
            .collect()
    }

    /// Formats `value` into typed parts.
    pub fn format_to_parts(&self, value: f64) -> NumberParts {
        let mut parts = NumberParts::new();

        if value.is_nan() {
            parts.push(NumberPart::new(NumberPartKind::Nan, "NaN"));
            return parts;
        }

        let negative = value.is_sign_negative();
        let mut magnitude = value.abs();
        if self.options.style == NumberStyle::Percent {
            magnitude *= 100.0;
        }

        let (integer, fraction) = if magnitude.is_finite() {
            self.digits(magnitude)
        } else {
            (String::new(), String::new())
        };
        let is_zero = magnitude.is_finite()
            && integer.chars().chain(fraction.chars()).all(|c| c == '0');

        let sign = match self.options.sign_display {
            SignDisplay::Auto => negative.then_some(NumberPartKind::MinusSign),
            SignDisplay::Always if negative => Some(NumberPartKind::MinusSign),
            SignDisplay::Always => Some(NumberPartKind::PlusSign),
            SignDisplay::ExceptZero if is_zero => None,
            SignDisplay::ExceptZero if negative => Some(NumberPartKind::MinusSign),
            SignDisplay::ExceptZero => Some(NumberPartKind::PlusSign),
            SignDisplay::Never => None,
        };

        if let Some(kind) = sign {
            let glyph = match kind {
                NumberPartKind::MinusSign => self.data.minus,
                _ => "+",
            };
            parts.push(NumberPart::new(kind, glyph));
        }

        let currency_after = self.data.currency_after;
        if let Some(symbol) = self.currency_symbol.as_ref().filter(|_| !currency_after) {
            parts.push(NumberPart::new(NumberPartKind::Currency, symbol.clone()));
            if self.options.currency_display == CurrencyDisplay::Code {
                parts.push(NumberPart::new(NumberPartKind::Literal, NO_BREAK_SPACE));
            }
        }

        if magnitude.is_finite() {
            self.push_number(&mut parts, &integer, &fraction);
        } else {
            parts.push(NumberPart::new(NumberPartKind::Infinity, "\u{221E}"));
        }

        if let Some(symbol) = self.currency_symbol.as_ref().filter(|_| currency_after) {
            parts.push(NumberPart::new(NumberPartKind::Literal, NO_BREAK_SPACE));
            parts.push(NumberPart::new(NumberPartKind::Currency, symbol.clone()));
        }

        if self.options.style == NumberStyle::Percent {
            if self.data.percent_spacing {
                parts.push(NumberPart::new(NumberPartKind::Literal, NO_BREAK_SPACE));
            }
            parts.push(NumberPart::new(
                NumberPartKind::PercentSign,
                self.data.percent,
            ));
        }

        parts
    }

    /// Rounds a finite, non-negative magnitude into ASCII integer and fraction digits.
    fn digits(&self, magnitude: f64) -> (String, String) {
        let FractionDigits { mut min, mut max } = self.fraction;
        let mut magnitude = magnitude;

        if let Some(significant) = self.options.maximum_significant_digits
            && magnitude != 0.0
        {
            let exponent = magnitude.log10().floor() as i32;
            let decimals = i32::from(significant) - 1 - exponent;
            if decimals < 0 {
                let scale = 10f64.powi(-decimals);
                magnitude = (magnitude / scale).round() * scale;
            }

            let significant_max = decimals.max(0) as usize;
            max = match self.options.maximum_fraction_digits {
                Some(_) => max.min(significant_max),
                None => significant_max,
            };
            min = min.min(max);
        }

        let rounded = round_half_expand(magnitude, max);
        let (integer, fraction) = rounded.split_once('.').unwrap_or((&rounded, ""));

        let mut fraction = fraction.to_string();
        while fraction.len() > min && fraction.ends_with('0') {
            fraction.pop();
        }

        let minimum_integer = self.options.minimum_integer_digits.unwrap_or(1) as usize;
        let mut integer = integer.to_string();
        if integer.len() < minimum_integer {
            integer.insert_str(0, &"0".repeat(minimum_integer - integer.len()));
        }

        (integer, fraction)
    }

    fn push_number(&self, parts: &mut NumberParts, integer: &str, fraction: &str) {
        let numbering = self.data.numbering;
        let grouped = self.options.use_grouping
            && integer.len() >= 3 + self.data.minimum_grouping_digits;

        if grouped {
            let head = integer.len() % 3;
            let mut groups = Vec::with_capacity(integer.len() / 3 + 1);
            if head > 0 {
                groups.push(&integer[..head]);
            }
            groups.extend(
                integer.as_bytes()[head..]
                    .chunks(3)
                    .filter_map(|chunk| std::str::from_utf8(chunk).ok()),
            );

            for (ix, group) in groups.into_iter().enumerate() {
                if ix > 0 {
                    parts.push(NumberPart::new(NumberPartKind::Group, self.data.group));
                }
                parts.push(NumberPart::new(
                    NumberPartKind::Integer,
                    numbering.transliterate(group),
                ));
            }
        } else {
            parts.push(NumberPart::new(
                NumberPartKind::Integer,
                numbering.transliterate(integer),
            ));
        }

        if !fraction.is_empty() {
            parts.push(NumberPart::new(NumberPartKind::Decimal, self.data.decimal));
            parts.push(NumberPart::new(
                NumberPartKind::Fraction,
                numbering.transliterate(fraction),
            ));
        }
    }
}

/// Formats `value` for display. `None` renders as an empty string.
pub fn format_number(value: Option<f64>, locale: &str, options: &NumberFormatOptions) -> String {
    match value {
        Some(value) => NumberFormatCache::global()
            .get_formatter(locale, options)
            .format(value),
        None => String::new(),
    }
}

fn resolve_fraction_digits(options: &NumberFormatOptions) -> FractionDigits {
    let (default_min, default_max) = match options.style {
        NumberStyle::Decimal => (0, 3),
        NumberStyle::Percent => (0, 0),
        NumberStyle::Currency => {
            let digits = options.currency.as_deref().map_or(2, currency_digits);
            (digits, digits)
        }
    };

    let min = options.minimum_fraction_digits.map(usize::from);
    let max = options.maximum_fraction_digits.map(usize::from);
    match (min, max) {
        (Some(min), Some(max)) => FractionDigits {
            min,
            max: max.max(min),
        },
        (Some(min), None) => FractionDigits {
            min,
            max: default_max.max(min),
        },
        (None, Some(max)) => FractionDigits {
            min: default_min.min(max),
            max,
        },
        (None, None) => FractionDigits {
            min: default_min,
            max: default_max,
        },
    }
}

/// Rounds to `decimals` places with ties going away from zero.
fn round_half_expand(magnitude: f64, decimals: usize) -> String {
    let formatted = format!("{magnitude:.decimals$}");
    if decimals > 22 {
        return formatted;
    }

    let scale = 10f64.powi(decimals as i32);
    let scaled = magnitude * scale;
    if scaled < EXACT_INTEGER_LIMIT && scaled - scaled.trunc() == 0.5 {
        let expanded = (scaled.trunc() + 1.0) / scale;
        return format!("{expanded:.decimals$}");
    }

    formatted
}

/// ISO 4217 minor unit digits.
pub(crate) fn currency_digits(code: &str) -> usize {
    match code.to_ascii_uppercase().as_str() {
        "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => 3,
        "BIF" | "CLP" | "DJF" | "GNF" | "ISK" | "JPY" | "KMF" | "KRW" | "PYG" | "RWF" | "UGX"
        | "UYI" | "VND" | "VUV" | "XAF" | "XOF" | "XPF" => 0,
        _ => 2,
    }
}

fn currency_symbol(code: &str, display: CurrencyDisplay, locale: &str) -> String {
    let code = code.to_ascii_uppercase();
    let narrow = display == CurrencyDisplay::NarrowSymbol;
    if display == CurrencyDisplay::Code {
        return code;
    }

    let language = LocaleTag::parse(locale).language;
    match code.as_str() {
        "USD" if narrow || matches!(language.as_str(), "en" | "ja" | "de" | "fr") => "$".into(),
        "USD" => "US$".into(),
        "EUR" => "\u{20AC}".into(),
        "GBP" => "\u{00A3}".into(),
        "JPY" | "CNY" => "\u{00A5}".into(),
        "KRW" => "\u{20A9}".into(),
        "INR" => "\u{20B9}".into(),
        "RUB" => "\u{20BD}".into(),
        "BRL" => "R$".into(),
        "CAD" | "AUD" | "NZD" | "HKD" | "SGD" | "MXN" | "ARS" | "CLP" | "COP" | "TWD" if narrow => {
            "$".into()
        }
        "TWD" => "NT$".into(),
        "CAD" | "AUD" | "NZD" | "HKD" | "SGD" | "MXN" | "ARS" | "CLP" | "COP" => {
            format!("{}$", &code[..2])
        }
        "SEK" | "NOK" | "DKK" | "ISK" | "CZK" => "kr".into(),
        "PLN" => "z\u{0142}".into(),
        "THB" => "\u{0E3F}".into(),
        "TRY" => "\u{20BA}".into(),
        "ILS" => "\u{20AA}".into(),
        "ZAR" => "R".into(),
        _ => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(locale: &str, options: NumberFormatOptions, value: f64) -> String {
        NumberFormatter::new(locale, options).format(value)
    }

    #[test]
    fn test_decimal_defaults() {
        let options = NumberFormatOptions::default;
        assert_eq!(format("en-US", options(), 1234.5678), "1,234.568");
        assert_eq!(format("en-US", options(), 0.0), "0");
        assert_eq!(format("en-US", options(), -12.5), "-12.5");
        assert_eq!(format("en-US", options(), 999.0), "999");
    }

    #[test]
    fn test_locale_separators() {
        let options = NumberFormatOptions::default;
        assert_eq!(format("de-DE", options(), 1234.56), "1.234,56");
        assert_eq!(format("fr-FR", options(), 1234.56), "1\u{202F}234,56");
        assert_eq!(format("ru", options(), 1234.56), "1\u{A0}234,56");
        assert_eq!(format("es-ES", options(), 1234.0), "1234", "Minimum grouping digits");
        assert_eq!(format("es-ES", options(), 12345.0), "12.345");
    }

    #[test]
    fn test_numbering_systems() {
        let options = NumberFormatOptions::default;
        assert_eq!(
            format("ar-EG", options(), 1234.56),
            "\u{0661}\u{066C}\u{0662}\u{0663}\u{0664}\u{066B}\u{0665}\u{0666}"
        );
        assert_eq!(
            format("zh-Hans-CN-u-nu-hanidec", options(), 1234.56),
            "一,二三四.五六"
        );
    }

    #[test]
    fn test_half_way_ties_round_away_from_zero() {
        let options = NumberFormatOptions::default().maximum_fraction_digits(2);
        assert_eq!(format("en-US", options.clone(), 0.125), "0.13");
        assert_eq!(format("en-US", options, -0.125), "-0.13");
        assert_eq!(
            format("en-US", NumberFormatOptions::default().maximum_fraction_digits(0), 2.5),
            "3"
        );
    }

    #[test]
    fn test_fraction_digit_bounds() {
        let options = NumberFormatOptions::default().minimum_fraction_digits(2);
        assert_eq!(format("en-US", options, 1.0), "1.00");

        let options = NumberFormatOptions::default().minimum_fraction_digits(5);
        assert_eq!(
            format("en-US", options, 1.123456),
            "1.12346",
            "A minimum above the default maximum raises the maximum"
        );

        let options = NumberFormatOptions::currency("USD").maximum_fraction_digits(0);
        assert_eq!(
            format("en-US", options, 1.5),
            "$2",
            "A maximum below the currency default lowers the minimum"
        );
    }

    #[test]
    fn test_minimum_integer_digits() {
        let options = NumberFormatOptions::default().minimum_integer_digits(3);
        assert_eq!(format("en-US", options, 7.0), "007");
    }

    #[test]
    fn test_significant_digits() {
        let options = NumberFormatOptions::default().maximum_significant_digits(3);
        assert_eq!(format("en-US", options.clone(), 123456.0), "123,000");
        assert_eq!(format("en-US", options.clone(), 0.0012345), "0.00123");
        assert_eq!(format("en-US", options, 9.999), "10");

        let round_trip = NumberFormatOptions::default().round_trip();
        assert_eq!(format("en-US", round_trip.clone(), 0.1 + 0.2), "0.3");
        assert_eq!(format("en-US", round_trip, 1234567.0), "1234567");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format("en-US", NumberFormatOptions::percent(), 0.256), "26%");
        assert_eq!(
            format("de-DE", NumberFormatOptions::percent(), 0.5),
            "50\u{A0}%"
        );
        assert_eq!(
            format("ar", NumberFormatOptions::percent(), 0.5),
            "\u{0665}\u{0660}\u{066A}\u{061C}"
        );
    }

    #[test]
    fn test_currency() {
        assert_eq!(
            format("en-US", NumberFormatOptions::currency("USD"), -1234.5),
            "-$1,234.50"
        );
        assert_eq!(
            format("de-DE", NumberFormatOptions::currency("EUR"), 1234.5),
            "1.234,50\u{A0}\u{20AC}"
        );
        assert_eq!(
            format(
                "en-US",
                NumberFormatOptions::currency("EUR").currency_display(CurrencyDisplay::Code),
                5.0
            ),
            "EUR\u{A0}5.00"
        );
        assert_eq!(format("en-US", NumberFormatOptions::currency("JPY"), 1234.4), "\u{00A5}1,234");
        assert_eq!(
            format(
                "es-ES",
                NumberFormatOptions::currency("CAD").currency_display(CurrencyDisplay::NarrowSymbol),
                1.0
            ),
            "1,00\u{A0}$"
        );
    }

    #[test]
    fn test_sign_display() {
        let with = |sign| NumberFormatOptions::default().sign_display(sign);
        assert_eq!(format("en-US", with(SignDisplay::Always), 0.0), "+0");
        assert_eq!(format("en-US", with(SignDisplay::Always), 3.0), "+3");
        assert_eq!(format("en-US", with(SignDisplay::ExceptZero), 0.0), "0");
        assert_eq!(format("en-US", with(SignDisplay::ExceptZero), -3.0), "-3");
        assert_eq!(format("en-US", with(SignDisplay::Never), -3.0), "3");
        assert_eq!(format("sv-SE", with(SignDisplay::Auto), -3.0), "\u{2212}3");
    }

    #[test]
    fn test_non_finite() {
        let formatter = NumberFormatter::new("en-US", NumberFormatOptions::default());
        assert_eq!(formatter.format(f64::NAN), "NaN");
        assert_eq!(formatter.format(f64::INFINITY), "\u{221E}");
        assert_eq!(formatter.format(f64::NEG_INFINITY), "-\u{221E}");
    }

    #[test]
    fn test_parts() {
        let formatter = NumberFormatter::new("en-US", NumberFormatOptions::default());
        let kinds: Vec<_> = formatter
            .format_to_parts(-11111.1)
            .into_iter()
            .map(|part| part.kind)
            .collect();
        assert_eq!(
            kinds,
            [
                NumberPartKind::MinusSign,
                NumberPartKind::Integer,
                NumberPartKind::Group,
                NumberPartKind::Integer,
                NumberPartKind::Decimal,
                NumberPartKind::Fraction,
            ]
        );
    }

    #[test]
    fn test_format_number_empty() {
        assert_eq!(format_number(None, "en-US", &NumberFormatOptions::default()), "");
        assert_eq!(
            format_number(Some(5.0), "en-US", &NumberFormatOptions::default()),
            "5"
        );
    }
}
