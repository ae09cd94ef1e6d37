use crate::{
    LocaleSymbols, NumberFormatOptions, NumeralScript,
    locale::{digit_value, is_bidi_mark},
};

const PERCENT_GLYPHS: [char; 2] = ['%', '\u{066A}'];
const MINUS_VARIANTS: [char; 3] = ['\u{2212}', '\u{FE63}', '\u{FF0D}'];

/// Parses locale-formatted `text` back into a number.
///
/// Text written in Arabic-indic digits or Han numerals is read with the
/// separators of a locale using that script, whatever `locale` says. Like
/// `parseFloat`, trailing garbage after a number is ignored. Returns `None`
/// when no number can be read.
pub fn parse_number(text: &str, locale: &str, options: &NumberFormatOptions) -> Option<f64> {
    let script = NumeralScript::detect(text);
    let symbols = LocaleSymbols::resolve(script.locale_for(locale), options);

    let mut normalized: String = text.chars().filter(|c| !is_bidi_mark(*c)).collect();

    if let Some(currency) = symbols.currency.as_deref().filter(|c| !c.is_empty()) {
        normalized = normalized.replace(currency, "");
    }

    if let Some(group) = symbols.group.as_deref().filter(|g| !g.is_empty()) {
        normalized = if group.chars().all(char::is_whitespace) {
            normalized.chars().filter(|c| !c.is_whitespace()).collect()
        } else {
            normalized.replace(group, "")
        };
    }

    let decimal: String = symbols.decimal.chars().filter(|c| !is_bidi_mark(*c)).collect();
    if !decimal.is_empty() && decimal != "." {
        normalized = normalized.replace(&decimal, ".");
    }

    let has_percent = normalized.contains(PERCENT_GLYPHS);

    let ascii: String = normalized
        .chars()
        .map(|c| match digit_value(c) {
            Some(digit) => char::from_digit(digit, 10).unwrap_or(c),
            None if MINUS_VARIANTS.contains(&c) => '-',
            None => c,
        })
        .collect();

    let value = parse_float_prefix(&ascii)?;
    Some(if has_percent { value / 100.0 } else { value })
}

/// Reads the longest floating-point literal at the start of `text`.
fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    if text[end..].starts_with("Infinity") {
        let negative = text.starts_with('-');
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let integer_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - integer_start;

    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while bytes.get(fraction_end).is_some_and(u8::is_ascii_digit) {
            fraction_end += 1;
        }
        digits += fraction_end - fraction_start;
        if digits > 0 {
            end = fraction_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits_start = exponent_end;
        while bytes.get(exponent_end).is_some_and(u8::is_ascii_digit) {
            exponent_end += 1;
        }
        if exponent_end > exponent_digits_start {
            end = exponent_end;
        }
    }

    text[..end].parse().ok()
}
