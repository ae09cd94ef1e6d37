use std::ops::Range;

use number_format::{LocaleSymbols, locale::digit_value};
use unicode_segmentation::UnicodeSegmentation;

const MINUS_GLYPHS: [&str; 4] = ["-", "\u{2212}", "\u{FE63}", "\u{FF0D}"];
const PERCENT_GLYPHS: [&str; 2] = ["%", "\u{066A}"];

/// Decides which typed or composed text a number input accepts.
pub(crate) struct InsertionFilter<'a> {
    pub symbols: &'a LocaleSymbols,
    /// Whether a minus sign may be entered, i.e. the range reaches below zero.
    pub allow_negative: bool,
    pub allow_fraction: bool,
}

impl InsertionFilter<'_> {
    /// Whether `inserted` may replace `selection` (byte range) of `current`.
    ///
    /// Digits in any supported script and group separators are always
    /// accepted. The decimal separator, sign, currency and percent glyphs are
    /// accepted once: only if the text left after removing the selection
    /// doesn't already contain one.
    pub fn accepts(&self, inserted: &str, current: &str, selection: Range<usize>) -> bool {
        let remaining = match (current.get(..selection.start), current.get(selection.end..)) {
            (Some(before), Some(after)) => format!("{before}{after}"),
            _ => current.to_string(),
        };

        let mut seen_decimal = remaining.contains(self.symbols.decimal.as_str());
        let mut seen_sign = has_sign(&remaining);
        let mut seen_percent = PERCENT_GLYPHS.iter().any(|p| remaining.contains(p));
        let mut seen_currency = self
            .symbols
            .currency
            .as_deref()
            .is_some_and(|currency| remaining.contains(currency));

        let symbols = self.symbols;
        let is_group = |grapheme: &str| match symbols.group.as_deref() {
            Some(group) if group.chars().all(char::is_whitespace) => {
                grapheme.chars().all(char::is_whitespace)
            }
            Some(group) => grapheme == group,
            None => false,
        };

        // Currency symbols like "US$" span several graphemes, so strip them first.
        let inserted = match symbols.currency.as_deref() {
            Some(currency) if inserted.contains(currency) => {
                if seen_currency || inserted.matches(currency).count() > 1 {
                    return false;
                }
                seen_currency = true;
                inserted.replacen(currency, "", 1)
            }
            _ => inserted.to_string(),
        };

        inserted.graphemes(true).all(|grapheme| {
            if grapheme.chars().all(|c| digit_value(c).is_some()) || is_group(grapheme) {
                true
            } else if grapheme == symbols.decimal {
                let ok = self.allow_fraction && !seen_decimal;
                seen_decimal = true;
                ok
            } else if MINUS_GLYPHS.contains(&grapheme) || grapheme == "+" {
                let ok = !seen_sign && (grapheme == "+" || self.allow_negative);
                seen_sign = true;
                ok
            } else if PERCENT_GLYPHS.contains(&grapheme) {
                let ok = symbols.percent.is_some() && !seen_percent;
                seen_percent = true;
                ok
            } else {
                false
            }
        })
    }
}

fn has_sign(text: &str) -> bool {
    text.contains('+') || MINUS_GLYPHS.iter().any(|minus| text.contains(minus))
}
