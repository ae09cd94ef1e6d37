use crate::{NumberFormatCache, NumberFormatOptions, NumberPartKind};

const ARABIC_INDIC_ZERO: u32 = 0x0660;
const EXTENDED_ARABIC_INDIC_ZERO: u32 = 0x06F0;

/// Han decimal digits in value order, as produced by the `hanidec` numbering system.
const HAN_DIGITS: [char; 10] = [
    '\u{3007}', '\u{4E00}', '\u{4E8C}', '\u{4E09}', '\u{56DB}', '\u{4E94}', '\u{516D}', '\u{4E03}',
    '\u{516B}', '\u{4E5D}',
];

/// Financial-style zero some writers use in place of `〇`.
const HAN_ZERO_ALT: char = '\u{96F6}';

/// Locale the parser switches to when text is written in Arabic-indic digits.
pub const ARABIC_LOCALE: &str = "ar";

/// Locale the parser switches to when text is written in Han numerals.
pub const HAN_LOCALE: &str = "zh-Hans-CN-u-nu-hanidec";

/// Arabic letter mark, emitted around signs and percent glyphs in Arabic output.
pub(crate) const ARABIC_LETTER_MARK: char = '\u{061C}';
const LEFT_TO_RIGHT_MARK: char = '\u{200E}';
const RIGHT_TO_LEFT_MARK: char = '\u{200F}';

/// Glyph system a piece of text writes its digits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumeralScript {
    /// ASCII `0`-`9`.
    Latin,
    /// Arabic-indic (`٠`-`٩`) or Eastern Arabic-indic (`۰`-`۹`) digits.
    Arabic,
    /// Han decimal numerals (`〇一二三…`).
    Han,
}

impl NumeralScript {
    /// Detects the script of `text`. Arabic-indic digits win over Han
    /// numerals; text with neither is Latin.
    pub fn detect(text: &str) -> Self {
        if text.chars().any(is_arabic_digit) {
            NumeralScript::Arabic
        } else if text.chars().any(is_han_digit) {
            NumeralScript::Han
        } else {
            NumeralScript::Latin
        }
    }

    /// Locale whose separators should be used to read text in this script.
    pub fn locale_for<'a>(&self, fallback: &'a str) -> &'a str {
        match self {
            NumeralScript::Arabic => ARABIC_LOCALE,
            NumeralScript::Han => HAN_LOCALE,
            NumeralScript::Latin => fallback,
        }
    }
}

fn is_arabic_digit(c: char) -> bool {
    matches!(c as u32, 0x0660..=0x0669 | 0x06F0..=0x06F9)
}

fn is_han_digit(c: char) -> bool {
    c == HAN_ZERO_ALT || HAN_DIGITS.contains(&c)
}

/// Numbering systems the formatter can emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NumberingSystem {
    /// `latn`
    #[default]
    Latin,
    /// `arab`
    Arabic,
    /// `arabext`
    ArabicExtended,
    /// `hanidec`
    HanDecimal,
}

impl NumberingSystem {
    /// Maps a Unicode `nu` identifier to a numbering system, if supported.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier.to_ascii_lowercase().as_str() {
            "latn" => Some(NumberingSystem::Latin),
            "arab" => Some(NumberingSystem::Arabic),
            "arabext" => Some(NumberingSystem::ArabicExtended),
            "hanidec" => Some(NumberingSystem::HanDecimal),
            _ => None,
        }
    }

    /// The glyph for decimal digit `digit` (0-9).
    pub fn digit(&self, digit: u32) -> char {
        debug_assert!(digit < 10);
        let offset = |zero: u32| char::from_u32(zero + digit).unwrap_or('0');
        match self {
            NumberingSystem::Latin => offset('0' as u32),
            NumberingSystem::Arabic => offset(ARABIC_INDIC_ZERO),
            NumberingSystem::ArabicExtended => offset(EXTENDED_ARABIC_INDIC_ZERO),
            NumberingSystem::HanDecimal => HAN_DIGITS[digit as usize % 10],
        }
    }

    /// Rewrites the ASCII digits of `ascii` in this numbering system.
    pub fn transliterate(&self, ascii: &str) -> String {
        if *self == NumberingSystem::Latin {
            return ascii.to_string();
        }

        ascii
            .chars()
            .map(|c| c.to_digit(10).map_or(c, |digit| self.digit(digit)))
            .collect()
    }
}

/// Value of a digit glyph in any supported numbering system.
pub fn digit_value(c: char) -> Option<u32> {
    if let Some(digit) = c.to_digit(10) {
        return Some(digit);
    }

    match c as u32 {
        code @ 0x0660..=0x0669 => Some(code - ARABIC_INDIC_ZERO),
        code @ 0x06F0..=0x06F9 => Some(code - EXTENDED_ARABIC_INDIC_ZERO),
        _ if c == HAN_ZERO_ALT => Some(0),
        _ => HAN_DIGITS
            .iter()
            .position(|han| *han == c)
            .map(|digit| digit as u32),
    }
}

/// Bidi control marks that locales wrap around signs and symbols.
pub(crate) fn is_bidi_mark(c: char) -> bool {
    matches!(c, ARABIC_LETTER_MARK | LEFT_TO_RIGHT_MARK | RIGHT_TO_LEFT_MARK)
}

/// The parts of a BCP 47 tag the locale table cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LocaleTag {
    pub language: String,
    pub region: Option<String>,
    pub numbering: Option<String>,
}

impl LocaleTag {
    pub fn parse(locale: &str) -> Self {
        let mut subtags = locale.split(['-', '_']).filter(|subtag| !subtag.is_empty());
        let language = subtags
            .next()
            .map(|language| language.to_ascii_lowercase())
            .unwrap_or_default();

        let mut tag = LocaleTag {
            language,
            ..Default::default()
        };

        let mut in_unicode_extension = false;
        let mut expect_numbering = false;
        for subtag in subtags {
            if expect_numbering {
                tag.numbering = Some(subtag.to_ascii_lowercase());
                expect_numbering = false;
                continue;
            }

            if subtag.len() == 1 {
                in_unicode_extension = subtag.eq_ignore_ascii_case("u");
                continue;
            }

            if in_unicode_extension {
                expect_numbering = subtag.eq_ignore_ascii_case("nu");
            } else if tag.region.is_none() && is_region_subtag(subtag) {
                tag.region = Some(subtag.to_ascii_uppercase());
            }
        }

        tag
    }
}

fn is_region_subtag(subtag: &str) -> bool {
    (subtag.len() == 2 && subtag.chars().all(|c| c.is_ascii_alphabetic()))
        || (subtag.len() == 3 && subtag.chars().all(|c| c.is_ascii_digit()))
}

/// Per-locale formatting conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LocaleData {
    pub decimal: &'static str,
    pub group: &'static str,
    pub minimum_grouping_digits: usize,
    pub minus: &'static str,
    pub percent: &'static str,
    pub percent_spacing: bool,
    pub currency_after: bool,
    pub numbering: NumberingSystem,
}

impl LocaleData {
    pub fn for_locale(locale: &str) -> Self {
        let tag = LocaleTag::parse(locale);
        let language = tag.language.as_str();

        let numbering = tag
            .numbering
            .as_deref()
            .and_then(NumberingSystem::from_identifier)
            .unwrap_or_else(|| default_numbering(language, tag.region.as_deref()));

        let (decimal, group) = match language {
            "de" | "es" | "it" | "pt" | "nl" | "da" | "tr" | "id" | "el" | "ca" | "hr" | "sl"
            | "sr" | "ro" | "vi" | "ar" => (",", "."),
            "fr" => (",", "\u{202F}"),
            "ru" | "pl" | "sv" | "fi" | "nb" | "nn" | "no" | "cs" | "sk" | "uk" | "bg" | "hu"
            | "lt" | "lv" | "et" => (",", "\u{A0}"),
            _ => (".", ","),
        };

        let minimum_grouping_digits = match language {
            "es" | "pl" => 2,
            _ => 1,
        };

        let minus = match language {
            "sv" | "fi" | "nb" | "nn" | "no" | "lt" | "sl" | "et" => "\u{2212}",
            _ => "-",
        };

        let percent_spacing = matches!(
            language,
            "de" | "fr"
                | "es"
                | "nl"
                | "da"
                | "fi"
                | "nb"
                | "nn"
                | "no"
                | "sv"
                | "pl"
                | "cs"
                | "sk"
                | "ru"
                | "uk"
                | "bg"
                | "hr"
                | "sl"
                | "ca"
                | "el"
                | "lt"
                | "et"
        );

        let currency_after = matches!(
            language,
            "de" | "fr"
                | "es"
                | "it"
                | "pt"
                | "ca"
                | "da"
                | "fi"
                | "nb"
                | "nn"
                | "no"
                | "sv"
                | "pl"
                | "cs"
                | "sk"
                | "hu"
                | "ro"
                | "bg"
                | "hr"
                | "sl"
                | "sr"
                | "el"
                | "uk"
                | "ru"
                | "et"
                | "lv"
                | "lt"
                | "vi"
                | "ar"
                | "fa"
        );

        let mut data = LocaleData {
            decimal,
            group,
            minimum_grouping_digits,
            minus,
            percent: "%",
            percent_spacing,
            currency_after,
            numbering,
        };

        match numbering {
            NumberingSystem::Arabic => {
                data.decimal = "\u{066B}";
                data.group = "\u{066C}";
                data.minus = "\u{061C}-";
                data.percent = "\u{066A}\u{061C}";
                data.percent_spacing = false;
            }
            NumberingSystem::ArabicExtended => {
                data.decimal = "\u{066B}";
                data.group = "\u{066C}";
                data.minus = "\u{200E}\u{2212}";
                data.percent = "\u{066A}";
                data.percent_spacing = false;
            }
            NumberingSystem::Latin | NumberingSystem::HanDecimal => {}
        }

        data
    }
}

fn default_numbering(language: &str, region: Option<&str>) -> NumberingSystem {
    match (language, region) {
        ("ar", Some("MA" | "DZ" | "TN" | "LY" | "EH")) => NumberingSystem::Latin,
        ("ar", _) => NumberingSystem::Arabic,
        ("fa" | "ps" | "ur", Some("AF" | "IR") | None) => NumberingSystem::ArabicExtended,
        _ => NumberingSystem::Latin,
    }
}

/// Separators and symbols a locale uses for a given set of options.
///
/// Resolved by formatting a probe number and reading back the typed parts, so
/// the parser always agrees with what the formatter emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSymbols {
    /// Numbering system the locale writes digits in.
    pub numbering: NumberingSystem,
    /// Decimal separator.
    pub decimal: String,
    /// Group separator, if the options group digits.
    pub group: Option<String>,
    /// Currency symbol or code, for currency styles.
    pub currency: Option<String>,
    /// Percent glyph, for percent styles.
    pub percent: Option<String>,
    /// Minus sign.
    pub minus: String,
}

impl LocaleSymbols {
    const PROBE: f64 = -11111.1;
    const DECIMAL_PROBE: f64 = 0.1;

    /// Resolves the symbols for `locale` under `options`.
    pub fn resolve(locale: &str, options: &NumberFormatOptions) -> Self {
        let cache = NumberFormatCache::global();
        let formatter = cache.get_formatter(locale, options);

        let mut decimal = None;
        let mut group = None;
        let mut currency = None;
        let mut percent = None;
        let mut minus = None;

        for part in formatter.format_to_parts(Self::PROBE) {
            let slot = match part.kind {
                NumberPartKind::Decimal => &mut decimal,
                NumberPartKind::Group => &mut group,
                NumberPartKind::Currency => &mut currency,
                NumberPartKind::PercentSign => &mut percent,
                NumberPartKind::MinusSign => &mut minus,
                _ => continue,
            };
            slot.get_or_insert(part.value);
        }

        // Options like `maximumFractionDigits: 0` hide the decimal separator.
        if decimal.is_none() {
            let plain = cache.get_formatter(locale, &NumberFormatOptions::default());
            decimal = plain
                .format_to_parts(Self::DECIMAL_PROBE)
                .into_iter()
                .find(|part| part.kind == NumberPartKind::Decimal)
                .map(|part| part.value);
        }

        LocaleSymbols {
            numbering: formatter.numbering_system(),
            decimal: decimal.unwrap_or_else(|| ".".to_string()),
            group,
            currency,
            percent,
            minus: minus.unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_script() {
        assert_eq!(NumeralScript::detect("1,234.56"), NumeralScript::Latin);
        assert_eq!(
            NumeralScript::detect("\u{0661}\u{066C}\u{0662}"),
            NumeralScript::Arabic
        );
        assert_eq!(NumeralScript::detect("\u{06F5}"), NumeralScript::Arabic);
        assert_eq!(NumeralScript::detect("一,二三四"), NumeralScript::Han);
        assert_eq!(NumeralScript::detect("零"), NumeralScript::Han);
        assert_eq!(NumeralScript::detect(""), NumeralScript::Latin);
    }

    #[test]
    fn test_arabic_wins_over_han() {
        assert_eq!(
            NumeralScript::detect("一\u{0661}"),
            NumeralScript::Arabic,
            "Arabic-indic digits are checked first"
        );
    }

    #[test]
    fn test_locale_for_script() {
        assert_eq!(NumeralScript::Arabic.locale_for("de-DE"), "ar");
        assert_eq!(NumeralScript::Han.locale_for("de-DE"), HAN_LOCALE);
        assert_eq!(NumeralScript::Latin.locale_for("de-DE"), "de-DE");
    }

    #[test]
    fn test_digit_value_across_scripts() {
        assert_eq!(digit_value('7'), Some(7));
        assert_eq!(digit_value('\u{0667}'), Some(7));
        assert_eq!(digit_value('\u{06F7}'), Some(7));
        assert_eq!(digit_value('七'), Some(7));
        assert_eq!(digit_value('〇'), Some(0));
        assert_eq!(digit_value('零'), Some(0));
        assert_eq!(digit_value('x'), None);
    }

    #[test]
    fn test_transliterate() {
        assert_eq!(
            NumberingSystem::Arabic.transliterate("1,2"),
            "\u{0661},\u{0662}"
        );
        assert_eq!(NumberingSystem::HanDecimal.transliterate("1024"), "一〇二四");
        assert_eq!(NumberingSystem::Latin.transliterate("42"), "42");
    }

    #[test]
    fn test_parse_locale_tag() {
        let tag = LocaleTag::parse("zh-Hans-CN-u-nu-hanidec");
        assert_eq!(tag.language, "zh");
        assert_eq!(tag.region.as_deref(), Some("CN"));
        assert_eq!(tag.numbering.as_deref(), Some("hanidec"));

        let tag = LocaleTag::parse("en_us");
        assert_eq!(tag.language, "en");
        assert_eq!(tag.region.as_deref(), Some("US"));
        assert_eq!(tag.numbering, None);

        let tag = LocaleTag::parse("es-419");
        assert_eq!(tag.region.as_deref(), Some("419"));
    }

    #[test]
    fn test_default_numbering_systems() {
        assert_eq!(
            LocaleData::for_locale("ar-EG").numbering,
            NumberingSystem::Arabic
        );
        assert_eq!(
            LocaleData::for_locale("ar-MA").numbering,
            NumberingSystem::Latin
        );
        assert_eq!(
            LocaleData::for_locale("fa").numbering,
            NumberingSystem::ArabicExtended
        );
        assert_eq!(
            LocaleData::for_locale("ar-u-nu-latn").numbering,
            NumberingSystem::Latin
        );
        assert_eq!(
            LocaleData::for_locale("zh-CN").numbering,
            NumberingSystem::Latin
        );
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english_data() {
        let data = LocaleData::for_locale("xx-YY");
        assert_eq!(data.decimal, ".");
        assert_eq!(data.group, ",");
        assert_eq!(data.numbering, NumberingSystem::Latin);
    }

    #[test]
    fn test_resolve_symbols_en() {
        let symbols = LocaleSymbols::resolve("en-US", &NumberFormatOptions::default());
        assert_eq!(symbols.decimal, ".");
        assert_eq!(symbols.group.as_deref(), Some(","));
        assert_eq!(symbols.minus, "-");
        assert_eq!(symbols.currency, None);
    }

    #[test]
    fn test_resolve_symbols_de_currency() {
        let symbols = LocaleSymbols::resolve("de-DE", &NumberFormatOptions::currency("EUR"));
        assert_eq!(symbols.decimal, ",");
        assert_eq!(symbols.group.as_deref(), Some("."));
        assert_eq!(symbols.currency.as_deref(), Some("\u{20AC}"));
    }

    #[test]
    fn test_resolve_decimal_when_fractions_hidden() {
        let options = NumberFormatOptions::default().maximum_fraction_digits(0);
        let symbols = LocaleSymbols::resolve("de-DE", &options);
        assert_eq!(symbols.decimal, ",", "Decimal comes from the plain formatter");
    }

    #[test]
    fn test_resolve_symbols_arabic() {
        let symbols = LocaleSymbols::resolve("ar", &NumberFormatOptions::percent());
        assert_eq!(symbols.numbering, NumberingSystem::Arabic);
        assert_eq!(symbols.decimal, "\u{066B}");
        assert_eq!(symbols.group.as_deref(), Some("\u{066C}"));
        assert_eq!(symbols.percent.as_deref(), Some("\u{066A}\u{061C}"));
    }
}
