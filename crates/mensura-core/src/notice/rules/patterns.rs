//! Common regex patterns for mining-registry notices.
//!
//! Fragments are plain string constants so that the rule tables in
//! [`super::chains`] can compose them; compiled patterns used directly by
//! the scanners live in the `lazy_static` block.

use lazy_static::lazy_static;
use regex::Regex;

/// Straight and typographic quotes, all treated as equivalent delimiters.
pub const QUOTES: &[char] = &['"', '\'', '“', '”', '„', '«', '»', '‘', '’', '‹', '›'];

/// Opening quote.
pub const QUOTE_OPEN: &str = r#"["'“”„«‘’‹]"#;

/// Closing quote.
pub const QUOTE_CLOSE: &str = r#"["'“”»‘’›]"#;

/// Text between quotes: anything that is not itself a quote.
pub const QUOTED_CONTENT: &str = r#"([^"'“”„«»‘’‹›]{2,120}?)"#;

/// Upper-case word, accented letters and digits allowed. Never a prefix
/// of a capitalized word.
pub const UPPER_WORD: &str = r"[\p{Lu}\d][\p{Lu}\d.&/\-]*\b";

/// Capitalized place-name word.
pub const PLACE_WORD: &str = r"\p{Lu}[\p{L}]+";

/// Spanish month names (accents folded by the caller where needed).
pub const MONTH: &str =
    r"(?:enero|febrero|marzo|abril|mayo|junio|julio|agosto|sep?tiembre|octubre|noviembre|diciembre)";

/// Words that can appear in a spelled-out year after "mil".
pub const YEAR_WORD: &str = r"(?:y|un|uno|dos|tres|cuatro|cinco|seis|siete|ocho|nueve|diez|once|doce|trece|catorce|quince|dieci\p{L}+|veint\p{L}*|treinta|cuarenta|cincuenta|sesenta|setenta|ochenta|noventa|cien|ciento|\p{L}+cientos)";

/// Spanish weekday names, as printed in gazette headers.
pub const WEEKDAY: &str = r"(?:lunes|martes|mi[eé]rcoles|jueves|viernes|s[aá]bado|domingo)";

/// A date in either the numeric-day or the fully spelled-out form.
pub fn date_fragment() -> String {
    format!(
        r"(?i:(?:\d{{1,2}}(?:\s*[°º])?|primero|\p{{L}}+(?:\s+y\s+\p{{L}}+)?)\s+de\s+{month}\s+(?:de|del)\s+(?:a[ñn]o\s+)?(?:\d{{4}}|(?:dos\s+)?mil(?:\s+{year})*))",
        month = MONTH,
        year = YEAR_WORD,
    )
}

lazy_static! {
    /// Coordinate-like number: dotted thousands or a plain 6-7 digit
    /// integer, with an optional comma decimal part.
    pub static ref COORDINATE_NUMBER: Regex = Regex::new(
        r"\b(\d{1,3}(?:\.\d{3})+|\d{6,7})(?:,(\d+))?\b"
    ).unwrap();

    /// Chilean RUT check digit following a number (`12.345.678-K`).
    pub static ref RUT_SUFFIX: Regex = Regex::new(
        r"^-[\dkK]\b"
    ).unwrap();

    /// Currency marker immediately before a number.
    pub static ref MONEY_PREFIX: Regex = Regex::new(
        r"(?:\$|(?i:US\$|UF|CLP))\s*$"
    ).unwrap();

    /// Label introducing the reference point of a claim.
    pub static ref REFERENCE_POINT_LABEL: Regex = Regex::new(
        r"(?i)\b(?:punto\s+medio|punto\s+de\s+inter[eé]s|punto\s+de\s+referencia|P\.\s?M\.|P\.\s?I\.|PM|PI)(?:\b|\s)"
    ).unwrap();

    /// Parts of a normalized date: day, month, year.
    pub static ref DATE_PARTS: Regex = Regex::new(
        r"^\s*(.+?)\s+de\s+(\p{L}+)\s+(?:de|del)\s+(?:a[ñn]o\s+)?(.+?)[\s.,;]*$"
    ).unwrap();
}

/// Check whether a character is a straight or typographic quote.
pub fn is_quote(c: char) -> bool {
    QUOTES.contains(&c)
}
