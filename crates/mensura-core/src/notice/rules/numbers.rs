//! Spanish number formats (`7.012.345,50`).

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a Spanish-formatted decimal (e.g. "1.234,56", "1234,5" or "1.500").
///
/// Dots followed by exactly three digits are thousands separators; a comma
/// is the decimal separator.
pub fn parse_spanish_decimal(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = if cleaned.contains(',') {
        // Comma is the decimal point; every dot is a thousands separator.
        let (integer, fraction) = cleaned.rsplit_once(',')?;
        format!("{}.{}", integer.replace(['.', ','], ""), fraction)
    } else if is_thousands_grouped(&cleaned) {
        cleaned.replace('.', "")
    } else {
        cleaned
    };

    Decimal::from_str(&normalized).ok()
}

/// Parse the integer and optional fraction captured from a coordinate.
pub fn parse_coordinate(integer: &str, fraction: Option<&str>) -> Option<f64> {
    let integer: String = integer.chars().filter(|c| c.is_ascii_digit()).collect();
    if integer.is_empty() {
        return None;
    }

    let value = match fraction {
        Some(fraction) if !fraction.is_empty() => format!("{}.{}", integer, fraction),
        _ => integer,
    };

    value.parse().ok()
}

fn is_thousands_grouped(s: &str) -> bool {
    let mut groups = s.split('.');
    let head_ok = groups
        .next()
        .map(|g| (1..=3).contains(&g.len()))
        .unwrap_or(false);

    s.contains('.') && head_ok && groups.all(|g| g.len() == 3)
}
