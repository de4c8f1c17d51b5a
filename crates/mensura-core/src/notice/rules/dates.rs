//! Date extraction and normalization for Spanish legal notices.

use chrono::NaiveDate;
use tracing::warn;

use super::patterns::DATE_PARTS;
use crate::models::DateValue;
use crate::text::{collapse_whitespace, fold};

/// Outcome of normalizing one raw date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDate {
    pub value: DateValue,
    /// Sub-tokens that were not understood and were defaulted.
    pub warnings: Vec<String>,
}

/// Normalize a raw Spanish date (`16 de enero de 2026`,
/// `dieciséis de enero de dos mil veintiséis`) to a calendar date.
///
/// An unrecognized day or month falls back to 1. An unrecognized year, or a
/// day that does not exist in the month, gives `Undetermined`.
pub fn normalize_date(raw: &str) -> NormalizedDate {
    let folded = collapse_whitespace(&fold(raw).to_lowercase());
    let mut warnings = Vec::new();

    let Some(caps) = DATE_PARTS.captures(&folded) else {
        return NormalizedDate {
            value: DateValue::Undetermined,
            warnings: vec![format!("date '{}' does not follow a known form", raw.trim())],
        };
    };

    let day_token = caps[1].trim();
    let month_token = &caps[2];
    let year_token = caps[3].trim();

    let day = match parse_number_token(day_token).filter(|d| (1..=31).contains(d)) {
        Some(day) => day,
        None => {
            warn!(token = day_token, date = raw, "Unrecognized day, defaulting to 01");
            warnings.push(format!("day '{}' not recognized in '{}', defaulted to 01", day_token, raw.trim()));
            1
        }
    };

    let month = match month_number(month_token) {
        Some(month) => month,
        None => {
            warn!(token = month_token, date = raw, "Unrecognized month, defaulting to 01");
            warnings.push(format!("month '{}' not recognized in '{}', defaulted to 01", month_token, raw.trim()));
            1
        }
    };

    let Some(year) = parse_number_token(year_token).filter(|y| *y >= 1000) else {
        warnings.push(format!("year '{}' not recognized in '{}'", year_token, raw.trim()));
        return NormalizedDate {
            value: DateValue::Undetermined,
            warnings,
        };
    };

    let value = match NaiveDate::from_ymd_opt(year as i32, month, day) {
        Some(date) => DateValue::Resolved(date),
        None => {
            warnings.push(format!("'{}' is not a calendar date", raw.trim()));
            DateValue::Undetermined
        }
    };

    NormalizedDate { value, warnings }
}

fn parse_number_token(token: &str) -> Option<u32> {
    // Ordinal day: `1°`, `1º`.
    let token = token.trim_end_matches(|c: char| c == '°' || c == 'º' || c.is_whitespace());
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        token.parse().ok()
    } else {
        spelled_number(token)
    }
}

/// Month number of a Spanish month name. Accents and case are ignored.
pub fn month_number(name: &str) -> Option<u32> {
    let month = match fold(name).as_str() {
        "ENERO" => 1,
        "FEBRERO" => 2,
        "MARZO" => 3,
        "ABRIL" => 4,
        "MAYO" => 5,
        "JUNIO" => 6,
        "JULIO" => 7,
        "AGOSTO" => 8,
        "SEPTIEMBRE" | "SETIEMBRE" => 9,
        "OCTUBRE" => 10,
        "NOVIEMBRE" => 11,
        "DICIEMBRE" => 12,
        _ => return None,
    };
    Some(month)
}

/// Value of a spelled-out Spanish cardinal (`treinta y uno`,
/// `dos mil veintiséis`, `mil novecientos noventa y ocho`).
///
/// The ordinal `primero` counts as 1. Any unknown word, or a value that
/// does not fit in a `u32`, makes the whole number unknown.
pub fn spelled_number(words: &str) -> Option<u32> {
    let folded = fold(words);
    let mut total: u32 = 0;
    let mut current: u32 = 0;
    let mut seen = false;

    for word in folded.split_whitespace() {
        if word == "Y" {
            continue;
        }
        if word == "MIL" {
            total = current
                .max(1)
                .checked_mul(1000)
                .and_then(|thousands| total.checked_add(thousands))?;
            current = 0;
        } else {
            current = current.checked_add(word_value(word)?)?;
        }
        seen = true;
    }

    if !seen {
        return None;
    }
    total.checked_add(current)
}

fn word_value(word: &str) -> Option<u32> {
    let value = match word {
        "UN" | "UNO" | "UNA" | "PRIMERO" | "PRIMER" => 1,
        "DOS" => 2,
        "TRES" => 3,
        "CUATRO" => 4,
        "CINCO" => 5,
        "SEIS" => 6,
        "SIETE" => 7,
        "OCHO" => 8,
        "NUEVE" => 9,
        "DIEZ" => 10,
        "ONCE" => 11,
        "DOCE" => 12,
        "TRECE" => 13,
        "CATORCE" => 14,
        "QUINCE" => 15,
        "DIECISEIS" => 16,
        "DIECISIETE" => 17,
        "DIECIOCHO" => 18,
        "DIECINUEVE" => 19,
        "VEINTE" => 20,
        "VEINTIUN" | "VEINTIUNO" | "VEINTIUNA" => 21,
        "VEINTIDOS" => 22,
        "VEINTITRES" => 23,
        "VEINTICUATRO" => 24,
        "VEINTICINCO" => 25,
        "VEINTISEIS" => 26,
        "VEINTISIETE" => 27,
        "VEINTIOCHO" => 28,
        "VEINTINUEVE" => 29,
        "TREINTA" => 30,
        "CUARENTA" => 40,
        "CINCUENTA" => 50,
        "SESENTA" => 60,
        "SETENTA" => 70,
        "OCHENTA" => 80,
        "NOVENTA" => 90,
        "CIEN" | "CIENTO" => 100,
        "DOSCIENTOS" | "DOSCIENTAS" => 200,
        "TRESCIENTOS" | "TRESCIENTAS" => 300,
        "CUATROCIENTOS" | "CUATROCIENTAS" => 400,
        "QUINIENTOS" | "QUINIENTAS" => 500,
        "SEISCIENTOS" | "SEISCIENTAS" => 600,
        "SETECIENTOS" | "SETECIENTAS" => 700,
        "OCHOCIENTOS" | "OCHOCIENTAS" => 800,
        "NOVECIENTOS" | "NOVECIENTAS" => 900,
        _ => return None,
    };
    Some(value)
}
