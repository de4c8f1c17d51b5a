//! Rule tables for every logical field and labelled date.
//!
//! Rules are listed from the most structurally specific to the most
//! permissive. Keywords are matched case-insensitively; proper-name captures
//! stay case-sensitive so they stop at the first lower-case word.

use lazy_static::lazy_static;
use regex::Regex;

use super::patterns::{
    date_fragment, PLACE_WORD, QUOTED_CONTENT, QUOTE_CLOSE, QUOTE_OPEN, UPPER_WORD, WEEKDAY,
};
use super::{FieldRule, RuleChain, Transform};
use crate::models::{DateField, FieldName};

use Transform::*;

const NAME_CLEANUP: &[Transform] = &[StripQuotes, CollapseSpaces, TrimPunctuation];
const FREE_TEXT: &[Transform] = &[
    CollapseSpaces,
    CutAtTerminators,
    CutAtSentenceEnd,
    TrimPunctuation,
];
const DATE_CLEANUP: &[Transform] = &[CollapseSpaces, Trim];

fn rule(pattern: &str, transforms: &[Transform]) -> FieldRule {
    let pattern = Regex::new(pattern).expect("built-in field pattern must compile");
    FieldRule::new(pattern, 1, transforms)
}

fn upper_block() -> String {
    format!(r"{w}(?:\s+{w})*", w = UPPER_WORD)
}

/// Upper-case block that starts with a letter, for person and company names.
fn name_block() -> String {
    format!(r"\b\p{{Lu}}[\p{{Lu}}.&'\-]*\b(?:\s+{w})*", w = UPPER_WORD)
}

fn place_name() -> String {
    format!(
        r"{p}(?:\s+(?:(?:de|del|la|las|los|el)\s+)?{p})*",
        p = PLACE_WORD
    )
}

lazy_static! {
    static ref PROPERTY_NAME: RuleChain = RuleChain::new(vec![
        rule(
            &format!(
                r"(?i:denominad[oa]s?|llamad[oa]s?|nombre\s+de)\s*:?\s*{}{}{}",
                QUOTE_OPEN, QUOTED_CONTENT, QUOTE_CLOSE
            ),
            NAME_CLEANUP,
        ),
        rule(
            &format!(
                r"(?i:concesi[oó]n(?:\s+minera)?(?:\s+de\s+explo(?:taci|raci)[oó]n)?|pertenencias?|manifestaci[oó]n|pedimento)\s+{}{}{}",
                QUOTE_OPEN, QUOTED_CONTENT, QUOTE_CLOSE
            ),
            NAME_CLEANUP,
        ),
        rule(
            &format!(r"(?i:denominad[oa]s?|llamad[oa]s?)\s+({})", upper_block()),
            &[CutAtTerminators, TrimPunctuation],
        ),
        rule(
            &format!(r"{}({}){}", QUOTE_OPEN, upper_block(), QUOTE_CLOSE),
            NAME_CLEANUP,
        ),
    ]);

    static ref CASE_ROLE: RuleChain = RuleChain::new(vec![
        rule(
            r"\b(?i:rol)(?:\s+(?i:n[°ºo]\.?|n[uú]mero))?\s*:?\s*([A-Z]{1,2}\s*-\s*\d{1,6}\s*-\s*\d{4})\b",
            &[RemoveSpaces, Uppercase],
        ),
        rule(
            r"\b(?i:rol)(?:\s+(?i:n[°ºo]\.?|n[uú]mero))?\s*:?\s*(\d{1,6}\s*-\s*\d{4})\b",
            &[RemoveSpaces],
        ),
        rule(
            r"\b(?i:causa)(?:\s+(?i:rol|n[°ºo]\.?))?\s*:?\s*([A-Za-z]{0,2}-?\d{1,6}-\d{4})\b",
            &[RemoveSpaces, Uppercase],
        ),
    ]);

    static ref COURT: RuleChain = RuleChain::new(vec![
        rule(
            &format!(
                r"((?:\d{{1,2}}\s*[°º]\s*|(?i:primer|segundo|tercer|cuarto|quinto|sexto|s[eé]ptimo|octavo|noveno|d[eé]cimo)\s+)?(?i:juzgado\s+(?:de\s+letras|civil|mixto)(?:\s+y\s+garant[ií]a|\s+en\s+lo\s+civil)?\s+de)\s+{})",
                place_name()
            ),
            &[CollapseSpaces, TrimPunctuation],
        ),
        rule(
            r"((?:\d{1,2}\s*[°º]\s*)?(?i:juzgado)\s+[^,;.]{3,80})",
            &[CollapseSpaces, TrimPunctuation],
        ),
        rule(
            r"(?i:tribunal)\s*:?\s*([^,;.]{3,80})",
            &[CollapseSpaces, TrimPunctuation],
        ),
    ]);

    static ref APPLICANT: RuleChain = RuleChain::new(vec![
        rule(
            r"(?i:solicitantes?|peticionari[oa]s?)\s*:\s*(.{3,240})",
            FREE_TEXT,
        ),
        rule(
            r"(?i:en\s+representaci[oó]n\s+de)\s+(.{3,240})",
            FREE_TEXT,
        ),
        rule(
            r"\b(?i:don|do[ñn]a|sr\.|sra\.)\s+(\p{Lu}[\p{L}.'\-]*(?:\s+\p{Lu}[\p{L}.'\-]*)+),?\s+(?i:r\.?u\.?t\.?|c[ée]dula|c\.i\.)",
            &[CollapseSpaces, TrimPunctuation],
        ),
        rule(
            &format!(
                r"({}(?:\s+(?:SpA|Ltda\.?|S\.A\.|Limitada))?),?\s+(?i:r\.?u\.?t\.?|c[ée]dula|c\.i\.)",
                name_block()
            ),
            &[CollapseSpaces, TrimPunctuation],
        ),
    ]);

    static ref MUNICIPALITY: RuleChain = RuleChain::new(vec![
        rule(
            &format!(r"(?i:comuna\s+de)\s+({})", place_name()),
            &[CollapseSpaces, TrimPunctuation],
        ),
        rule(
            &format!(r"(?i:comuna)\s*:\s*({})", place_name()),
            &[CollapseSpaces, TrimPunctuation],
        ),
    ]);

    static ref VERIFICATION_CODE: RuleChain = RuleChain::new(vec![
        rule(r"\bCVE\s*:?\s*(\d{6,8})\b", &[]),
        rule(r"\bCVE\s*:?\s*(\d{1,2}(?:\.\d{3}){2})\b", &[DigitsOnly]),
        rule(
            r"(?i:c[oó]digo\s+de\s+verificaci[oó]n)\s*:?\s*([A-Za-z0-9]{6,12})\b",
            &[Uppercase],
        ),
    ]);

    static ref DECLARED_AREA: RuleChain = RuleChain::new(vec![
        rule(
            r"(?i:superficie|cabida|extensi[oó]n)[^.\d]{0,40}?(\d{1,3}(?:\.\d{3})+(?:,\d+)?|\d+(?:,\d+)?)\s*(?i:hect[aá]reas|h[aá]s?)\b",
            &[Decimal],
        ),
        rule(
            r"\b(\d{1,3}(?:\.\d{3})+(?:,\d+)?|\d+(?:,\d+)?)\s*(?i:hect[aá]reas|h[aá]s?)\b",
            &[Decimal],
        ),
    ]);

    /// Filled in by the record assembler from the affected segment.
    static ref AFFECTED_PROPERTY: RuleChain = RuleChain::default();

    static ref FILING_DATE: RuleChain = RuleChain::new(vec![
        rule(
            &format!(
                r"(?i:presentad[oa]s?|ingresad[oa]s?|solicitad[oa]s?)(?:\s+\p{{L}}+){{0,4}}?\s+(?i:con\s+fecha|el\s+d[ií]a|el)\s+({})",
                date_fragment()
            ),
            DATE_CLEANUP,
        ),
        rule(
            &format!(
                r"(?i:fecha\s+de\s+(?:presentaci[oó]n|ingreso|solicitud))\s*:?\s*({})",
                date_fragment()
            ),
            DATE_CLEANUP,
        ),
        rule(
            &format!(r"(?i:con\s+fecha)\s+({})", date_fragment()),
            DATE_CLEANUP,
        ),
    ]);

    static ref RESOLUTION_DATE: RuleChain = RuleChain::new(vec![
        rule(
            &format!(
                r"(?i:resoluci[oó]n|resolvi[oó]|provey[oó]|prove[ií]do|sentencia)[^.]{{0,80}}?({})",
                date_fragment()
            ),
            DATE_CLEANUP,
        ),
        rule(
            &format!(r"{}\s*,\s*({})", place_name(), date_fragment()),
            DATE_CLEANUP,
        ),
    ]);

    static ref PUBLICATION_DATE: RuleChain = RuleChain::new(vec![
        rule(
            &format!(r"(?i:{}),?\s+({})", WEEKDAY, date_fragment()),
            DATE_CLEANUP,
        ),
        rule(
            &format!(
                r"(?i:publicad[oa]s?|publicaci[oó]n)[^.]{{0,60}}?({})",
                date_fragment()
            ),
            DATE_CLEANUP,
        ),
        rule(
            &format!(r"(?i:bolet[ií]n\s+oficial)[^.]{{0,120}}?({})", date_fragment()),
            DATE_CLEANUP,
        ),
    ]);
}

/// Rule chain of a logical field.
pub fn field_chain(name: FieldName) -> &'static RuleChain {
    match name {
        FieldName::PropertyName => &PROPERTY_NAME,
        FieldName::CaseRole => &CASE_ROLE,
        FieldName::Court => &COURT,
        FieldName::Applicant => &APPLICANT,
        FieldName::Municipality => &MUNICIPALITY,
        FieldName::VerificationCode => &VERIFICATION_CODE,
        FieldName::DeclaredArea => &DECLARED_AREA,
        FieldName::AffectedProperty => &AFFECTED_PROPERTY,
    }
}

/// Rule chain of a labelled date. Values still need normalization.
pub fn date_chain(field: DateField) -> &'static RuleChain {
    match field {
        DateField::Filing => &FILING_DATE,
        DateField::Resolution => &RESOLUTION_DATE,
        DateField::Publication => &PUBLICATION_DATE,
    }
}
