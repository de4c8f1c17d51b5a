//! Rule-based field extractors for mining-registry notices.
//!
//! Every logical field is described by a [`RuleChain`]: an ordered list of
//! [`FieldRule`]s going from the most structurally specific pattern to the
//! most permissive one. The first rule that yields a non-empty value wins and
//! later rules are never consulted.

pub mod chains;
pub mod coordinates;
pub mod dates;
pub mod numbers;
pub mod patterns;
pub mod terminators;

pub use chains::{date_chain, field_chain};
pub use coordinates::CoordinateScanner;
pub use dates::{month_number, normalize_date, spelled_number, NormalizedDate};
pub use numbers::parse_spanish_decimal;
pub use terminators::TerminatorSet;

use regex::Regex;

/// Post-capture clean-up step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Trim surrounding whitespace.
    Trim,
    /// Trim surrounding punctuation, quotes and whitespace.
    TrimPunctuation,
    /// Remove every straight or typographic quote.
    StripQuotes,
    /// Keep the prefix before the earliest configured terminator.
    CutAtTerminators,
    /// Keep the first sentence. Abbreviations such as `S.A.` do not end one.
    CutAtSentenceEnd,
    /// Collapse internal whitespace runs to one space.
    CollapseSpaces,
    /// Remove all whitespace.
    RemoveSpaces,
    /// Keep only ASCII digits.
    DigitsOnly,
    /// Upper-case the value.
    Uppercase,
    /// Parse a Spanish-formatted decimal and render it with a `.` separator.
    Decimal,
}

impl Transform {
    fn apply(&self, value: &str, terminators: &TerminatorSet) -> String {
        match self {
            Transform::Trim => value.trim().to_string(),
            Transform::TrimPunctuation => value
                .trim_matches(|c: char| {
                    c.is_whitespace() || patterns::is_quote(c) || ",;:.-–(".contains(c)
                })
                .to_string(),
            Transform::StripQuotes => value.chars().filter(|c| !patterns::is_quote(*c)).collect(),
            Transform::CutAtTerminators => terminators.cut(value).to_string(),
            Transform::CutAtSentenceEnd => first_sentence(value).to_string(),
            Transform::CollapseSpaces => crate::text::collapse_whitespace(value),
            Transform::RemoveSpaces => value.chars().filter(|c| !c.is_whitespace()).collect(),
            Transform::DigitsOnly => value.chars().filter(char::is_ascii_digit).collect(),
            Transform::Uppercase => value.to_uppercase(),
            Transform::Decimal => parse_spanish_decimal(value)
                .map(|d| d.normalize().to_string())
                .unwrap_or_default(),
        }
    }
}

fn first_sentence(value: &str) -> &str {
    for (dot, _) in value.match_indices(". ") {
        let word = value[..dot]
            .rsplit(|c: char| c.is_whitespace())
            .next()
            .unwrap_or_default();
        if word.chars().count() >= 3 && !word.contains('.') {
            return &value[..dot];
        }
    }
    value
}

/// A pattern, the capture group to keep, and the clean-up to apply.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pattern: Regex,
    group: usize,
    transforms: Vec<Transform>,
}

impl FieldRule {
    pub fn new(pattern: Regex, group: usize, transforms: &[Transform]) -> Self {
        Self {
            pattern,
            group,
            transforms: transforms.to_vec(),
        }
    }

    /// Cleaned candidates, one per pattern match, in text order. Empty
    /// candidates are skipped.
    pub fn candidates<'a>(
        &'a self,
        text: &'a str,
        terminators: &'a TerminatorSet,
    ) -> impl Iterator<Item = String> + 'a {
        self.pattern.captures_iter(text).filter_map(move |caps| {
            let raw = caps.get(self.group)?.as_str();
            let value = self
                .transforms
                .iter()
                .fold(raw.to_string(), |acc, t| t.apply(&acc, terminators));
            (!value.is_empty()).then_some(value)
        })
    }

    /// First cleaned candidate.
    pub fn apply(&self, text: &str, terminators: &TerminatorSet) -> Option<String> {
        self.candidates(text, terminators).next()
    }
}

/// Ordered rules for one field.
#[derive(Debug, Clone, Default)]
pub struct RuleChain {
    rules: Vec<FieldRule>,
}

impl RuleChain {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First value produced by the chain, with the index of its rule.
    pub fn evaluate(&self, text: &str, terminators: &TerminatorSet) -> Option<(usize, String)> {
        self.find_map(text, terminators, Some)
    }

    /// Like [`RuleChain::evaluate`], but a candidate only counts as a match
    /// when `accept` turns it into a value.
    pub fn find_map<T>(
        &self,
        text: &str,
        terminators: &TerminatorSet,
        mut accept: impl FnMut(String) -> Option<T>,
    ) -> Option<(usize, T)> {
        self.rules.iter().enumerate().find_map(|(index, rule)| {
            rule.candidates(text, terminators)
                .find_map(&mut accept)
                .map(|value| (index, value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rule(pattern: &str, transforms: &[Transform]) -> FieldRule {
        FieldRule::new(Regex::new(pattern).unwrap(), 1, transforms)
    }

    #[test]
    fn test_specific_rule_wins() {
        let chain = RuleChain::new(vec![
            rule(r#"denominada\s+"([^"]+)""#, &[Transform::Trim]),
            rule(r"([A-Z]{3,}(?:\s+[A-Z]+)*)", &[Transform::Trim]),
        ]);
        let text = r#"EXTRACTO pertenencia denominada "LA ROSA 1 AL 3""#;

        assert_eq!(
            chain.evaluate(text, &TerminatorSet::empty()),
            Some((0, "LA ROSA 1 AL 3".to_string()))
        );
    }

    #[test]
    fn test_falls_through_to_permissive_rule() {
        let chain = RuleChain::new(vec![
            rule(r#"denominada\s+"([^"]+)""#, &[Transform::Trim]),
            rule(r"pertenencia\s+([A-Z]+(?:\s+[A-Z]+)*)", &[Transform::Trim]),
        ]);

        assert_eq!(
            chain.evaluate("pertenencia LA ROSA", &TerminatorSet::empty()),
            Some((1, "LA ROSA".to_string()))
        );
    }

    #[test]
    fn test_empty_candidate_does_not_match() {
        let chain = RuleChain::new(vec![
            rule(r"Solicitante:\s*([^,]*)", &[Transform::Trim]),
            rule(r"por\s+([A-Z ]+),", &[Transform::Trim]),
        ]);

        assert_eq!(
            chain.evaluate("Solicitante: , presentado por JUAN SOTO, R.U.T.", &TerminatorSet::empty()),
            Some((1, "JUAN SOTO".to_string()))
        );
    }

    #[test]
    fn test_terminator_transform() {
        let terminators = TerminatorSet::new(&[", R.U.T.".to_string()]).unwrap();
        let chain = RuleChain::new(vec![rule(
            r"Solicitante:\s*(.+)",
            &[Transform::CutAtTerminators, Transform::TrimPunctuation],
        )]);

        assert_eq!(
            chain.evaluate("Solicitante: MINERA EL COBRE SpA, R.U.T. 76.123.456-7", &terminators),
            Some((0, "MINERA EL COBRE SpA".to_string()))
        );
    }

    #[test]
    fn test_find_map_rejects_candidates() {
        let chain = RuleChain::new(vec![rule(r"(\d+)", &[])]);

        let found = chain.find_map("7 42 9", &TerminatorSet::empty(), |v| {
            v.parse::<u32>().ok().filter(|n| *n > 10)
        });
        assert_eq!(found, Some((0, 42)));
    }

    #[test]
    fn test_decimal_transform() {
        let terminators = TerminatorSet::empty();
        assert_eq!(Transform::Decimal.apply("1.234,50", &terminators), "1234.5");
        assert_eq!(Transform::Decimal.apply("100", &terminators), "100");
        assert_eq!(Transform::Decimal.apply("n/a", &terminators), "");
    }

    #[test]
    fn test_digits_only_transform() {
        let terminators = TerminatorSet::empty();
        assert_eq!(Transform::DigitsOnly.apply("2.345.678", &terminators), "2345678");
        assert_eq!(Transform::DigitsOnly.apply("N° 12 A", &terminators), "12");
    }

    #[test]
    fn test_sentence_end_transform() {
        let terminators = TerminatorSet::empty();
        assert_eq!(
            Transform::CutAtSentenceEnd.apply("MINERA DEL NORTE S.A. Comuna de Copiapó. Otro", &terminators),
            "MINERA DEL NORTE S.A. Comuna de Copiapó"
        );
        assert_eq!(
            Transform::CutAtSentenceEnd.apply("JUAN SOTO", &terminators),
            "JUAN SOTO"
        );
    }

    #[test]
    fn test_quote_transforms() {
        let terminators = TerminatorSet::empty();
        assert_eq!(
            Transform::StripQuotes.apply("“LA ROSA”", &terminators),
            "LA ROSA"
        );
        assert_eq!(
            Transform::TrimPunctuation.apply(" «EL SOL 2», ", &terminators),
            "EL SOL 2"
        );
    }
}
