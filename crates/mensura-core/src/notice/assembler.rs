//! Turns classified text into concession records.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::rules::{
    date_chain, field_chain, normalize_date, CoordinateScanner, NormalizedDate, TerminatorSet,
};
use crate::error::{MensuraError, Result};
use crate::geometry::GeometryBuilder;
use crate::models::{
    ConcessionRecord, DateField, DateValue, DocumentKind, ExtractedField, FieldName, FieldValue,
    MensuraConfig, RecordRole,
};
use crate::text::{fold, NormalizedText};

/// Finds the phrase that separates the affected property of an extract from
/// the newly measured one.
#[derive(Debug, Clone)]
pub struct ExtractSplitter {
    patterns: Vec<Regex>,
}

impl ExtractSplitter {
    /// Phrases match regardless of case, accents and spacing.
    pub fn new(phrases: &[String]) -> Result<Self> {
        let patterns = phrases
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|phrase| {
                RegexBuilder::new(&accent_insensitive(phrase))
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| MensuraError::Pattern {
                        name: format!("extraction.extract_separators: {}", phrase),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Byte range of the earliest separator. Ties go to the phrase listed first.
    pub fn find(&self, text: &str) -> Option<(usize, usize)> {
        self.patterns
            .iter()
            .filter_map(|p| p.find(text))
            .min_by_key(|m| m.start())
            .map(|m| (m.start(), m.end()))
    }

    /// Text before and after the separator, separator excluded.
    pub fn split<'a>(&self, text: &'a str) -> Option<(&'a str, &'a str)> {
        self.find(text)
            .map(|(start, end)| (&text[..start], &text[end..]))
    }
}

fn accent_insensitive(phrase: &str) -> String {
    let mut pattern = String::new();
    let mut in_space = false;

    for c in fold(phrase.trim()).chars() {
        if c.is_whitespace() {
            if !in_space {
                pattern.push_str(r"\s+");
            }
            in_space = true;
            continue;
        }
        in_space = false;

        match c {
            'A' => pattern.push_str("[AÁ]"),
            'E' => pattern.push_str("[EÉ]"),
            'I' => pattern.push_str("[IÍ]"),
            'O' => pattern.push_str("[OÓ]"),
            'U' => pattern.push_str("[UÚÜ]"),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }

    pattern
}

/// Evaluates field and date rule chains.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    terminators: TerminatorSet,
}

/// Dates of one document, with the warnings raised while normalizing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateExtraction {
    pub dates: BTreeMap<DateField, DateValue>,
    pub warnings: Vec<String>,
}

impl RuleEngine {
    pub fn new(terminators: TerminatorSet) -> Self {
        Self { terminators }
    }

    /// First value of the field's rule chain, or `Undetermined`.
    pub fn extract_field(&self, name: FieldName, text: &str) -> ExtractedField {
        match field_chain(name).evaluate(text, &self.terminators) {
            Some((index, value)) => {
                debug!(field = %name, rule = index, value = value.as_str(), "Field matched");
                ExtractedField::resolved(name, value, index)
            }
            None => ExtractedField::undetermined(name),
        }
    }

    pub fn extract_fields(
        &self,
        names: &[FieldName],
        text: &str,
    ) -> BTreeMap<FieldName, ExtractedField> {
        names
            .iter()
            .map(|name| (*name, self.extract_field(*name, text)))
            .collect()
    }

    /// A date rule only matches when its capture normalizes to a calendar date.
    pub fn extract_date(&self, field: DateField, text: &str) -> NormalizedDate {
        let found = date_chain(field).find_map(text, &self.terminators, |raw| {
            let normalized = normalize_date(&raw);
            (!normalized.value.is_undetermined()).then_some(normalized)
        });

        match found {
            Some((index, normalized)) => {
                debug!(field = field.as_str(), rule = index, date = %normalized.value, "Date matched");
                normalized
            }
            None => NormalizedDate {
                value: DateValue::Undetermined,
                warnings: Vec::new(),
            },
        }
    }

    pub fn extract_dates(&self, text: &str) -> DateExtraction {
        let mut extraction = DateExtraction::default();

        for field in DateField::ALL {
            let normalized = self.extract_date(*field, text);
            extraction.dates.insert(*field, normalized.value);
            extraction.warnings.extend(
                normalized
                    .warnings
                    .into_iter()
                    .map(|w| format!("{}: {}", field.as_str(), w)),
            );
        }

        extraction
    }
}

/// One side of a document: the collapsed text for field rules and the line
/// view for coordinate scanning.
struct Segment<'a> {
    text: &'a str,
    lines: &'a str,
}

/// Builds [`ConcessionRecord`]s from classified, normalized text.
#[derive(Debug, Clone)]
pub struct RecordAssembler {
    engine: RuleEngine,
    scanner: CoordinateScanner,
    geometry: GeometryBuilder,
    splitter: ExtractSplitter,
}

impl RecordAssembler {
    pub fn new(config: &MensuraConfig) -> Result<Self> {
        Ok(Self {
            engine: RuleEngine::new(TerminatorSet::new(&config.extraction.terminators)?),
            scanner: CoordinateScanner::new(config.scanner.clone()),
            geometry: GeometryBuilder::new(config.geometry.clone()),
            splitter: ExtractSplitter::new(&config.extraction.extract_separators)?,
        })
    }

    /// One record, or two for an extract whose separator phrase is found.
    pub fn assemble(&self, kind: DocumentKind, text: &NormalizedText) -> Vec<ConcessionRecord> {
        let field_set = kind.required_fields();
        let lines = text.lines().join("\n");
        let whole = Segment {
            text: text.text(),
            lines: &lines,
        };
        let dates = self.engine.extract_dates(whole.text);

        if kind == DocumentKind::Extract {
            if let Some((affected, measured)) = self.split(&whole) {
                debug!("Extract separator found, assembling two records");
                return self.assemble_split(kind, field_set, &whole, affected, measured, &dates);
            }
        }

        let mut fields = self.engine.extract_fields(&partition_fields(field_set), whole.text);
        fields.extend(self.engine.extract_fields(&document_fields(field_set), whole.text));

        let mut warnings = dates.warnings.clone();
        if field_set.contains(&FieldName::AffectedProperty) {
            fields.insert(
                FieldName::AffectedProperty,
                ExtractedField::undetermined(FieldName::AffectedProperty),
            );
            warnings.push("extract separator phrase not found, no affected property".to_string());
        }

        vec![self.build_record(kind, RecordRole::Single, fields, &dates, &whole, warnings)]
    }

    fn split<'a>(&self, whole: &Segment<'a>) -> Option<(Segment<'a>, Segment<'a>)> {
        let (text_before, text_after) = self.splitter.split(whole.text)?;
        let (lines_before, lines_after) = self
            .splitter
            .split(whole.lines)
            .unwrap_or((text_before, text_after));

        Some((
            Segment {
                text: text_before,
                lines: lines_before,
            },
            Segment {
                text: text_after,
                lines: lines_after,
            },
        ))
    }

    fn assemble_split(
        &self,
        kind: DocumentKind,
        field_set: &[FieldName],
        whole: &Segment<'_>,
        affected: Segment<'_>,
        measured: Segment<'_>,
        dates: &DateExtraction,
    ) -> Vec<ConcessionRecord> {
        let shared = self.engine.extract_fields(&document_fields(field_set), whole.text);
        let partition = partition_fields(field_set);

        let affected_fields = self.engine.extract_fields(&partition, affected.text);
        let affected_name = affected_fields
            .get(&FieldName::PropertyName)
            .map(|f| f.value.clone())
            .unwrap_or_default();
        let measured_fields = self.engine.extract_fields(&partition, measured.text);

        [
            (RecordRole::Affected, affected_fields, affected),
            (RecordRole::Measured, measured_fields, measured),
        ]
        .into_iter()
        .map(|(role, mut fields, segment)| {
            fields.extend(shared.clone());
            if field_set.contains(&FieldName::AffectedProperty) {
                fields.insert(
                    FieldName::AffectedProperty,
                    affected_property(affected_name.clone()),
                );
            }
            self.build_record(kind, role, fields, dates, &segment, dates.warnings.clone())
        })
        .collect()
    }

    fn build_record(
        &self,
        kind: DocumentKind,
        role: RecordRole,
        fields: BTreeMap<FieldName, ExtractedField>,
        dates: &DateExtraction,
        segment: &Segment<'_>,
        mut warnings: Vec<String>,
    ) -> ConcessionRecord {
        let vertices = self.scanner.scan(segment.lines);
        let reference_point = self.scanner.reference_point(segment.text);

        let declared_hectares = fields
            .get(&FieldName::DeclaredArea)
            .and_then(|f| f.value.as_deref())
            .and_then(|v| v.parse::<f64>().ok());

        let boundary = self
            .geometry
            .build(&vertices, reference_point, declared_hectares);

        for field in fields.values().filter(|f| f.value.is_undetermined()) {
            warnings.push(format!("could not determine {}", field.name));
        }

        let low_confidence = vertices.low_confidence_count();
        if low_confidence > 0 {
            warnings.push(format!(
                "{} vertex pair(s) with ambiguous northing/easting order",
                low_confidence
            ));
        }

        if boundary.is_empty() {
            warnings.push("no boundary could be reconstructed".to_string());
        }

        debug!(
            kind = %kind,
            role = role.as_str(),
            vertices = vertices.len(),
            boundary = boundary.source().map(|s| s.as_str()).unwrap_or("none"),
            "Record assembled"
        );

        ConcessionRecord {
            kind,
            role,
            fields,
            dates: dates.dates.clone(),
            reference_point,
            boundary,
            warnings,
        }
    }
}

fn affected_property(value: FieldValue) -> ExtractedField {
    ExtractedField {
        name: FieldName::AffectedProperty,
        value,
        rule_index: None,
    }
}

/// Fields read from the whole document even when it is split.
fn document_fields(field_set: &[FieldName]) -> Vec<FieldName> {
    field_set
        .iter()
        .copied()
        .filter(|f| f.is_document_level())
        .collect()
}

/// Fields read independently from each side of a split extract.
fn partition_fields(field_set: &[FieldName]) -> Vec<FieldName> {
    field_set
        .iter()
        .copied()
        .filter(|f| !f.is_document_level() && *f != FieldName::AffectedProperty)
        .collect()
}
