//! Concession record models produced by the extraction pipeline.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::boundary::{Boundary, Coordinate};

/// Sentinel written wherever a value could not be determined.
pub const UNDETERMINED: &str = "Undetermined";

/// Canonical date format (`DD/MM/YYYY`).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Kind of mining-registry publication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Manifestación.
    Manifestation,
    /// Pedimento.
    Pedimento,
    /// Solicitud de mensura.
    Mensura,
    /// Rectificación.
    Rectification,
    /// Testificación.
    Testification,
    /// Extracto of a court resolution.
    Extract,
    #[default]
    Unknown,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Manifestation => "manifestation",
            DocumentKind::Pedimento => "pedimento",
            DocumentKind::Mensura => "mensura",
            DocumentKind::Rectification => "rectification",
            DocumentKind::Testification => "testification",
            DocumentKind::Extract => "extract",
            DocumentKind::Unknown => "unknown",
        }
    }

    /// Fields extracted for documents of this kind.
    pub fn required_fields(&self) -> &'static [FieldName] {
        use FieldName::*;

        match self {
            DocumentKind::Manifestation
            | DocumentKind::Pedimento
            | DocumentKind::Mensura
            | DocumentKind::Rectification
            | DocumentKind::Unknown => &[
                PropertyName,
                CaseRole,
                Court,
                Applicant,
                Municipality,
                VerificationCode,
                DeclaredArea,
            ],
            DocumentKind::Testification => &[
                PropertyName,
                CaseRole,
                Court,
                Applicant,
                Municipality,
                VerificationCode,
            ],
            DocumentKind::Extract => FieldName::ALL,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical field of a concession record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    /// Name of the mining property (pertenencia / concesión).
    PropertyName,
    /// Court case role number.
    CaseRole,
    /// Court handling the case.
    Court,
    /// Applicant (solicitante).
    Applicant,
    /// Municipality (comuna).
    Municipality,
    /// Gazette verification code (CVE).
    VerificationCode,
    /// Declared area in hectares.
    DeclaredArea,
    /// Name of the property affected by an extract.
    AffectedProperty,
}

impl FieldName {
    pub const ALL: &'static [FieldName] = &[
        FieldName::PropertyName,
        FieldName::CaseRole,
        FieldName::Court,
        FieldName::Applicant,
        FieldName::Municipality,
        FieldName::VerificationCode,
        FieldName::DeclaredArea,
        FieldName::AffectedProperty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::PropertyName => "property_name",
            FieldName::CaseRole => "case_role",
            FieldName::Court => "court",
            FieldName::Applicant => "applicant",
            FieldName::Municipality => "municipality",
            FieldName::VerificationCode => "verification_code",
            FieldName::DeclaredArea => "declared_area",
            FieldName::AffectedProperty => "affected_property",
        }
    }

    /// Document-level fields are shared by both records of a split extract.
    pub fn is_document_level(&self) -> bool {
        matches!(
            self,
            FieldName::Court | FieldName::VerificationCode | FieldName::Municipality
        )
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field value, or the explicit undetermined marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum FieldValue {
    Resolved(String),
    #[default]
    Undetermined,
}

impl FieldValue {
    pub fn is_undetermined(&self) -> bool {
        matches!(self, FieldValue::Undetermined)
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            FieldValue::Resolved(value) => Some(value),
            FieldValue::Undetermined => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_deref().unwrap_or(UNDETERMINED))
    }
}

impl From<FieldValue> for String {
    fn from(value: FieldValue) -> Self {
        value.to_string()
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        if value == UNDETERMINED || value.is_empty() {
            FieldValue::Undetermined
        } else {
            FieldValue::Resolved(value)
        }
    }
}

/// Result of evaluating one field's rule chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub name: FieldName,
    pub value: FieldValue,
    /// Index of the rule that produced the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_index: Option<usize>,
}

impl ExtractedField {
    pub fn resolved(name: FieldName, value: impl Into<String>, rule_index: usize) -> Self {
        Self {
            name,
            value: FieldValue::Resolved(value.into()),
            rule_index: Some(rule_index),
        }
    }

    pub fn undetermined(name: FieldName) -> Self {
        Self {
            name,
            value: FieldValue::Undetermined,
            rule_index: None,
        }
    }
}

/// Labelled dates of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    /// Filing (presentación) date.
    Filing,
    /// Court resolution date.
    Resolution,
    /// Gazette publication date.
    Publication,
}

impl DateField {
    pub const ALL: &'static [DateField] =
        &[DateField::Filing, DateField::Resolution, DateField::Publication];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateField::Filing => "filing_date",
            DateField::Resolution => "resolution_date",
            DateField::Publication => "publication_date",
        }
    }
}

/// A canonical date, or the explicit undetermined marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DateValue {
    Resolved(NaiveDate),
    #[default]
    Undetermined,
}

impl DateValue {
    /// Canonical `DD/MM/YYYY` rendering.
    pub fn canonical(&self) -> String {
        match self {
            DateValue::Resolved(date) => date.format(DATE_FORMAT).to_string(),
            DateValue::Undetermined => UNDETERMINED.to_string(),
        }
    }

    pub fn is_undetermined(&self) -> bool {
        matches!(self, DateValue::Undetermined)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<DateValue> for String {
    fn from(value: DateValue) -> Self {
        value.canonical()
    }
}

impl TryFrom<String> for DateValue {
    type Error = chrono::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == UNDETERMINED {
            return Ok(DateValue::Undetermined);
        }
        NaiveDate::parse_from_str(&value, DATE_FORMAT).map(DateValue::Resolved)
    }
}

/// Which part of a document a record describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordRole {
    /// The only record of the document.
    #[default]
    Single,
    /// The affected (superseded) property of an extract.
    Affected,
    /// The newly measured property of an extract.
    Measured,
}

impl RecordRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordRole::Single => "single",
            RecordRole::Affected => "affected",
            RecordRole::Measured => "measured",
        }
    }
}

/// Assembled output for one mining claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcessionRecord {
    pub kind: DocumentKind,
    pub role: RecordRole,
    pub fields: BTreeMap<FieldName, ExtractedField>,
    pub dates: BTreeMap<DateField, DateValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_point: Option<Coordinate>,
    pub boundary: Boundary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ConcessionRecord {
    /// Value of a field; fields outside the kind's field set are undetermined.
    pub fn field(&self, name: FieldName) -> &FieldValue {
        static MISSING: FieldValue = FieldValue::Undetermined;

        self.fields.get(&name).map(|f| &f.value).unwrap_or(&MISSING)
    }

    pub fn date(&self, field: DateField) -> DateValue {
        self.dates.get(&field).copied().unwrap_or_default()
    }

    /// Flat field-name to string map. Every field name is present.
    pub fn flat_fields(&self) -> BTreeMap<&'static str, String> {
        let mut flat: BTreeMap<&'static str, String> = FieldName::ALL
            .iter()
            .map(|name| (name.as_str(), self.field(*name).to_string()))
            .collect();

        for field in DateField::ALL {
            flat.insert(field.as_str(), self.date(*field).canonical());
        }

        flat
    }
}
