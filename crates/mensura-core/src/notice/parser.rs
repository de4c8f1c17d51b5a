//! Mining-notice parser: normalize, classify, extract, assemble.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::assembler::RecordAssembler;
use super::classifier::DocumentClassifier;
use crate::error::Result;
use crate::models::{ConcessionRecord, DocumentKind, MensuraConfig};
use crate::text::{NormalizedText, RawDocument};

/// Result of parsing one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Document classification.
    pub kind: DocumentKind,
    /// One record, or two for a split extract.
    pub records: Vec<ConcessionRecord>,
    /// Warnings of all records, without repetitions.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for notice parsing.
pub trait NoticeParser {
    /// Parse a multi-page document. Never fails: anything that cannot be
    /// determined is reported as `Undetermined`.
    fn parse(&self, document: &RawDocument) -> ExtractionResult;

    /// Parse a single block of text.
    fn parse_text(&self, text: &str) -> ExtractionResult {
        self.parse(&RawDocument::from_text(text))
    }
}

/// Rule-based parser for mining-registry publications.
#[derive(Debug, Clone)]
pub struct MensuraParser {
    classifier: DocumentClassifier,
    assembler: RecordAssembler,
}

impl MensuraParser {
    /// Create a parser with the default configuration.
    pub fn new() -> Self {
        Self::from_config(&MensuraConfig::default())
            .expect("default configuration must build a parser")
    }

    /// Create a parser from configuration. Fails only when a configured
    /// phrase cannot be compiled.
    pub fn from_config(config: &MensuraConfig) -> Result<Self> {
        Ok(Self {
            classifier: DocumentClassifier::new(&config.classifier),
            assembler: RecordAssembler::new(config)?,
        })
    }
}

impl Default for MensuraParser {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeParser for MensuraParser {
    fn parse(&self, document: &RawDocument) -> ExtractionResult {
        let start = Instant::now();

        let text = NormalizedText::new(document);
        info!(
            "Parsing notice from {} characters on {} page(s)",
            text.text().len(),
            document.page_count()
        );

        let kind = self.classifier.classify(&text);
        let records = self.assembler.assemble(kind, &text);

        let mut warnings: Vec<String> = Vec::new();
        for warning in records.iter().flat_map(|r| r.warnings.iter()) {
            if !warnings.contains(warning) {
                warnings.push(warning.clone());
            }
        }

        debug!(
            kind = %kind,
            records = records.len(),
            warnings = warnings.len(),
            "Notice parsed"
        );

        ExtractionResult {
            kind,
            records,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
