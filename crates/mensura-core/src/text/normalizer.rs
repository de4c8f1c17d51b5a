//! Whitespace normalization of multi-page text.

use serde::{Deserialize, Serialize};

/// Page separator used by plain-text exports of multi-page documents.
pub const PAGE_BREAK: char = '\u{000c}';

/// Characters removed before any other processing.
const INVISIBLE: &[char] = &['\u{00ad}', '\u{200b}', '\u{200c}', '\u{200d}', '\u{feff}'];

/// Ordered page texts of one source document, as supplied by the reader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    pages: Vec<String>,
}

impl RawDocument {
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a plain-text dump into pages at form feeds.
    pub fn from_text(text: &str) -> Self {
        Self::from_pages(text.split(PAGE_BREAK))
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.trim().is_empty())
    }
}

/// Normalized views of a document's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    lines: Vec<String>,
    folded: String,
}

impl NormalizedText {
    /// Build all views from a raw document. Never fails; empty pages
    /// contribute nothing.
    pub fn new(document: &RawDocument) -> Self {
        let pages: Vec<String> = document
            .pages()
            .iter()
            .map(|p| strip_invisible(p))
            .filter(|p| !p.trim().is_empty())
            .collect();

        let text = collapse_whitespace(&pages.join(" "));

        let lines = pages
            .join("\n")
            .lines()
            .map(|l| l.trim_end().to_string())
            .filter(|l| !l.trim().is_empty())
            .collect();

        let folded = fold(&text);

        Self { text, lines, folded }
    }

    /// Build the views from a single already-joined string.
    pub fn from_text(text: &str) -> Self {
        Self::new(&RawDocument::from_pages([text]))
    }

    /// Whitespace-collapsed single-line text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Physical lines, internal spacing preserved.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Upper-cased text without Spanish diacritics, for keyword tests.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn strip_invisible(s: &str) -> String {
    s.chars().filter(|c| !INVISIBLE.contains(c)).collect()
}

/// Collapse every whitespace run (newlines and NBSP included) to one space.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-case and remove acute accents and diaeresis. `Ñ` is kept.
pub fn fold(s: &str) -> String {
    s.chars()
        .flat_map(char::to_uppercase)
        .map(|c| match c {
            'Á' | 'À' | 'Â' | 'Ä' => 'A',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'Ó' | 'Ò' | 'Ô' | 'Ö' => 'O',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            other => other,
        })
        .collect()
}
