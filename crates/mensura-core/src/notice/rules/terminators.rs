//! Capture-until-terminator truncation.

use regex::{Regex, RegexBuilder};

use crate::error::{MensuraError, Result};

/// A set of phrases that end a free-text capture.
///
/// Matching is case-insensitive. The value is cut at the earliest
/// terminator found anywhere in it.
#[derive(Debug, Clone, Default)]
pub struct TerminatorSet {
    pattern: Option<Regex>,
}

impl TerminatorSet {
    pub fn new(phrases: &[String]) -> Result<Self> {
        let alternatives: Vec<String> = phrases
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| regex::escape(p))
            .collect();

        if alternatives.is_empty() {
            return Ok(Self::empty());
        }

        let pattern = RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()
            .map_err(|source| MensuraError::Pattern {
                name: "extraction.terminators".to_string(),
                source,
            })?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// A set that never truncates.
    pub fn empty() -> Self {
        Self { pattern: None }
    }

    /// Prefix of `value` before the earliest terminator, or the whole value.
    pub fn cut<'a>(&self, value: &'a str) -> &'a str {
        match self.pattern.as_ref().and_then(|p| p.find(value)) {
            Some(m) => &value[..m.start()],
            None => value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }
}
