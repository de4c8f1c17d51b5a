//! Text normalization.

mod normalizer;

pub use normalizer::{collapse_whitespace, fold, NormalizedText, RawDocument, PAGE_BREAK};
