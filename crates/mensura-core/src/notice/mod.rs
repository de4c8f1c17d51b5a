//! Mining-notice field extraction module.

mod assembler;
mod classifier;
mod parser;
pub mod rules;

#[cfg(test)]
pub(crate) mod fixtures;

pub use assembler::{DateExtraction, ExtractSplitter, RecordAssembler, RuleEngine};
pub use classifier::DocumentClassifier;
pub use parser::{ExtractionResult, MensuraParser, NoticeParser};
