//! Core library for mining-registry notice extraction.
//!
//! This crate provides:
//! - Text normalization of multi-page documents
//! - Keyword classification of notice kinds
//! - Rule-chain extraction of named fields and Spanish dates
//! - UTM coordinate scanning and claim boundary reconstruction
//! - Concession record assembly, including split extracts

pub mod error;
pub mod geometry;
pub mod models;
pub mod notice;
pub mod text;

pub use error::{MensuraError, Result};
pub use geometry::GeometryBuilder;
pub use models::{
    Boundary, BoundarySource, ConcessionRecord, Coordinate, DateField, DateValue, DocumentKind,
    FieldName, FieldValue, MensuraConfig, RecordRole, UNDETERMINED,
};
pub use notice::{ExtractionResult, MensuraParser, NoticeParser};
pub use text::{NormalizedText, RawDocument};
