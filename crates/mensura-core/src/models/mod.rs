//! Data models for concession records and pipeline configuration.

pub mod boundary;
pub mod config;
pub mod record;

pub use boundary::{Boundary, BoundarySource, Coordinate, Vertex, VertexList};
pub use config::{
    ClassifierConfig, CoordinateBounds, Crs, ExportConfig, ExtractionConfig, GeometryConfig,
    KindKeywords, MensuraConfig, ScannerConfig,
};
pub use record::{
    ConcessionRecord, DateField, DateValue, DocumentKind, ExtractedField, FieldName, FieldValue,
    RecordRole, UNDETERMINED,
};
