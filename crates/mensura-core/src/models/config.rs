//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MensuraError, Result};
use crate::models::record::DocumentKind;

/// Main configuration for the mensura pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MensuraConfig {
    /// Coordinate scanner configuration.
    pub scanner: ScannerConfig,

    /// Boundary reconstruction configuration.
    pub geometry: GeometryConfig,

    /// Document classification configuration.
    pub classifier: ClassifierConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Export configuration, consumed by the writers outside the core.
    pub export: ExportConfig,
}

/// Valid survey-plane ranges, in metres.
///
/// Defaults are the Chile UTM zone 19 South convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinateBounds {
    pub northing_min: f64,
    pub northing_max: f64,
    pub easting_min: f64,
    pub easting_max: f64,
}

pub const DEFAULT_NORTHING_MIN: f64 = 6_000_000.0;
pub const DEFAULT_NORTHING_MAX: f64 = 8_000_000.0;
pub const DEFAULT_EASTING_MIN: f64 = 200_000.0;
pub const DEFAULT_EASTING_MAX: f64 = 900_000.0;

impl Default for CoordinateBounds {
    fn default() -> Self {
        Self {
            northing_min: DEFAULT_NORTHING_MIN,
            northing_max: DEFAULT_NORTHING_MAX,
            easting_min: DEFAULT_EASTING_MIN,
            easting_max: DEFAULT_EASTING_MAX,
        }
    }
}

impl CoordinateBounds {
    /// Check whether a northing value is inside the configured range.
    pub fn contains_northing(&self, value: f64) -> bool {
        (self.northing_min..=self.northing_max).contains(&value)
    }

    /// Check whether an easting value is inside the configured range.
    pub fn contains_easting(&self, value: f64) -> bool {
        (self.easting_min..=self.easting_max).contains(&value)
    }
}

/// Coordinate scanner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Valid ranges for northing/easting classification.
    pub bounds: CoordinateBounds,

    /// Maximum number of characters between two numbers of one pair.
    pub max_pair_gap: usize,

    /// Pairs whose relative magnitude difference is below this ratio are
    /// flagged as low confidence.
    pub low_confidence_ratio: f64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            bounds: CoordinateBounds::default(),
            max_pair_gap: 48,
            low_confidence_ratio: 0.5,
        }
    }
}

/// Boundary reconstruction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Hectares used by the rectangular fallback when the document does not
    /// declare an area. `None` disables the fallback in that case.
    pub default_hectares: Option<f64>,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            default_hectares: Some(100.0),
        }
    }
}

/// Keywords that identify one document kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindKeywords {
    pub kind: DocumentKind,
    /// Upper-case, accent-free keywords.
    pub keywords: Vec<String>,
}

impl KindKeywords {
    fn new(kind: DocumentKind, keywords: &[&str]) -> Self {
        Self {
            kind,
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

/// Document classification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Keyword sets in precedence order. The first kind with a matching
    /// keyword wins.
    pub precedence: Vec<KindKeywords>,

    /// Markers of a legal notice. When no kind keyword matches but one of
    /// these does, the document is an extract.
    pub notice_markers: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            precedence: vec![
                KindKeywords::new(DocumentKind::Rectification, &["RECTIFICACION", "RECTIFICA"]),
                KindKeywords::new(DocumentKind::Testification, &["TESTIFICACION", "TESTIFICA"]),
                KindKeywords::new(DocumentKind::Mensura, &["MENSURA"]),
                KindKeywords::new(DocumentKind::Manifestation, &["MANIFESTACION", "MANIFIESTO"]),
                KindKeywords::new(DocumentKind::Pedimento, &["PEDIMENTO"]),
            ],
            notice_markers: [
                "EXTRACTO",
                "JUZGADO",
                "CONCESION MINERA",
                "BOLETIN OFICIAL",
                "CVE",
            ]
            .iter()
            .map(|m| (*m).to_string())
            .collect(),
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Phrases that end a name or applicant capture. Matched
    /// case-insensitively.
    pub terminators: Vec<String>,

    /// Phrases that separate the affected property from the newly measured
    /// one in an extract. The earliest occurrence in the text wins; ties go
    /// to the phrase listed first.
    pub extract_separators: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            terminators: [
                ", R.U.T.",
                " R.U.T.",
                ", RUT",
                ", cédula",
                " cédula",
                ", C.I.",
                ", domiciliad",
                " domiciliad",
                ", chilen",
                ", abogad",
                ", ingenier",
                ", ubicad",
                ", en representación",
                " en representación",
                ", comuna",
                " comuna de",
                ", Rol",
                " Rol ",
                ", solicita",
                ", a usted",
                ".-",
            ]
            .iter()
            .map(|t| (*t).to_string())
            .collect(),
            extract_separators: [
                "en su reemplazo",
                "nueva concesión",
                "nueva pertenencia",
                "quedando constituida",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        }
    }
}

/// Coordinate reference system written by the GIS export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crs {
    /// WGS 84 / UTM zone 19S.
    #[default]
    Epsg32719,
    /// PSAD56 / UTM zone 19S.
    Epsg24879,
}

impl Crs {
    /// EPSG code.
    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Epsg32719 => 32719,
            Crs::Epsg24879 => 24879,
        }
    }

    /// OGC URN, as written in a GeoJSON `crs` member.
    pub fn urn(&self) -> String {
        format!("urn:ogc:def:crs:EPSG::{}", self.epsg())
    }
}

/// Export configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Coordinate reference system of exported boundaries.
    pub crs: Crs,
}

impl MensuraConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let bounds = &self.scanner.bounds;
        if bounds.northing_min >= bounds.northing_max {
            return Err(MensuraError::Config(format!(
                "scanner.bounds: northing_min ({}) must be below northing_max ({})",
                bounds.northing_min, bounds.northing_max
            )));
        }
        if bounds.easting_min >= bounds.easting_max {
            return Err(MensuraError::Config(format!(
                "scanner.bounds: easting_min ({}) must be below easting_max ({})",
                bounds.easting_min, bounds.easting_max
            )));
        }
        if !(0.0..=1.0).contains(&self.scanner.low_confidence_ratio) {
            return Err(MensuraError::Config(format!(
                "scanner.low_confidence_ratio must be within 0..=1, got {}",
                self.scanner.low_confidence_ratio
            )));
        }
        if self.scanner.max_pair_gap == 0 {
            return Err(MensuraError::Config(
                "scanner.max_pair_gap must be greater than zero".to_string(),
            ));
        }
        if let Some(hectares) = self.geometry.default_hectares {
            if !hectares.is_finite() || hectares <= 0.0 {
                return Err(MensuraError::Config(format!(
                    "geometry.default_hectares must be positive, got {}",
                    hectares
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MensuraConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MensuraConfig =
            serde_json::from_str(r#"{"geometry": {"default_hectares": null}}"#).unwrap();

        assert_eq!(config.geometry.default_hectares, None);
        assert_eq!(config.scanner, ScannerConfig::default());
        assert_eq!(config.export.crs, Crs::Epsg32719);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut config = MensuraConfig::default();
        config.scanner.bounds.easting_min = 950_000.0;

        assert!(matches!(config.validate(), Err(MensuraError::Config(_))));
    }

    #[test]
    fn test_crs_urn() {
        assert_eq!(Crs::Epsg24879.urn(), "urn:ogc:def:crs:EPSG::24879");
        assert_eq!(
            serde_json::to_string(&Crs::Epsg32719).unwrap(),
            "\"epsg32719\""
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = MensuraConfig::default();
        config.export.crs = Crs::Epsg24879;
        config.save(&path).unwrap();

        let loaded = MensuraConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
