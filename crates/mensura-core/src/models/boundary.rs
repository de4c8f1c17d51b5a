//! Survey coordinates and claim boundaries.

use geo::{Area, LineString, Polygon};
use serde::{Deserialize, Serialize};

/// Square metres in one hectare.
pub const SQUARE_METRES_PER_HECTARE: f64 = 10_000.0;

/// A point in the projected survey plane, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub easting: f64,
    pub northing: f64,
}

impl Coordinate {
    pub fn new(easting: f64, northing: f64) -> Self {
        Self { easting, northing }
    }
}

/// A scanned coordinate with its classification confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub coordinate: Coordinate,
    /// Set when northing and easting were of similar magnitude, so the
    /// larger-is-northing assignment is a guess.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub low_confidence: bool,
}

/// Scanned vertices in appearance order. No closure is implied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexList {
    vertices: Vec<Vertex>,
}

impl VertexList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex unless an equal coordinate is already present.
    /// Returns whether the vertex was added.
    pub fn push_unique(&mut self, vertex: Vertex) -> bool {
        if self.vertices.iter().any(|v| v.coordinate == vertex.coordinate) {
            return false;
        }
        self.vertices.push(vertex);
        true
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn first(&self) -> Option<&Vertex> {
        self.vertices.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.vertices.iter().map(|v| v.coordinate).collect()
    }

    pub fn low_confidence_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.low_confidence).count()
    }
}

impl FromIterator<Vertex> for VertexList {
    fn from_iter<I: IntoIterator<Item = Vertex>>(iter: I) -> Self {
        let mut list = VertexList::new();
        for vertex in iter {
            list.push_unique(vertex);
        }
        list
    }
}

/// How a boundary ring was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum BoundarySource {
    /// Built from the document's vertex table.
    VertexTable,
    /// Square around a reference point sized from an area in hectares.
    RectangularFallback { hectares: f64 },
}

impl BoundarySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundarySource::VertexTable => "vertex_table",
            BoundarySource::RectangularFallback { .. } => "rectangular_fallback",
        }
    }
}

/// Reconstructed claim boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Boundary {
    /// Closed ring: the first and last coordinates are equal.
    Polygon {
        ring: Vec<Coordinate>,
        source: BoundarySource,
    },
    #[default]
    NoGeometry,
}

impl Boundary {
    /// Ring coordinates, empty for `NoGeometry`.
    pub fn ring(&self) -> &[Coordinate] {
        match self {
            Boundary::Polygon { ring, .. } => ring,
            Boundary::NoGeometry => &[],
        }
    }

    pub fn source(&self) -> Option<BoundarySource> {
        match self {
            Boundary::Polygon { source, .. } => Some(*source),
            Boundary::NoGeometry => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Boundary::NoGeometry)
    }

    /// Number of distinct vertices (the closing repetition is not counted).
    pub fn vertex_count(&self) -> usize {
        self.ring().len().saturating_sub(1)
    }

    pub fn is_closed(&self) -> bool {
        match self.ring() {
            [] => true,
            ring => ring.first() == ring.last(),
        }
    }

    /// Convert to a planar polygon with x = easting, y = northing.
    pub fn to_polygon(&self) -> Option<Polygon<f64>> {
        match self {
            Boundary::Polygon { ring, .. } => {
                let exterior: LineString<f64> = ring
                    .iter()
                    .map(|c| (c.easting, c.northing))
                    .collect::<Vec<_>>()
                    .into();
                Some(Polygon::new(exterior, vec![]))
            }
            Boundary::NoGeometry => None,
        }
    }

    /// Planar area of the ring in hectares.
    pub fn area_hectares(&self) -> Option<f64> {
        self.to_polygon()
            .map(|p| p.unsigned_area() / SQUARE_METRES_PER_HECTARE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Boundary {
        Boundary::Polygon {
            ring: vec![
                Coordinate::new(400_000.0, 7_000_100.0),
                Coordinate::new(400_100.0, 7_000_100.0),
                Coordinate::new(400_100.0, 7_000_000.0),
                Coordinate::new(400_000.0, 7_000_000.0),
                Coordinate::new(400_000.0, 7_000_100.0),
            ],
            source: BoundarySource::VertexTable,
        }
    }

    #[test]
    fn test_vertex_list_dedup() {
        let v = Vertex {
            coordinate: Coordinate::new(450_000.0, 7_000_000.0),
            low_confidence: false,
        };
        let mut list = VertexList::new();

        assert!(list.push_unique(v));
        assert!(!list.push_unique(v));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_boundary_area_and_count() {
        let boundary = square();

        assert!(boundary.is_closed());
        assert_eq!(boundary.vertex_count(), 4);
        assert!((boundary.area_hectares().unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_geometry() {
        let boundary = Boundary::NoGeometry;

        assert!(boundary.ring().is_empty());
        assert_eq!(boundary.vertex_count(), 0);
        assert!(boundary.to_polygon().is_none());
        assert!(boundary.area_hectares().is_none());
    }

    #[test]
    fn test_boundary_serialization() {
        let json = serde_json::to_value(Boundary::NoGeometry).unwrap();
        assert_eq!(json["type"], "no_geometry");

        let json = serde_json::to_value(square()).unwrap();
        assert_eq!(json["type"], "polygon");
        assert_eq!(json["source"]["method"], "vertex_table");
        assert_eq!(json["ring"].as_array().unwrap().len(), 5);
    }
}
