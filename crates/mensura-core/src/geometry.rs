//! Claim boundary reconstruction.

use tracing::debug;

use crate::models::boundary::SQUARE_METRES_PER_HECTARE;
use crate::models::{Boundary, BoundarySource, Coordinate, GeometryConfig, VertexList};

/// Minimum number of distinct vertices for a vertex-table ring.
pub const MIN_RING_VERTICES: usize = 3;

/// Builds a closed boundary from scanned vertices, or a square fallback.
#[derive(Debug, Clone, Default)]
pub struct GeometryBuilder {
    config: GeometryConfig,
}

impl GeometryBuilder {
    pub fn new(config: GeometryConfig) -> Self {
        Self { config }
    }

    /// Reconstruct a boundary.
    ///
    /// With at least three vertices the ring follows table order. Otherwise a
    /// square of `declared_hectares` (or the configured default) is centred on
    /// `reference`, or on the only vertex when exactly one was scanned.
    pub fn build(
        &self,
        vertices: &VertexList,
        reference: Option<Coordinate>,
        declared_hectares: Option<f64>,
    ) -> Boundary {
        if vertices.len() >= MIN_RING_VERTICES {
            return Boundary::Polygon {
                ring: close_ring(vertices.coordinates()),
                source: BoundarySource::VertexTable,
            };
        }

        // A lone scanned pair stands in for an unlabelled reference point;
        // two pairs describe neither a ring nor a single point.
        let implicit = match vertices.len() {
            1 => vertices.first().map(|v| v.coordinate),
            _ => None,
        };
        let Some(center) = reference.or(implicit) else {
            debug!(
                vertices = vertices.len(),
                "No reference point for the rectangular fallback, no geometry"
            );
            return Boundary::NoGeometry;
        };

        let Some(hectares) = declared_hectares.or(self.config.default_hectares) else {
            debug!("No area available for the rectangular fallback");
            return Boundary::NoGeometry;
        };

        match rectangle(center, hectares) {
            Some(ring) => {
                debug!(
                    easting = center.easting,
                    northing = center.northing,
                    hectares,
                    "Rectangular fallback boundary"
                );
                Boundary::Polygon {
                    ring,
                    source: BoundarySource::RectangularFallback { hectares },
                }
            }
            None => Boundary::NoGeometry,
        }
    }
}

/// Append the first coordinate unless the ring is already closed.
pub fn close_ring(mut ring: Vec<Coordinate>) -> Vec<Coordinate> {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last()) {
        if first != *last {
            ring.push(first);
        }
    }
    ring
}

/// Square of `hectares` centred on `center`, NW → NE → SE → SW → NW.
/// `None` for non-positive or non-finite areas.
pub fn rectangle(center: Coordinate, hectares: f64) -> Option<Vec<Coordinate>> {
    if !hectares.is_finite() || hectares <= 0.0 {
        return None;
    }

    let half = (hectares * SQUARE_METRES_PER_HECTARE).sqrt() / 2.0;
    let (e, n) = (center.easting, center.northing);

    Some(vec![
        Coordinate::new(e - half, n + half),
        Coordinate::new(e + half, n + half),
        Coordinate::new(e + half, n - half),
        Coordinate::new(e - half, n - half),
        Coordinate::new(e - half, n + half),
    ])
}
