//! UTM coordinate scanning.
//!
//! Numbers are read line by line. Two consecutive numbers close enough to
//! each other form a candidate pair; the larger one is taken as the northing.
//! A number ending a line unpaired may pair with the first one of the next.
//! A pair survives only if both values fall inside the configured bounds.

use tracing::{debug, trace};

use super::numbers::parse_coordinate;
use super::patterns::{COORDINATE_NUMBER, MONEY_PREFIX, REFERENCE_POINT_LABEL, RUT_SUFFIX};
use crate::models::{Coordinate, ScannerConfig, Vertex, VertexList};

/// Characters after a reference-point label searched for its coordinates.
const REFERENCE_WINDOW: usize = 160;

/// Characters before a number searched for a currency marker.
const MONEY_LOOKBEHIND: usize = 6;

#[derive(Debug, Clone, Copy)]
struct Number {
    value: f64,
    start: usize,
    end: usize,
}

/// Last number of a line that found no partner on that line.
#[derive(Debug, Clone, Copy)]
struct Trailing {
    value: f64,
    /// Characters after the number up to the end of its line.
    tail: usize,
}

struct LineScan {
    vertices: Vec<Vertex>,
    trailing: Option<Trailing>,
}

/// Finds survey vertices in free text.
#[derive(Debug, Clone, Default)]
pub struct CoordinateScanner {
    config: ScannerConfig,
}

impl CoordinateScanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Scan every line of `text`, in order, deduplicating identical pairs.
    pub fn scan(&self, text: &str) -> VertexList {
        self.scan_lines(text.lines())
    }

    /// Scan pre-split lines. A number left unpaired at the end of a line may
    /// pair with the first number of the next line (`Norte: …` / `Este: …`
    /// layouts), within the same `max_pair_gap`.
    pub fn scan_lines<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> VertexList {
        let mut vertices = VertexList::new();
        let mut carry: Option<Trailing> = None;

        for line in lines {
            let numbers = numbers_in(line);
            let mut found = Vec::new();
            let mut from = 0;

            if let (Some(previous), Some(first)) = (carry.take(), numbers.first()) {
                let gap = previous.tail + 1 + line[..first.start].chars().count();
                if gap <= self.config.max_pair_gap {
                    if let Some(vertex) = self.classify(previous.value, first.value) {
                        trace!(first = previous.value, second = first.value, "Pair spans a line break");
                        found.push(vertex);
                        from = 1;
                    }
                }
            }

            let scan = self.scan_numbers(line, &numbers, from);
            found.extend(scan.vertices);
            carry = scan.trailing;

            for vertex in found {
                if !vertices.push_unique(vertex) {
                    trace!(
                        easting = vertex.coordinate.easting,
                        northing = vertex.coordinate.northing,
                        "Duplicate vertex dropped"
                    );
                }
            }
        }

        vertices
    }

    /// Coordinates following a reference-point label (`punto medio`, `P.M.`,
    /// `PI`), if any label is followed by a valid pair.
    pub fn reference_point(&self, text: &str) -> Option<Coordinate> {
        REFERENCE_POINT_LABEL.find_iter(text).find_map(|label| {
            let rest = &text[label.end()..];
            let window_end = rest
                .char_indices()
                .nth(REFERENCE_WINDOW)
                .map(|(i, _)| i)
                .unwrap_or(rest.len());

            let found = self.scan_line(&rest[..window_end]).into_iter().next();
            if let Some(vertex) = found {
                debug!(
                    label = label.as_str(),
                    easting = vertex.coordinate.easting,
                    northing = vertex.coordinate.northing,
                    "Reference point found"
                );
            }
            found.map(|v| v.coordinate)
        })
    }

    fn scan_line(&self, line: &str) -> Vec<Vertex> {
        self.scan_numbers(line, &numbers_in(line), 0).vertices
    }

    /// Pair `numbers[from..]` of one line with a sliding window.
    fn scan_numbers(&self, line: &str, numbers: &[Number], from: usize) -> LineScan {
        let mut vertices = Vec::new();
        let mut last_paired = false;
        let mut i = from;

        while i + 1 < numbers.len() {
            let (a, b) = (numbers[i], numbers[i + 1]);
            let gap = line[a.end..b.start].chars().count();

            if gap > self.config.max_pair_gap {
                trace!(first = a.value, second = b.value, gap, "Numbers too far apart to pair");
                i += 1;
                continue;
            }

            match self.classify(a.value, b.value) {
                Some(vertex) => {
                    vertices.push(vertex);
                    last_paired = i + 2 == numbers.len();
                    i += 2;
                }
                None => {
                    debug!(first = a.value, second = b.value, "Pair outside coordinate bounds");
                    i += 1;
                }
            }
        }

        let trailing = numbers
            .last()
            .filter(|_| numbers.len() > from && !last_paired)
            .map(|n| Trailing {
                value: n.value,
                tail: line[n.end..].chars().count(),
            });

        LineScan { vertices, trailing }
    }

    /// Larger value is the northing. `None` when either value is out of range.
    fn classify(&self, a: f64, b: f64) -> Option<Vertex> {
        let (northing, easting) = if a >= b { (a, b) } else { (b, a) };
        let bounds = &self.config.bounds;

        if !bounds.contains_northing(northing) || !bounds.contains_easting(easting) {
            return None;
        }

        let ratio = (northing - easting) / northing;

        Some(Vertex {
            coordinate: Coordinate::new(easting, northing),
            low_confidence: ratio < self.config.low_confidence_ratio,
        })
    }
}

fn numbers_in(line: &str) -> Vec<Number> {
    COORDINATE_NUMBER
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let integer = caps.get(1)?;

            if RUT_SUFFIX.is_match(&line[whole.end()..]) {
                trace!(number = whole.as_str(), "Skipping RUT");
                return None;
            }
            if has_money_prefix(line, whole.start()) {
                trace!(number = whole.as_str(), "Skipping amount");
                return None;
            }

            let value = parse_coordinate(integer.as_str(), caps.get(2).map(|m| m.as_str()))?;
            value.is_finite().then_some(Number {
                value,
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

fn has_money_prefix(line: &str, start: usize) -> bool {
    let before = &line[..start];
    let from = before
        .char_indices()
        .rev()
        .nth(MONEY_LOOKBEHIND - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    MONEY_PREFIX.is_match(&before[from..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CoordinateBounds;
    use pretty_assertions::assert_eq;

    fn scanner() -> CoordinateScanner {
        CoordinateScanner::default()
    }

    #[test]
    fn test_vertex_table() {
        let text = "\
V1   7.012.345,00   456.789,00
V2   7.012.345,00   458.789,00
V3   7.011.345,00   458.789,00
V4   7.011.345,00   456.789,00";

        let vertices = scanner().scan(text);
        assert_eq!(
            vertices.coordinates(),
            vec![
                Coordinate::new(456_789.0, 7_012_345.0),
                Coordinate::new(458_789.0, 7_012_345.0),
                Coordinate::new(458_789.0, 7_011_345.0),
                Coordinate::new(456_789.0, 7_011_345.0),
            ]
        );
        assert_eq!(vertices.low_confidence_count(), 0);
    }

    #[test]
    fn test_easting_first_and_plain_digits() {
        let vertices = scanner().scan("Este 456789,5 Norte 7012345");
        assert_eq!(vertices.coordinates(), vec![Coordinate::new(456_789.5, 7_012_345.0)]);
    }

    #[test]
    fn test_rut_and_amounts_ignored() {
        let text = "R.U.T. 7.654.321-K, 12.345.678-9 pagó $ 1.500.000 Norte 7.000.100 Este 400.100";
        let vertices = scanner().scan(text);

        assert_eq!(vertices.coordinates(), vec![Coordinate::new(400_100.0, 7_000_100.0)]);
    }

    #[test]
    fn test_out_of_range_slides_window() {
        // 1.000.000 is neither a valid northing nor easting; 7.000.000 pairs with 450.000.
        let vertices = scanner().scan("1.000.000 7.000.000 450.000");
        assert_eq!(vertices.coordinates(), vec![Coordinate::new(450_000.0, 7_000_000.0)]);
    }

    #[test]
    fn test_pair_spans_line_break() {
        let vertices = scanner().scan("Norte 7.000.000\nEste 450.000");
        assert_eq!(vertices.coordinates(), vec![Coordinate::new(450_000.0, 7_000_000.0)]);

        let far = format!("Norte 7.000.000 {}\nEste 450.000", "x".repeat(60));
        assert!(scanner().scan(&far).is_empty());
    }

    #[test]
    fn test_vertical_vertex_table() {
        let text = "\
V1
Norte: 7.012.345,00
Este: 456.789,00
V2
Norte: 7.012.345,00
Este: 458.789,00
V3
Norte: 7.011.345,00
Este: 458.789,00";

        let vertices = scanner().scan(text);
        assert_eq!(
            vertices.coordinates(),
            vec![
                Coordinate::new(456_789.0, 7_012_345.0),
                Coordinate::new(458_789.0, 7_012_345.0),
                Coordinate::new(458_789.0, 7_011_345.0),
            ]
        );
    }

    #[test]
    fn test_paired_line_does_not_carry() {
        // The second line's first number is already a complete pair with its neighbour.
        let vertices = scanner().scan("V1 7.000.000 450.000\n7.000.500 450.500");
        assert_eq!(
            vertices.coordinates(),
            vec![
                Coordinate::new(450_000.0, 7_000_000.0),
                Coordinate::new(450_500.0, 7_000_500.0),
            ]
        );
    }

    #[test]
    fn test_gap_limit() {
        let far = format!("7.000.000 {} 450.000", "x".repeat(60));
        assert!(scanner().scan(&far).is_empty());

        let near = format!("7.000.000 {} 450.000", "x".repeat(10));
        assert_eq!(scanner().scan(&near).len(), 1);
    }

    #[test]
    fn test_duplicates_removed() {
        let vertices = scanner().scan("V1 7.000.000 450.000\nV1 7.000.000 450.000");
        assert_eq!(vertices.len(), 1);
    }

    #[test]
    fn test_low_confidence_flag() {
        let config = ScannerConfig {
            bounds: CoordinateBounds {
                northing_min: 100_000.0,
                northing_max: 900_000.0,
                easting_min: 100_000.0,
                easting_max: 900_000.0,
            },
            ..ScannerConfig::default()
        };
        let vertices = CoordinateScanner::new(config).scan("500.000 400.000");

        assert_eq!(vertices.len(), 1);
        assert_eq!(vertices.low_confidence_count(), 1);
        assert_eq!(
            vertices.first().unwrap().coordinate,
            Coordinate::new(400_000.0, 500_000.0)
        );
    }

    #[test]
    fn test_reference_point() {
        let text = "Manifestación LA ROSA, cuyo punto medio tiene coordenadas \
                    U.T.M. Norte: 7.050.000 metros y Este: 380.000 metros, comuna de Copiapó";

        assert_eq!(
            scanner().reference_point(text),
            Some(Coordinate::new(380_000.0, 7_050_000.0))
        );
        assert_eq!(scanner().reference_point("sin coordenadas"), None);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let scanner = scanner();

        assert_eq!(
            scanner.scan("6.000.000 200.000").coordinates(),
            vec![Coordinate::new(200_000.0, 6_000_000.0)]
        );
        assert_eq!(
            scanner.scan("8.000.000 900.000").coordinates(),
            vec![Coordinate::new(900_000.0, 8_000_000.0)]
        );
        assert!(scanner.scan("5.999.999 200.000").is_empty());
        assert!(scanner.scan("8.000.001 450.000").is_empty());
        assert!(scanner.scan("7.000.000 199.999").is_empty());
        assert!(scanner.scan("7.000.000 900.001").is_empty());
    }
}
