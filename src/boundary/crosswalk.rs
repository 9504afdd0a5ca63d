//! Polygon overlay between two boundary layers.

use geo::{Area, BooleanOps, MultiPolygon};
use serde_json::{json, Map};
use tracing::{debug, info};

use super::index::BoundaryIndex;
use crate::models::BoundaryRecord;
use crate::source::multipolygon_to_value;

/// Pieces smaller than this are overlay noise along shared edges
const MIN_PIECE_AREA: f64 = 1e-9;

/// One face of the overlay.
///
/// Both codes are set for intersections; one side is `None` for the part of a
/// district not covered by any district of the other year.
#[derive(Debug, Clone)]
pub struct CrosswalkPiece {
    pub adm2_code_1: Option<i64>,
    pub adm2_code_2: Option<i64>,
    pub area: f64,
    pub geometry: MultiPolygon<f64>,
}

impl CrosswalkPiece {
    fn new(
        adm2_code_1: Option<i64>,
        adm2_code_2: Option<i64>,
        geometry: MultiPolygon<f64>,
    ) -> Option<Self> {
        let area = geometry.unsigned_area();
        (area > MIN_PIECE_AREA).then_some(Self {
            adm2_code_1,
            adm2_code_2,
            area,
            geometry,
        })
    }

    pub fn to_feature(&self) -> geojson::Feature {
        let mut properties = Map::new();
        properties.insert("adm2_code_1".to_string(), json!(self.adm2_code_1));
        properties.insert("adm2_code_2".to_string(), json!(self.adm2_code_2));
        properties.insert("area".to_string(), json!(self.area));

        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(multipolygon_to_value(&self.geometry))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

fn subtract_all<'a, I>(base: &MultiPolygon<f64>, others: I) -> MultiPolygon<f64>
where
    I: IntoIterator<Item = &'a MultiPolygon<f64>>,
{
    others
        .into_iter()
        .fold(base.clone(), |rest, other| rest.difference(other))
}

/// Full overlay of `first` and `second`: every intersection plus each
/// district's remainder outside the other layer.
pub fn overlay(first: &[BoundaryRecord], second: &[BoundaryRecord]) -> Vec<CrosswalkPiece> {
    info!(
        "Overlaying {} x {} districts",
        first.len(),
        second.len()
    );

    let index = BoundaryIndex::build(second);
    let mut pieces = Vec::new();
    let mut hits_second: Vec<Vec<usize>> = vec![Vec::new(); second.len()];

    for (i, a) in first.iter().enumerate() {
        let mut hits_first = Vec::new();

        for j in index.candidates(a) {
            let b = &second[j];
            let shared = a.geometry.intersection(&b.geometry);
            if let Some(piece) = CrosswalkPiece::new(a.adm2_code, b.adm2_code, shared) {
                pieces.push(piece);
                hits_first.push(j);
                hits_second[j].push(i);
            }
        }

        let rest = subtract_all(&a.geometry, hits_first.iter().map(|&j| &second[j].geometry));
        pieces.extend(CrosswalkPiece::new(a.adm2_code, None, rest));
    }

    for (j, b) in second.iter().enumerate() {
        let rest = subtract_all(&b.geometry, hits_second[j].iter().map(|&i| &first[i].geometry));
        pieces.extend(CrosswalkPiece::new(None, b.adm2_code, rest));
    }

    debug!("Overlay produced {} pieces", pieces.len());
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn rect(code: i64, x0: f64, x1: f64) -> BoundaryRecord {
        BoundaryRecord {
            year: 0,
            adm1_code: None,
            adm2_code: Some(code),
            name: None,
            geometry: MultiPolygon::new(vec![polygon![
                (x: x0, y: 0.0),
                (x: x1, y: 0.0),
                (x: x1, y: 1.0),
                (x: x0, y: 1.0),
            ]]),
        }
    }

    fn find(pieces: &[CrosswalkPiece], a: Option<i64>, b: Option<i64>) -> Option<&CrosswalkPiece> {
        pieces
            .iter()
            .find(|p| p.adm2_code_1 == a && p.adm2_code_2 == b)
    }

    #[test]
    fn test_split_district() {
        // one district in the first year, split in two in the second
        let first = vec![rect(1, 0.0, 2.0)];
        let second = vec![rect(10, 0.0, 1.0), rect(11, 1.0, 2.0)];
        let pieces = overlay(&first, &second);

        assert_eq!(pieces.len(), 2);
        assert!((find(&pieces, Some(1), Some(10)).unwrap().area - 1.0).abs() < 1e-9);
        assert!((find(&pieces, Some(1), Some(11)).unwrap().area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_uncovered_remainders() {
        let first = vec![rect(1, 0.0, 2.0)];
        let second = vec![rect(10, 1.0, 3.0)];
        let pieces = overlay(&first, &second);

        assert_eq!(pieces.len(), 3);
        assert!((find(&pieces, Some(1), Some(10)).unwrap().area - 1.0).abs() < 1e-9);
        assert!((find(&pieces, Some(1), None).unwrap().area - 1.0).abs() < 1e-9);
        assert!((find(&pieces, None, Some(10)).unwrap().area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_touching_districts_yield_no_sliver() {
        let pieces = overlay(&[rect(1, 0.0, 1.0)], &[rect(2, 1.0, 2.0)]);
        assert_eq!(pieces.len(), 2);
        assert!(find(&pieces, Some(1), Some(2)).is_none());
    }

    #[test]
    fn test_feature_properties() {
        let pieces = overlay(&[rect(1, 0.0, 1.0)], &[]);
        let feature = pieces[0].to_feature();
        assert_eq!(feature.property("adm2_code_1"), Some(&json!(1)));
        assert_eq!(feature.property("adm2_code_2"), Some(&serde_json::Value::Null));
    }
}
