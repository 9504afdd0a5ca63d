//! Boundary layers stored as one GeoJSON FeatureCollection per `{level}_{year}`.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use geojson::{Feature, GeoJson, Value};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{CensusError, Result};
use crate::models::BoundaryRecord;

const LAYER_EXTENSION: &str = "geojson";

/// Read a boundary layer file into district records.
pub fn read_layer(path: &Path, layer: &str, year: i32) -> Result<Vec<BoundaryRecord>> {
    if !path.is_file() {
        return Err(CensusError::LayerNotFound(layer.to_string()));
    }

    info!("Loading boundary layer {} from {}", layer, path.display());

    let content = fs::read_to_string(path).map_err(|e| CensusError::load_failure(layer, e))?;
    parse_layer(&content, layer, year)
}

pub(crate) fn parse_layer(content: &str, layer: &str, year: i32) -> Result<Vec<BoundaryRecord>> {
    let geojson: GeoJson = content
        .parse()
        .map_err(|e| CensusError::load_failure(layer, format!("invalid GeoJSON: {}", e)))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(CensusError::load_failure(
                layer,
                "expected a FeatureCollection",
            ))
        }
    };

    let mut records = Vec::with_capacity(collection.features.len());
    for (idx, feature) in collection.features.iter().enumerate() {
        match convert_feature(feature, year) {
            Some(record) => records.push(record),
            None => {
                return Err(CensusError::load_failure(
                    layer,
                    format!("feature {} has no polygon geometry", idx),
                ))
            }
        }
    }

    debug!("Layer {}: {} districts", layer, records.len());
    Ok(records)
}

fn convert_feature(feature: &Feature, year: i32) -> Option<BoundaryRecord> {
    let geometry = feature.geometry.as_ref()?;
    let geometry = match &geometry.value {
        Value::Polygon(rings) => MultiPolygon::new(vec![convert_polygon(rings)?]),
        Value::MultiPolygon(polygons) => MultiPolygon::new(
            polygons
                .iter()
                .map(|rings| convert_polygon(rings))
                .collect::<Option<Vec<_>>>()?,
        ),
        _ => return None,
    };

    let name = ["adm2", "adm1", "name"]
        .iter()
        .find_map(|key| feature.property(key).and_then(|v| v.as_str()))
        .map(|s| s.to_string());

    Some(BoundaryRecord {
        year,
        adm1_code: feature.property("adm1_code").and_then(json_code),
        adm2_code: feature.property("adm2_code").and_then(json_code),
        name,
        geometry,
    })
}

/// Codes may be stored as numbers or numeric strings
fn json_code(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn convert_ring(coords: &[Vec<f64>]) -> LineString<f64> {
    LineString::new(
        coords
            .iter()
            .filter(|c| c.len() >= 2)
            .map(|c| Coord { x: c[0], y: c[1] })
            .collect(),
    )
}

fn convert_polygon(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    Some(Polygon::new(
        convert_ring(exterior),
        interiors.iter().map(|r| convert_ring(r)).collect(),
    ))
}

/// Convert a multipolygon back into a GeoJSON geometry value.
pub fn multipolygon_to_value(geometry: &MultiPolygon<f64>) -> Value {
    let ring = |line: &LineString<f64>| -> Vec<Vec<f64>> {
        line.coords().map(|c| vec![c.x, c.y]).collect()
    };
    Value::MultiPolygon(
        geometry
            .iter()
            .map(|poly| {
                std::iter::once(ring(poly.exterior()))
                    .chain(poly.interiors().iter().map(ring))
                    .collect()
            })
            .collect(),
    )
}

/// List layer names (`adm2_2020`, ...) available in a boundary directory.
pub fn list_layers(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        warn!("Boundary directory not found: {}", dir.display());
        return Ok(Vec::new());
    }

    let mut layers = Vec::new();
    for entry in WalkDir::new(dir).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| CensusError::load_failure(dir.display().to_string(), e))?;
        let path = entry.path();
        if !path.is_file() || path.extension().map_or(true, |e| e != LAYER_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            layers.push(stem.to_string());
        }
    }
    layers.sort();
    Ok(layers)
}
