//! Left join of wide rows to district boundaries.

use hashbrown::HashMap;
use geo::MultiPolygon;
use tracing::debug;

use crate::error::{CensusError, Result};
use crate::models::{BoundaryRecord, Level, WideRow};

/// Attach geometry to `rows` by `{level}_code`. Unmatched rows keep `None`.
///
/// Returns the number of rows that received a geometry.
pub fn attach_geometry(
    rows: &mut [WideRow],
    boundaries: &[BoundaryRecord],
    level: Level,
    layer: &str,
) -> Result<usize> {
    let mut by_code: HashMap<i64, &MultiPolygon<f64>> = HashMap::new();
    for boundary in boundaries {
        if let Some(code) = boundary.code(level) {
            by_code.entry(code).or_insert(&boundary.geometry);
        }
    }

    if by_code.is_empty() && !boundaries.is_empty() {
        return Err(CensusError::MissingColumn {
            column: level.code_field().to_string(),
            table: layer.to_string(),
        });
    }

    let mut matched = 0;
    for row in rows.iter_mut() {
        row.geometry = row
            .key
            .code(level)
            .and_then(|code| by_code.get(&code))
            .map(|geometry| (*geometry).clone());
        if row.geometry.is_some() {
            matched += 1;
        }
    }

    debug!("Joined {}/{} rows to layer {}", matched, rows.len(), layer);
    Ok(matched)
}
