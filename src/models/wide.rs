//! Wide-format output of a census query.

use geo::MultiPolygon;
use serde::Serialize;
use std::collections::BTreeMap;

use super::{CensusType, Level};

/// Serialized names of the [`RegionKey`] fields, in output order
pub const KEY_COLUMNS: &[&str] = &["year", "type", "adm1", "adm1_code", "adm2", "adm2_code"];

/// Identity of a wide row. `adm2` fields are `None` at provincial level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RegionKey {
    pub year: i32,
    #[serde(rename = "type")]
    pub census_type: CensusType,
    pub adm1: String,
    pub adm1_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adm2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adm2_code: Option<i64>,
}

impl RegionKey {
    /// Same key with the municipal fields dropped
    pub fn to_provincial(&self) -> Self {
        Self {
            adm2: None,
            adm2_code: None,
            ..self.clone()
        }
    }

    /// Code for a level; `None` for `Adm2` on provincial keys
    pub fn code(&self, level: Level) -> Option<i64> {
        match level {
            Level::Adm1 => Some(self.adm1_code),
            Level::Adm2 => self.adm2_code,
        }
    }
}

/// One row per (year, type, adm1[, adm2]) with one value per composite label.
///
/// Columns a region has no observation for are absent from `values`. Value
/// column names never collide with [`KEY_COLUMNS`].
#[derive(Debug, Clone, Serialize)]
pub struct WideRow {
    #[serde(flatten)]
    pub key: RegionKey,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
    #[serde(skip)]
    pub geometry: Option<MultiPolygon<f64>>,
}

impl WideRow {
    pub fn new(key: RegionKey) -> Self {
        Self {
            key,
            values: BTreeMap::new(),
            geometry: None,
        }
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }
}

/// Result of `anycensus`: a schema-on-read wide table.
#[derive(Debug, Clone, Serialize)]
pub struct CensusTable {
    /// Level the caller asked for
    pub requested_level: Level,
    /// Level the rows are actually keyed at (differs after name promotion)
    pub resolved_level: Level,
    /// Sorted composite-label columns observed in the filtered rows
    pub columns: Vec<String>,
    pub rows: Vec<WideRow>,
    /// True when boundary geometry was joined
    pub has_geometry: bool,
}

impl CensusTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when a municipal name query was answered at provincial level
    pub fn was_promoted(&self) -> bool {
        self.requested_level != self.resolved_level
    }

    /// Find the row for a region code at the resolved level
    pub fn row_for_code(&self, code: i64) -> Option<&WideRow> {
        self.rows
            .iter()
            .find(|r| r.key.code(self.resolved_level) == Some(code))
    }
}
