//! Long-format census rows and district boundaries.

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

use super::{CensusType, Level};

/// One observation: region × type × class × unit × year.
///
/// `class1`, `class2` and `unit` are empty cells in the bundled table when a
/// dimension does not apply; they render as `NA` in composite labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensusRecord {
    pub year: i32,
    #[serde(rename = "type")]
    pub census_type: CensusType,
    pub adm1: String,
    pub adm1_code: i64,
    pub adm2: String,
    pub adm2_code: i64,
    pub class1: Option<String>,
    pub class2: Option<String>,
    pub unit: Option<String>,
    pub value: Option<f64>,
}

impl CensusRecord {
    /// Name value for a level
    pub fn name(&self, level: Level) -> &str {
        match level {
            Level::Adm1 => &self.adm1,
            Level::Adm2 => &self.adm2,
        }
    }

    /// Code value for a level
    pub fn code(&self, level: Level) -> i64 {
        match level {
            Level::Adm1 => self.adm1_code,
            Level::Adm2 => self.adm2_code,
        }
    }
}

/// A single district polygon from a boundary layer.
#[derive(Debug, Clone)]
pub struct BoundaryRecord {
    pub year: i32,
    pub adm1_code: Option<i64>,
    pub adm2_code: Option<i64>,
    pub name: Option<String>,
    pub geometry: MultiPolygon<f64>,
}

impl BoundaryRecord {
    /// Join key for a level, if the layer carries that column
    pub fn code(&self, level: Level) -> Option<i64> {
        match level {
            Level::Adm1 => self.adm1_code,
            Level::Adm2 => self.adm2_code,
        }
    }

    /// Get the bounding box of this boundary
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        use geo::BoundingRect;
        self.geometry
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }
}
