//! `CensusKr`: the public entry point over a configured data root.

use std::sync::Arc;
use tracing::{info, warn};

use crate::boundary::{overlay, CrosswalkPiece};
use crate::config::Config;
use crate::error::{CensusError, Result};
use crate::models::{BoundaryRecord, CensusRecord, CensusTable, Level};
use crate::query::{self, CensusQuery};
use crate::source::DataSource;

/// Census query handle bound to one data root
pub struct CensusKr {
    source: DataSource,
}

impl CensusKr {
    /// Validate the configuration and open the data root.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        info!("Census data root: {}", config.data_root.display());
        Ok(Self {
            source: DataSource::new(config),
        })
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Long-format rows of one year
    pub fn load_data(&self, year: i32) -> Result<Vec<CensusRecord>> {
        self.source.load_data(year)
    }

    /// Boundaries of layer `{level}_{year}`
    pub fn load_districts(&self, year: i32, level: Level) -> Result<Arc<Vec<BoundaryRecord>>> {
        self.source.load_districts(year, level)
    }

    pub fn layers(&self) -> Result<Vec<String>> {
        self.source.layers()
    }

    /// Filter, pivot and optionally roll up or geo-join census rows.
    pub fn anycensus(&self, query: &CensusQuery) -> Result<CensusTable> {
        query::execute(&self.source, query)
    }

    /// Overlay the municipal boundaries of two years.
    ///
    /// A zero year counts as absent; both absent fails with `MissingYear`.
    pub fn create_crosswalk_boundary(&self, year1: i32, year2: i32) -> Result<Vec<CrosswalkPiece>> {
        if year1 == 0 && year2 == 0 {
            return Err(CensusError::MissingYear);
        }

        let first = self.source.load_districts(year1, Level::Adm2)?;
        let second = self.source.load_districts(year2, Level::Adm2)?;

        warn!(
            "Building the {}-{} crosswalk runs a full polygon overlay and may take a while",
            year1, year2
        );
        Ok(overlay(&first, &second))
    }

    /// Harmonize all years onto `standard_year` boundaries.
    pub fn unify_boundaries(&self, _standard_year: i32) -> Result<Vec<BoundaryRecord>> {
        Err(CensusError::NotImplemented("unify_boundaries"))
    }
}
