//! Read-only access to the bundled census table and boundary layers.
//!
//! Every call reads the files again unless the configuration enables the
//! load cache, in which case the parsed table and layers are shared as `Arc`s.

mod layers;
mod table;

use hashbrown::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::models::{is_supported_year, BoundaryRecord, CensusRecord, Level};

pub use layers::{list_layers, multipolygon_to_value, read_layer};
pub use table::{read_table, REQUIRED_COLUMNS};

#[derive(Default)]
struct LoadCache {
    table: Mutex<Option<Arc<Vec<CensusRecord>>>>,
    layers: Mutex<HashMap<String, Arc<Vec<BoundaryRecord>>>>,
}

/// Loader for the long-format table and the per-year boundary layers
pub struct DataSource {
    config: Config,
    cache: Option<LoadCache>,
}

impl DataSource {
    pub fn new(config: Config) -> Self {
        let cache = config.cache.then(LoadCache::default);
        Self { config, cache }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn full_table(&self) -> Result<Arc<Vec<CensusRecord>>> {
        let Some(cache) = &self.cache else {
            return Ok(Arc::new(read_table(&self.config.table_path())?));
        };

        let mut slot = cache.table.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(table) = slot.as_ref() {
            debug!("Census table served from cache");
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(read_table(&self.config.table_path())?);
        *slot = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Rows of the bundled table for one year.
    ///
    /// Years outside the bundled set yield an empty vector.
    pub fn load_data(&self, year: i32) -> Result<Vec<CensusRecord>> {
        if !is_supported_year(year) {
            warn!("Year {} is not covered by the bundled census data", year);
        }

        let table = self.full_table()?;
        let rows: Vec<CensusRecord> = table.iter().filter(|r| r.year == year).cloned().collect();

        debug!("Loaded {} rows for {}", rows.len(), year);
        Ok(rows)
    }

    /// District boundaries of layer `{level}_{year}`
    pub fn load_districts(&self, year: i32, level: Level) -> Result<Arc<Vec<BoundaryRecord>>> {
        let layer = level.layer_name(year);
        let path = self
            .config
            .boundaries_dir()
            .join(format!("{}.geojson", layer));

        let Some(cache) = &self.cache else {
            return Ok(Arc::new(read_layer(&path, &layer, year)?));
        };

        let mut layers = cache.layers.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(records) = layers.get(&layer) {
            debug!("Layer {} served from cache", layer);
            return Ok(Arc::clone(records));
        }
        let records = Arc::new(read_layer(&path, &layer, year)?);
        layers.insert(layer, Arc::clone(&records));
        Ok(records)
    }

    /// Names of the boundary layers present on disk
    pub fn layers(&self) -> Result<Vec<String>> {
        list_layers(&self.config.boundaries_dir())
    }
}
