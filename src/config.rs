//! Data root configuration.
//!
//! ```toml
//! data_root = "./data"
//! table = "census.csv"      # or census.csv.gz
//! boundaries = "boundaries" # holds {level}_{year}.geojson layers
//! cache = true
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CensusError, Result};

fn default_table() -> PathBuf {
    PathBuf::from("census.csv")
}

fn default_boundaries() -> PathBuf {
    PathBuf::from("boundaries")
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the bundled table and boundary layers
    pub data_root: PathBuf,
    /// Long-format table, relative to `data_root`
    #[serde(default = "default_table")]
    pub table: PathBuf,
    /// Boundary layer directory, relative to `data_root`
    #[serde(default = "default_boundaries")]
    pub boundaries: PathBuf,
    /// Keep parsed tables and layers in memory between calls
    #[serde(default)]
    pub cache: bool,
}

impl Config {
    pub fn with_data_root<P: Into<PathBuf>>(data_root: P) -> Self {
        Self {
            data_root: data_root.into(),
            table: default_table(),
            boundaries: default_boundaries(),
            cache: false,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CensusError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| CensusError::Config(format!("failed to parse {}: {}", path.display(), e)))?;

        // Relative roots are taken from the config file's directory
        if config.data_root.is_relative() {
            if let Some(parent) = path.parent() {
                config.data_root = parent.join(&config.data_root);
            }
        }
        Ok(config)
    }

    pub fn table_path(&self) -> PathBuf {
        self.data_root.join(&self.table)
    }

    pub fn boundaries_dir(&self) -> PathBuf {
        self.data_root.join(&self.boundaries)
    }

    /// Check that the data root and the table exist.
    ///
    /// A missing boundary directory is allowed; layer lookups then fail with
    /// `LayerNotFound`.
    pub fn validate(&self) -> Result<()> {
        if !self.data_root.is_dir() {
            return Err(CensusError::DataRootNotFound(self.data_root.clone()));
        }
        let table = self.table_path();
        if !table.is_file() {
            return Err(CensusError::Config(format!(
                "census table not found: {}",
                table.display()
            )));
        }
        Ok(())
    }
}
