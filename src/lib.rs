//! censuskr - Korean census data queries over bundled tables and boundaries.
//!
//! This library resolves region codes and names, pivots the long-format
//! census table into wide rows, rolls municipal rows up to provinces, joins
//! district boundaries and builds boundary crosswalks between census years.

pub mod boundary;
pub mod census;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod source;

pub use census::CensusKr;
pub use config::Config;
pub use error::{CensusError, Result};
pub use models::{CensusRecord, CensusTable, CensusType, Level, RegionCode, WideRow};
pub use query::{Aggregator, CensusQuery};

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    use crate::config::Config;
    use crate::models::{CensusRecord, CensusType};

    /// Configuration pointing at the bundled `data/` directory
    pub fn bundled_config() -> Config {
        Config::with_data_root(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// 2020 population row with class1 `total` and no class2
    pub fn record(
        adm1: &str,
        adm1_code: i64,
        adm2: &str,
        adm2_code: i64,
        unit: &str,
        value: f64,
    ) -> CensusRecord {
        CensusRecord {
            year: 2020,
            census_type: CensusType::Population,
            adm1: adm1.to_string(),
            adm1_code,
            adm2: adm2.to_string(),
            adm2_code,
            class1: Some("total".to_string()),
            class2: None,
            unit: Some(unit.to_string()),
            value: Some(value),
        }
    }
}
