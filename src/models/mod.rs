//! Core data models for census queries.

pub mod record;
pub mod region;
pub mod wide;

pub use record::{BoundaryRecord, CensusRecord};
pub use region::{is_supported_year, CensusType, Level, RegionCode, SUPPORTED_YEARS};
pub use wide::{CensusTable, RegionKey, WideRow, KEY_COLUMNS};
