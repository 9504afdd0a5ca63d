//! The `anycensus` pipeline: year/type filter, code resolution, code filter,
//! pivot, optional roll-up and optional geometry join.

pub mod aggregate;
pub mod filter;
pub mod join;
pub mod reshape;
pub mod resolve;

use tracing::info;

use crate::error::Result;
use crate::models::{CensusTable, CensusType, Level, RegionCode};
use crate::source::DataSource;

pub use aggregate::Aggregator;
pub use filter::{abbreviate_unit, CodeMatcher};
pub use resolve::{resolve_codes, CodeKind, QueryColumn, ResolvedFilter};

/// Parameters of one census query
#[derive(Debug, Clone)]
pub struct CensusQuery {
    pub year: i32,
    /// `None` selects every region
    pub codes: Option<Vec<RegionCode>>,
    pub census_type: CensusType,
    pub level: Level,
    pub aggregator: Aggregator,
    /// Join boundary geometry of layer `{level}_{year}`
    pub geometry: bool,
    /// Answer municipal name queries at provincial level when a token names a province
    pub auto_promote: bool,
}

impl Default for CensusQuery {
    fn default() -> Self {
        Self {
            year: 2020,
            codes: None,
            census_type: CensusType::Population,
            level: Level::Adm2,
            aggregator: Aggregator::Sum,
            geometry: false,
            auto_promote: true,
        }
    }
}

impl CensusQuery {
    pub fn new(year: i32, census_type: CensusType, level: Level) -> Self {
        Self {
            year,
            census_type,
            level,
            ..Default::default()
        }
    }

    pub fn with_codes<I, C>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<RegionCode>,
    {
        self.codes = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_aggregator(mut self, aggregator: Aggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn with_geometry(mut self, geometry: bool) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_auto_promote(mut self, auto_promote: bool) -> Self {
        self.auto_promote = auto_promote;
        self
    }
}

/// Run a query against a data source.
pub fn execute(source: &DataSource, query: &CensusQuery) -> Result<CensusTable> {
    let rows = filter::filter_year_type(source.load_data(query.year)?, query.year, query.census_type);

    let resolved = resolve_codes(
        &rows,
        query.codes.as_deref(),
        query.level,
        query.auto_promote,
    )?;
    let rows = filter::apply_filter(rows, &resolved)?;

    let level = resolved.resolved_level;
    let (columns, mut wide) = reshape::reshape(&rows, level, &query.aggregator);

    if query.geometry {
        let districts = source.load_districts(query.year, level)?;
        join::attach_geometry(&mut wide, &districts, level, &level.layer_name(query.year))?;
    }

    info!(
        "anycensus {} {} at {}: {} rows x {} columns",
        query.year,
        query.census_type,
        level,
        wide.len(),
        columns.len()
    );

    Ok(CensusTable {
        requested_level: query.level,
        resolved_level: level,
        columns,
        rows: wide,
        has_geometry: query.geometry,
    })
}
