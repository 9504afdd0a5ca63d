//! Error taxonomy for census loading and querying.

use std::path::PathBuf;

/// Errors raised by the census query layer.
///
/// Every failure aborts the whole call. Empty results are not errors.
#[derive(Debug, thiserror::Error)]
pub enum CensusError {
    #[error("invalid level '{0}': expected adm1 or adm2")]
    InvalidLevel(String),

    #[error("invalid census type '{0}'")]
    InvalidType(String),

    #[error("failed to load {source_name}: {reason}")]
    DataLoadFailure { source_name: String, reason: String },

    #[error("codes must be uniformly numeric or uniformly textual (offending code: '{0}')")]
    MixedCodeType(String),

    #[error("column '{column}' not found in {table}")]
    MissingColumn { column: String, table: String },

    #[error("invalid code pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("boundary layer '{0}' not found")]
    LayerNotFound(String),

    #[error("at least one of year1 or year2 must be provided")]
    MissingYear,

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("data root not found: {0}")]
    DataRootNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CensusError {
    pub(crate) fn load_failure(source_name: impl Into<String>, reason: impl ToString) -> Self {
        CensusError::DataLoadFailure {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CensusError>;
