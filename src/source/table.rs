//! Long-format census table reader.

use csv::{ReaderBuilder, Trim};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{CensusError, Result};
use crate::models::CensusRecord;

/// Header columns the table must carry
pub const REQUIRED_COLUMNS: &[&str] = &[
    "year",
    "type",
    "adm1",
    "adm1_code",
    "adm2",
    "adm2_code",
    "class1",
    "class2",
    "unit",
    "value",
];

/// Read the full census table. Gzip is detected from a `.gz` extension.
pub fn read_table(path: &Path) -> Result<Vec<CensusRecord>> {
    info!("Loading census table from {}", path.display());

    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|e| CensusError::load_failure(&source_name, e))?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    read_records(reader, &source_name)
}

pub(crate) fn read_records<R: Read>(reader: R, source_name: &str) -> Result<Vec<CensusRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Fields)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| CensusError::load_failure(source_name, e))?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(CensusError::MissingColumn {
                column: column.to_string(),
                table: source_name.to_string(),
            });
        }
    }

    let mut records = Vec::new();
    for (line, result) in csv_reader.deserialize::<CensusRecord>().enumerate() {
        let record = result.map_err(|e| {
            CensusError::load_failure(source_name, format!("row {}: {}", line + 1, e))
        })?;
        records.push(record);
    }

    debug!("Parsed {} census rows from {}", records.len(), source_name);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CensusType;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const SAMPLE: &str = "\
year,type,adm1,adm1_code,adm2,adm2_code,class1,class2,unit,value
2020,population,Seoul,11,Jongno-gu,11010,total,,persons,144000
2020,tax,Seoul,11,Jongno-gu,11010,income,,million  won,
";

    #[test]
    fn test_read_records_optional_fields() {
        let records = read_records(SAMPLE.as_bytes(), "sample").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].census_type, CensusType::Population);
        assert_eq!(records[0].class2, None);
        assert_eq!(records[0].value, Some(144000.0));
        assert_eq!(records[1].unit.as_deref(), Some("million  won"));
        assert_eq!(records[1].value, None);
    }

    #[test]
    fn test_missing_column() {
        let data = "year,type,adm1\n2020,population,Seoul\n";
        let err = read_records(data.as_bytes(), "short").unwrap_err();
        assert!(matches!(err, CensusError::MissingColumn { ref column, .. } if column == "adm1_code"));
    }

    #[test]
    fn test_bad_row_is_load_failure() {
        let data = SAMPLE.replace("2020,tax", "twenty,tax");
        let err = read_records(data.as_bytes(), "bad").unwrap_err();
        assert!(matches!(err, CensusError::DataLoadFailure { .. }));
    }

    #[test]
    fn test_read_gzip_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("census.csv.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let records = read_table(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].adm2_code, 11010);
    }

    #[test]
    fn test_missing_file() {
        let err = read_table(Path::new("/nonexistent/census.csv")).unwrap_err();
        assert!(matches!(err, CensusError::DataLoadFailure { .. }));
    }
}
