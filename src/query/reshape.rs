//! Long-to-wide pivot and provincial roll-up.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::aggregate::Aggregator;
use crate::models::{CensusRecord, Level, RegionKey, WideRow, KEY_COLUMNS};

/// Placeholder for a missing class or unit inside a composite label
const MISSING_PART: &str = "NA";

type Cells = BTreeMap<RegionKey, BTreeMap<String, Vec<f64>>>;

/// `class1_class2_unit` with missing parts rendered as `NA`
pub fn composite_label(record: &CensusRecord) -> String {
    let part = |p: &Option<String>| p.clone().unwrap_or_else(|| MISSING_PART.to_string());
    format!(
        "{}_{}_{}",
        part(&record.class1),
        part(&record.class2),
        part(&record.unit)
    )
}

/// Prefix for value columns whose cleaned name equals a key column
const KEY_CLASH_PREFIX: &str = "value_";

/// Lowercase and drop every `_na` fragment: `total_NA_per` becomes `total_per`.
///
/// A name equal to a key column (`year_NA_NA`) becomes `value_year`.
pub fn clean_column_name(label: &str) -> String {
    let name = label.to_lowercase().replace("_na", "");
    if KEY_COLUMNS.contains(&name.as_str()) {
        format!("{}{}", KEY_CLASH_PREFIX, name)
    } else {
        name
    }
}

fn municipal_key(record: &CensusRecord) -> RegionKey {
    RegionKey {
        year: record.year,
        census_type: record.census_type,
        adm1: record.adm1.clone(),
        adm1_code: record.adm1_code,
        adm2: Some(record.adm2.clone()),
        adm2_code: Some(record.adm2_code),
    }
}

fn reduce(cells: Cells, aggregator: &Aggregator) -> Vec<WideRow> {
    cells
        .into_iter()
        .map(|(key, columns)| {
            let mut row = WideRow::new(key);
            row.values = columns
                .into_iter()
                .filter_map(|(column, values)| aggregator.apply(&values).map(|v| (column, v)))
                .collect();
            row
        })
        .collect()
}

/// Pivot filtered rows to one row per municipality.
///
/// Returns the sorted column set and rows sorted by key. Duplicate
/// (key, column) cells are combined with `aggregator`.
pub fn pivot_wide(rows: &[CensusRecord], aggregator: &Aggregator) -> (Vec<String>, Vec<WideRow>) {
    let mut columns = BTreeSet::new();
    let mut cells: Cells = BTreeMap::new();

    for record in rows {
        let column = clean_column_name(&composite_label(record));
        columns.insert(column.clone());

        let slot = cells
            .entry(municipal_key(record))
            .or_default()
            .entry(column)
            .or_default();
        if let Some(value) = record.value {
            slot.push(value);
        }
    }

    (columns.into_iter().collect(), reduce(cells, aggregator))
}

/// Collapse municipal rows to one row per province, re-aggregating each column.
///
/// Provinces whose rows carry no values still get a single row.
pub fn rollup_provincial(rows: Vec<WideRow>, aggregator: &Aggregator) -> Vec<WideRow> {
    let before = rows.len();
    let mut cells: Cells = BTreeMap::new();

    for row in rows {
        let group = cells.entry(row.key.to_provincial()).or_default();
        for (column, value) in row.values {
            group.entry(column).or_default().push(value);
        }
    }

    let out = reduce(cells, aggregator);
    debug!("Rolled {} municipal rows up to {} provinces", before, out.len());
    out
}

/// Pivot and, at provincial level, roll up.
pub fn reshape(
    rows: &[CensusRecord],
    level: Level,
    aggregator: &Aggregator,
) -> (Vec<String>, Vec<WideRow>) {
    let (columns, wide) = pivot_wide(rows, aggregator);
    match level {
        Level::Adm2 => (columns, wide),
        Level::Adm1 => (columns, rollup_provincial(wide, aggregator)),
    }
}
