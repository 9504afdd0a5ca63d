//! Table and crosswalk writers for the CLI.

use anyhow::Result;
use geojson::FeatureCollection;
use serde::Serialize;
use std::io::Write;

use censuskr::boundary::CrosswalkPiece;
use censuskr::source::multipolygon_to_value;
use censuskr::models::KEY_COLUMNS;
use censuskr::{CensusTable, WideRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Csv,
    Json,
    Geojson,
}

/// CSV with the key columns followed by the composite-label columns
pub fn write_csv<W: Write>(table: &CensusTable, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let header: Vec<&str> = KEY_COLUMNS
        .iter()
        .copied()
        .chain(table.columns.iter().map(String::as_str))
        .collect();
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![
            row.key.year.to_string(),
            row.key.census_type.to_string(),
            row.key.adm1.clone(),
            row.key.adm1_code.to_string(),
            row.key.adm2.clone().unwrap_or_default(),
            row.key.adm2_code.map(|c| c.to_string()).unwrap_or_default(),
        ];
        record.extend(
            table
                .columns
                .iter()
                .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonTable<'a> {
    requested_level: censuskr::Level,
    resolved_level: censuskr::Level,
    columns: &'a [String],
    rows: &'a [WideRow],
}

pub fn write_json<W: Write>(table: &CensusTable, out: W) -> Result<()> {
    let doc = JsonTable {
        requested_level: table.requested_level,
        resolved_level: table.resolved_level,
        columns: &table.columns,
        rows: &table.rows,
    };
    serde_json::to_writer_pretty(out, &doc)?;
    Ok(())
}

/// Rows as GeoJSON features; rows without geometry get a null geometry
pub fn write_geojson<W: Write>(table: &CensusTable, out: W) -> Result<()> {
    let mut features = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let properties = match serde_json::to_value(row)? {
            serde_json::Value::Object(map) => Some(map),
            _ => None,
        };
        features.push(geojson::Feature {
            bbox: None,
            geometry: row
                .geometry
                .as_ref()
                .map(|g| geojson::Geometry::new(multipolygon_to_value(g))),
            id: None,
            properties,
            foreign_members: None,
        });
    }
    write_features(features, out)
}

pub fn write_crosswalk<W: Write>(pieces: &[CrosswalkPiece], out: W) -> Result<()> {
    write_features(pieces.iter().map(CrosswalkPiece::to_feature).collect(), out)
}

fn write_features<W: Write>(features: Vec<geojson::Feature>, out: W) -> Result<()> {
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    serde_json::to_writer(out, &collection)?;
    Ok(())
}
