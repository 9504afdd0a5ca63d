//! Command-line access to the bundled census data.
//!
//! Runs `anycensus` queries, builds boundary crosswalks and lists layers.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level as LogLevel};
use tracing_subscriber::FmtSubscriber;

use censuskr::{Aggregator, CensusKr, CensusQuery, CensusType, Config, Level, RegionCode};

mod output;
use output::Format;

#[derive(Parser, Debug)]
#[command(name = "censuskr")]
#[command(about = "Query Korean census data and district boundaries")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data root holding census.csv and boundaries/ (overrides the config file)
    #[arg(long, env = "CENSUSKR_DATA")]
    data_root: Option<PathBuf>,

    /// Keep loaded tables in memory
    #[arg(long)]
    cache: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter and pivot census rows
    Query {
        #[arg(long, default_value_t = 2020)]
        year: i32,

        /// Comma-separated region codes or name prefixes
        #[arg(long, value_delimiter = ',')]
        codes: Option<Vec<String>>,

        #[arg(long = "type", default_value = "population")]
        census_type: String,

        #[arg(long, default_value = "adm2")]
        level: String,

        /// sum, mean, min or max
        #[arg(long, default_value = "sum")]
        aggregator: Aggregator,

        /// Join district geometry
        #[arg(long)]
        geometry: bool,

        /// Keep municipal level even when a name matches a province
        #[arg(long)]
        no_promote: bool,

        #[arg(long, value_enum, default_value = "csv")]
        format: Format,
    },
    /// Overlay two years of municipal boundaries (GeoJSON on stdout)
    Crosswalk {
        #[arg(long, default_value_t = 0)]
        year1: i32,

        #[arg(long, default_value_t = 0)]
        year2: i32,
    },
    /// List boundary layers
    Layers,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match (&args.config, &args.data_root) {
        (Some(path), _) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        (None, Some(root)) => Config::with_data_root(root),
        (None, None) => Config::with_data_root("data"),
    };
    if let (Some(_), Some(root)) = (&args.config, &args.data_root) {
        config.data_root = root.clone();
    }
    config.cache |= args.cache;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose {
            LogLevel::DEBUG
        } else {
            LogLevel::INFO
        })
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let census = CensusKr::new(load_config(&args)?).context("Failed to open census data")?;

    match args.command {
        Command::Query {
            year,
            codes,
            census_type,
            level,
            aggregator,
            geometry,
            no_promote,
            format,
        } => {
            let census_type: CensusType = census_type.parse()?;
            let level: Level = level.parse()?;
            let mut query = CensusQuery::new(year, census_type, level)
                .with_aggregator(aggregator)
                .with_geometry(geometry || format == Format::Geojson)
                .with_auto_promote(!no_promote);
            if let Some(codes) = codes {
                query = query.with_codes(codes.iter().map(|c| RegionCode::parse_token(c)));
            }

            let table = census.anycensus(&query).context("Query failed")?;
            if table.was_promoted() {
                info!("Name codes matched provinces; rows are at {} level", table.resolved_level);
            }

            let stdout = io::stdout().lock();
            match format {
                Format::Csv => output::write_csv(&table, stdout)?,
                Format::Json => output::write_json(&table, stdout)?,
                Format::Geojson => output::write_geojson(&table, stdout)?,
            }
        }
        Command::Crosswalk { year1, year2 } => {
            let pieces = census
                .create_crosswalk_boundary(year1, year2)
                .context("Crosswalk failed")?;
            info!("Crosswalk has {} pieces", pieces.len());
            output::write_crosswalk(&pieces, io::stdout().lock())?;
        }
        Command::Layers => {
            for layer in census.layers()? {
                println!("{}", layer);
            }
        }
    }

    Ok(())
}
