use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for toponym
#[derive(Debug, Parser)]
#[command(
    name = "toponym",
    version,
    about = "Build, query and inspect a GeoNames search database"
)]
pub struct CliArgs {
    /// Directory holding allCountries.txt, alternateNames.txt and database.bin
    #[arg(short = 'd', long = "data-dir", global = true, default_value = "data")]
    pub data_dir: PathBuf,

    /// Main GeoNames table (default: <data-dir>/allCountries.txt)
    #[arg(long = "geonames", global = true)]
    pub geonames: Option<PathBuf>,

    /// Alternate names table (default: <data-dir>/alternateNames.txt)
    #[arg(long = "alternate-names", global = true)]
    pub alternate_names: Option<PathBuf>,

    /// Snapshot file (default: <data-dir>/database.bin)
    #[arg(long = "database", global = true)]
    pub database: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Language tag for localized names (default: en)
    #[arg(short = 'l', long = "lang", global = true)]
    pub lang: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse the raw tables and write a fresh snapshot
    Build,

    /// Search places by name, optionally as "name, area"
    Search {
        query: String,

        /// Number of results (1-100)
        #[arg(short = 'n', long = "count")]
        count: Option<usize>,

        /// Only keep places in this ISO2 country
        #[arg(short = 'c', long = "country")]
        country: Option<String>,
    },

    /// Find the places nearest to a coordinate
    Proximity {
        #[arg(allow_negative_numbers = true)]
        latitude: f32,

        #[arg(allow_negative_numbers = true)]
        longitude: f32,

        /// Number of results (1-100)
        #[arg(short = 'n', long = "count")]
        count: Option<usize>,

        /// Only keep places in this ISO2 country
        #[arg(short = 'c', long = "country")]
        country: Option<String>,

        /// Search radius in kilometres (default: 100)
        #[arg(short = 'r', long = "radius")]
        radius: Option<f32>,
    },

    /// Show a single place by GeoNames id
    Get { id: u32 },

    /// Show a summary of the database contents
    Stats,
}
