//! toponym: command-line interface for toponym-core
//!
//! Builds the search database from the raw GeoNames tables and answers
//! name, proximity and id lookups from the terminal.
//!
//! Usage examples
//! --------------
//!
//! - Build the snapshot from `data/allCountries.txt` and
//!   `data/alternateNames.txt`
//!   $ toponym build
//!
//! - Search by name, optionally restricted by area or country
//!   $ toponym search Berlin
//!   $ toponym --lang de search "Frankfurt, Hessen"
//!   $ toponym search Paris --country US --count 5
//!
//! - Nearest places
//!   $ toponym proximity 47.42 10.98 --radius 20
//!
//! - A single place, as JSON
//!   $ toponym --json get 2950159
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `info`).
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use toponym_core::{
    DataPaths, Database, PlaceView, ProximityOptions, QueryLimits, SearchOptions,
};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn data_paths(args: &CliArgs) -> DataPaths {
    let mut paths = DataPaths::in_dir(&args.data_dir);
    if let Some(path) = &args.geonames {
        paths.geonames = path.clone();
    }
    if let Some(path) = &args.alternate_names {
        paths.alternate_names = path.clone();
    }
    if let Some(path) = &args.database {
        paths.database = path.clone();
    }
    paths
}

#[cfg(feature = "builder")]
fn open_database(paths: &DataPaths) -> anyhow::Result<Database> {
    Database::load_or_create(paths).with_context(|| {
        format!("cannot load or build database at {}", paths.database.display())
    })
}

#[cfg(not(feature = "builder"))]
fn open_database(paths: &DataPaths) -> anyhow::Result<Database> {
    Database::load(&paths.database)
        .with_context(|| format!("cannot load database at {}", paths.database.display()))
}

fn print_views(views: &[PlaceView], json: bool, score_label: &str) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(views)?);
        return Ok(());
    }
    if views.is_empty() {
        println!("No places found.");
        return Ok(());
    }
    for view in views {
        print_line(view, score_label);
    }
    Ok(())
}

fn print_line(view: &PlaceView, score_label: &str) {
    let areas: Vec<&str> = [&view.admin1, &view.admin2, &view.country]
        .into_iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    println!(
        "{:>9}  {} [{}] {} ({:.4}, {:.4}) {} {:.3}",
        view.id,
        view.name,
        view.feature_code,
        areas.join(", "),
        view.latitude,
        view.longitude,
        score_label,
        view.score
    );
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging();

    let paths = data_paths(&args);
    tracing::debug!(?paths, "resolved data paths");
    let limits = QueryLimits::default();

    match &args.command {
        Commands::Build => {
            #[cfg(feature = "builder")]
            {
                let db = Database::build_from_files(&paths)?;
                db.save(&paths.database)?;
                println!(
                    "Wrote {} places to {}",
                    db.len(),
                    paths.database.display()
                );
            }
            #[cfg(not(feature = "builder"))]
            anyhow::bail!("the `build` command needs the `builder` feature");
        }

        Commands::Search {
            query,
            count,
            country,
        } => {
            let db = open_database(&paths)?;
            let options = SearchOptions {
                query: query.clone(),
                language: args.lang.clone(),
                country: country.clone(),
                count: *count,
            };
            let views = db.search_places(&options, &limits)?;
            print_views(&views, args.json, "score")?;
        }

        Commands::Proximity {
            latitude,
            longitude,
            count,
            country,
            radius,
        } => {
            let db = open_database(&paths)?;
            let options = ProximityOptions {
                latitude: *latitude,
                longitude: *longitude,
                language: args.lang.clone(),
                country: country.clone(),
                count: *count,
                radius_km: *radius,
            };
            let views = db.nearby_places(&options, &limits)?;
            print_views(&views, args.json, "km")?;
        }

        Commands::Get { id } => {
            let db = open_database(&paths)?;
            let view = db.place_view(*id, args.lang.as_deref(), &limits)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("Place: {} ({})", view.name, view.id);
                println!("Feature: {}", view.feature_code);
                println!("Coordinates: {}, {}", view.latitude, view.longitude);
                println!("Elevation: {} m", view.elevation);
                println!("Country: {} ({})", view.country, view.country_code);
                for (level, name) in [&view.admin1, &view.admin2, &view.admin3, &view.admin4]
                    .into_iter()
                    .enumerate()
                {
                    if !name.is_empty() {
                        println!("Admin {}: {}", level + 1, name);
                    }
                }
                println!("Population: {}", view.population);
                println!("Timezone: {}", view.timezone);
                if !view.postcodes.is_empty() {
                    println!("Postcodes: {}", view.postcodes.join(", "));
                }
            }
        }

        Commands::Stats => {
            let db = open_database(&paths)?;
            let stats = db.stats();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Database statistics:");
                println!("  Places: {}", stats.places);
                println!("  Indexed names: {}", stats.indexed_names);
                println!("  Languages: {}", stats.languages);
                println!("  Timezones: {}", stats.timezones);
                println!("  Quadtree depth: {}", stats.quadtree_depth);
            }
        }
    }

    Ok(())
}
