//! Basic usage example for toponym-rs
//!
//! This example demonstrates how to:
//! - Load the database, building it from the GeoNames tables on first run
//! - Search by name, with language, country and area filters
//! - Look up the places nearest to a coordinate
//! - Resolve a single place by id
//!
//! Expects `data/allCountries.txt` and `data/alternateNames.txt`, or an
//! existing `data/database.bin`.

use toponym_core::{
    DataPaths, Database, ProximityOptions, QueryLimits, Result, SearchOptions,
};

fn main() -> Result<()> {
    println!("=== toponym-rs Basic Usage Example ===\n");

    println!("Loading database...");
    let db = Database::load_or_create(&DataPaths::default())?;
    let stats = db.stats();
    println!(
        "✓ {} places, {} indexed names, {} languages\n",
        stats.places, stats.indexed_names, stats.languages
    );
    let limits = QueryLimits::default();

    // Example 1: Plain name search
    println!("--- Example 1: Search 'Berlin' ---");
    for place in db.search_places(&SearchOptions::new("Berlin").count(5), &limits)? {
        println!(
            "{} ({}, {}) score {:.3}",
            place.name, place.admin1, place.country_code, place.score
        );
    }
    println!();

    // Example 2: German names, restricted by area
    println!("--- Example 2: 'Frankfurt, Deutschland' in German ---");
    let options = SearchOptions::new("Frankfurt, Deutschland").language("de");
    for place in db.search_places(&options, &limits)? {
        println!("{} - {}, {}", place.name, place.admin1, place.country);
    }
    println!();

    // Example 3: Country filter
    println!("--- Example 3: 'Paris' in the US ---");
    for place in db.search_places(&SearchOptions::new("Paris").country("US"), &limits)? {
        println!("{} - {} (population {})", place.name, place.admin1, place.population);
    }
    println!();

    // Example 4: Nearest places
    println!("--- Example 4: Places near the Zugspitze ---");
    let options = ProximityOptions::new(47.421, 10.985).radius_km(25.0).count(5);
    for place in db.nearby_places(&options, &limits)? {
        println!("{} [{}] {:.1} km", place.name, place.feature_code, place.score);
    }
    println!();

    // Example 5: Lookup by id
    println!("--- Example 5: Place 2950159 in Italian ---");
    let berlin = db.place_view(2950159, Some("it"), &limits)?;
    println!("{} ({}), timezone {}", berlin.name, berlin.country, berlin.timezone);

    Ok(())
}
