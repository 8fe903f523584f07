// crates/toponym-core/src/database.rs
//! The immutable database facade.

use crate::common::DbStats;
use crate::config::{DEFAULT_LANGUAGE, MAX_COUNT};
use crate::error::{GeoError, Result};
use crate::index::{GeoTree, SearchTree, SearchTreeBuilder, INITIAL_FACTOR};
use crate::loader::Gazetteer;
use crate::model::feature::is_searchable;
use crate::model::{PlaceId, PlaceRecord};
use crate::queue::{BoundedQueue, Scored};
use crate::text::fold_key;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;
use tracing::info;

/// Language tags whose names go into the main search tree as well.
const MAIN_TREE_LANGUAGES: [&str; 2] = ["iata", "icao"];

/// Places, both indices and the string tables, built once and read only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub(crate) places: HashMap<PlaceId, PlaceRecord>,
    pub(crate) index: SearchTree,
    /// One tree per language id. Entry `0` stays empty.
    pub(crate) language_index: Vec<SearchTree>,
    pub(crate) geo_tree: GeoTree,
    pub(crate) languages: Vec<String>,
    pub(crate) timezones: Vec<String>,
}

impl Database {
    /// Builds both indices over a parsed gazetteer.
    pub fn build(gazetteer: Gazetteer) -> Self {
        Self::build_with_depth(gazetteer, None)
    }

    /// Like [`Database::build`] with an explicit quadtree depth.
    pub fn build_with_depth(gazetteer: Gazetteer, depth: Option<usize>) -> Self {
        let Gazetteer {
            places,
            timezones,
            languages,
        } = gazetteer;

        let started = Instant::now();
        info!(places = places.len(), "quadtree: start building");
        let geo_tree = GeoTree::build(&places, depth);
        info!(
            depth = geo_tree.depth(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "quadtree: finished building"
        );

        let started = Instant::now();
        info!(languages = languages.len(), "search trees: start building");

        let mut ids: Vec<PlaceId> = places
            .values()
            .filter(|place| is_searchable(&place.feature_code))
            .map(|place| place.id)
            .collect();
        ids.sort_unstable();

        let main_languages: Vec<u32> = std::iter::once(0)
            .chain(
                MAIN_TREE_LANGUAGES
                    .iter()
                    .filter_map(|tag| languages.iter().position(|l| l == tag))
                    .map(|position| position as u32),
            )
            .collect();

        let mut main = SearchTreeBuilder::new();
        let mut per_language: Vec<SearchTreeBuilder> =
            languages.iter().map(|_| SearchTreeBuilder::new()).collect();

        for id in &ids {
            let Some(place) = places.get(id) else {
                continue;
            };
            main.add(&place.name, place.id);
            for (&language, name) in &place.localized_names {
                if main_languages.contains(&language) {
                    main.add(name, place.id);
                }
                if language == 0 {
                    continue;
                }
                if let Some(tree) = per_language.get_mut(language as usize) {
                    tree.add(name, place.id);
                }
            }
            for postcode in &place.postcodes {
                main.add(postcode, place.id);
            }
        }

        let index = main.freeze();
        let language_index: Vec<SearchTree> =
            per_language.into_iter().map(SearchTreeBuilder::freeze).collect();
        info!(
            indexed = ids.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search trees: finished building"
        );

        Self {
            places,
            index,
            language_index,
            geo_tree,
            languages,
            timezones,
        }
    }

    /// Fuzzy name search in the main tree and the tree of `language_id`.
    ///
    /// Queries of up to two characters only return exact matches. Results
    /// are ordered by descending relevance.
    pub fn search(&self, text: &str, language_id: u32, max_count: usize) -> Result<Vec<Scored>> {
        check_count(max_count)?;
        let folded = fold_key(text);
        if folded.is_empty() {
            return Ok(Vec::new());
        }
        let only_exact = text.chars().count() <= 2;

        let mut results = BoundedQueue::relevance(max_count);
        self.index
            .search(&folded, &mut results, only_exact, INITIAL_FACTOR, &self.places)?;
        if let Some(tree) = self.language_index.get(language_id as usize) {
            tree.search(&folded, &mut results, only_exact, INITIAL_FACTOR, &self.places)?;
        }
        Ok(without_placeholder(results.into_vec()))
    }

    /// Up to `max_count` places within `max_radius_km`, nearest first.
    pub fn proximity(
        &self,
        latitude: f32,
        longitude: f32,
        max_count: usize,
        max_radius_km: f32,
    ) -> Result<Vec<Scored>> {
        check_count(max_count)?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(GeoError::InvalidParameter(format!(
                "coordinates must be finite, got ({latitude}, {longitude})"
            )));
        }
        if !max_radius_km.is_finite() || max_radius_km < 0.0 {
            return Err(GeoError::InvalidParameter(format!(
                "radius must be a non-negative number of kilometres, got {max_radius_km}"
            )));
        }
        let results = self
            .geo_tree
            .knn(latitude, longitude, max_count, max_radius_km, &self.places)?;
        Ok(without_placeholder(results))
    }

    pub fn get_by_id(&self, id: PlaceId) -> Option<&PlaceRecord> {
        if id == 0 {
            return None;
        }
        self.places.get(&id)
    }

    /// Like [`Database::get_by_id`], but a missing id is an error.
    pub fn get(&self, id: PlaceId) -> Result<&PlaceRecord> {
        self.get_by_id(id)
            .ok_or_else(|| GeoError::NotFound(format!("place {id}")))
    }

    /// Language tags indexed by language id.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn timezones(&self) -> &[String] {
        &self.timezones
    }

    /// Language id of `tag`, falling back to `en` and then to the generic
    /// language `0`.
    pub fn language_id(&self, tag: &str) -> u32 {
        let position = |tag: &str| self.languages.iter().position(|l| l == tag);
        position(tag)
            .or_else(|| position(DEFAULT_LANGUAGE))
            .map_or(0, |p| p as u32)
    }

    pub fn timezone(&self, place: &PlaceRecord) -> &str {
        self.timezones
            .get(place.timezone_index as usize)
            .map_or("", String::as_str)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn places(&self) -> impl Iterator<Item = &PlaceRecord> {
        self.places.values()
    }

    pub fn stats(&self) -> DbStats {
        DbStats {
            places: self.places.len(),
            indexed_names: self.index.entry_count()
                + self
                    .language_index
                    .iter()
                    .map(SearchTree::entry_count)
                    .sum::<usize>(),
            languages: self.languages.len(),
            timezones: self.timezones.len(),
            quadtree_depth: self.geo_tree.depth(),
        }
    }

    /// Checks that the parts of a decoded snapshot fit together.
    pub(crate) fn validate(&self) -> Result<()> {
        self.geo_tree.validate()?;
        if self.geo_tree.len() != self.places.len() {
            return Err(GeoError::InvalidData(format!(
                "quadtree holds {} ids for {} places",
                self.geo_tree.len(),
                self.places.len()
            )));
        }
        if self.language_index.len() != self.languages.len() {
            return Err(GeoError::InvalidData(format!(
                "{} language trees for {} languages",
                self.language_index.len(),
                self.languages.len()
            )));
        }
        Ok(())
    }
}

fn check_count(count: usize) -> Result<()> {
    if count == 0 || count > MAX_COUNT {
        return Err(GeoError::InvalidParameter(format!(
            "count must be between 1 and {MAX_COUNT}, got {count}"
        )));
    }
    Ok(())
}

fn without_placeholder(mut results: Vec<Scored>) -> Vec<Scored> {
    results.retain(|hit| hit.id != 0);
    results
}

/// Holder for the current database that can be swapped after a rebuild.
///
/// Readers clone the inner [`Arc`] and keep using their snapshot while a
/// replacement is installed.
#[derive(Debug, Clone)]
pub struct SharedDatabase {
    inner: Arc<RwLock<Arc<Database>>>,
}

impl SharedDatabase {
    pub fn new(database: Database) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(database))),
        }
    }

    pub fn current(&self) -> Arc<Database> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs `database` and returns the previous one.
    pub fn replace(&self, database: Database) -> Arc<Database> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(database))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::feature::ranking;

    fn place(
        id: PlaceId,
        name: &str,
        latitude: f32,
        longitude: f32,
        code: &str,
        population: u32,
    ) -> PlaceRecord {
        PlaceRecord {
            id,
            name: name.to_owned(),
            latitude,
            longitude,
            elevation: 0.0,
            feature_code: code.to_owned(),
            country_code: "DE".to_owned(),
            admin1_id: 0,
            admin2_id: 0,
            admin3_id: 0,
            admin4_id: 0,
            country_id: 0,
            population,
            ranking: ranking(code, population, false),
            timezone_index: 1,
            localized_names: HashMap::new(),
            postcodes: Vec::new(),
        }
    }

    fn sample() -> Database {
        let mut berlin = place(2950159, "Berlin", 52.52437, 13.41053, "PPLC", 3_426_354);
        berlin.localized_names.insert(1, "Berlino".to_owned());
        berlin.postcodes.push("10115".to_owned());
        let mut tegel = place(6301548, "Berlin Tegel Airport", 52.5597, 13.2877, "AIRP", 0);
        tegel.localized_names.insert(2, "TXL".to_owned());
        let bern = place(2661552, "Bern", 46.94809, 7.44744, "PPLC", 121_631);
        let state = place(2950157, "Land Berlin", 52.5, 13.4, "ADM1", 3_426_354);

        let places = [berlin, tegel, bern, state]
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        Database::build(Gazetteer {
            places,
            timezones: vec!["".into(), "Europe/Berlin".into()],
            languages: vec!["".into(), "it".into(), "iata".into(), "en".into()],
        })
    }

    #[test]
    fn search_ranks_exact_and_prefix_hits() {
        let db = sample();
        let hits = db.search("Berlin", db.language_id("en"), 10).unwrap();
        let ids: Vec<_> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![2950159, 6301548]);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn boundaries_are_not_searchable_but_addressable() {
        let db = sample();
        let hits = db.search("Land Berlin", 0, 10).unwrap();
        assert!(hits.is_empty());
        assert_eq!(db.get_by_id(2950157).unwrap().name, "Land Berlin");
    }

    #[test]
    fn short_queries_are_exact_only() {
        let db = sample();
        assert!(db.search("Be", 0, 10).unwrap().is_empty());
        assert!(db.search("", 0, 10).unwrap().is_empty());
        assert_eq!(db.search("Bern", 0, 10).unwrap()[0].id, 2661552);
    }

    #[test]
    fn localized_and_code_names() {
        let db = sample();
        let italian = db.language_id("it");
        assert_eq!(db.search("Berlino", italian, 5).unwrap()[0].id, 2950159);
        assert!(db.search("Berlino", db.language_id("en"), 5).unwrap().is_empty());
        // airport codes live in the main tree for every language
        assert_eq!(db.search("txl", 0, 5).unwrap()[0].id, 6301548);
        assert_eq!(db.search("10115", 0, 5).unwrap()[0].id, 2950159);
    }

    #[test]
    fn language_fallback() {
        let db = sample();
        assert_eq!(db.language_id("it"), 1);
        assert_eq!(db.language_id("xx"), 3);
        assert_eq!(db.languages()[3], "en");
    }

    #[test]
    fn proximity_orders_by_distance() {
        let db = sample();
        let hits = db.proximity(52.52, 13.40, 3, 100.0).unwrap();
        assert_eq!(hits[0].id, 2950159);
        assert!(hits.iter().all(|h| h.id != 2661552));
        assert!(hits.windows(2).all(|w| w[0].score <= w[1].score));
    }

    #[test]
    fn invalid_parameters() {
        let db = sample();
        assert!(matches!(db.search("Berlin", 0, 0), Err(GeoError::InvalidParameter(_))));
        assert!(matches!(db.search("Berlin", 0, 101), Err(GeoError::InvalidParameter(_))));
        assert!(db.proximity(f32::NAN, 0.0, 5, 10.0).is_err());
        assert!(db.proximity(0.0, 0.0, 5, -1.0).is_err());
        assert!(db.get_by_id(0).is_none());
        assert!(matches!(db.get(42), Err(GeoError::NotFound(_))));
    }

    #[test]
    fn stats_count_every_part() {
        let db = sample();
        let stats = db.stats();
        assert_eq!(stats.places, 4);
        assert_eq!(stats.languages, 4);
        assert_eq!(stats.timezones, 2);
        assert_eq!(stats.quadtree_depth, 1);
        // main tree: three names, a postcode and TXL; language trees: Berlino and TXL
        assert_eq!(stats.indexed_names, 7);
        db.validate().unwrap();
    }

    #[test]
    fn shared_database_swaps_atomically() {
        let shared = SharedDatabase::new(sample());
        let before = shared.current();
        let mut empty = sample();
        empty.places.clear();
        let previous = shared.replace(empty);
        assert!(Arc::ptr_eq(&before, &previous));
        assert!(shared.current().is_empty());
        assert_eq!(before.len(), 4);
    }
}
