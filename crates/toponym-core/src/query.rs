// crates/toponym-core/src/query.rs
//! Caller facing queries: language resolution, filters and [`PlaceView`]s.

use crate::config::{QueryLimits, AREA_CANDIDATES};
use crate::database::Database;
use crate::error::{GeoError, Result};
use crate::model::feature::is_area;
use crate::model::{PlaceId, PlaceRecord, PlaceView};
use crate::queue::Scored;

/// Parameters of a name search.
///
/// A query of the form `name, area` searches `name` and keeps only places
/// located in an administrative area or country matching `area`.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub query: String,
    /// Language tag, `en` when unset or unknown.
    pub language: Option<String>,
    /// ISO-3166 alpha-2 code results must belong to.
    pub country: Option<String>,
    pub count: Option<usize>,
}

impl SearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

/// Parameters of a proximity lookup.
#[derive(Debug, Clone, Default)]
pub struct ProximityOptions {
    pub latitude: f32,
    pub longitude: f32,
    pub language: Option<String>,
    pub country: Option<String>,
    pub count: Option<usize>,
    pub radius_km: Option<f32>,
}

impl ProximityOptions {
    pub fn new(latitude: f32, longitude: f32) -> Self {
        Self {
            latitude,
            longitude,
            ..Self::default()
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn radius_km(mut self, radius_km: f32) -> Self {
        self.radius_km = Some(radius_km);
        self
    }
}

impl Database {
    /// Resolves a place for one language, including the names of its admin
    /// areas and country.
    pub fn resolve(&self, id: PlaceId, language_id: u32, score: f32) -> Option<PlaceView> {
        let place = self.get_by_id(id)?;
        let area_name = |area: PlaceId| {
            self.get_by_id(area)
                .map(|a| a.name_in(language_id).to_owned())
                .unwrap_or_default()
        };

        Some(PlaceView {
            id: place.id,
            name: place.name_in(language_id).to_owned(),
            latitude: place.latitude,
            longitude: place.longitude,
            elevation: place.elevation,
            feature_code: place.feature_code.clone(),
            country_code: place.country_code.clone(),
            country_id: place.country_id,
            country: area_name(place.country_id),
            admin1_id: place.admin1_id,
            admin2_id: place.admin2_id,
            admin3_id: place.admin3_id,
            admin4_id: place.admin4_id,
            admin1: area_name(place.admin1_id),
            admin2: area_name(place.admin2_id),
            admin3: area_name(place.admin3_id),
            admin4: area_name(place.admin4_id),
            population: place.population,
            timezone: self.timezone(place).to_owned(),
            postcodes: place.postcodes.clone(),
            score,
        })
    }

    /// Name search with language, country and area handling.
    ///
    /// Queries shorter than two characters return nothing.
    pub fn search_places(
        &self,
        options: &SearchOptions,
        limits: &QueryLimits,
    ) -> Result<Vec<PlaceView>> {
        let count = limits.count(options.count)?;
        let language_id = self.language_id(
            options
                .language
                .as_deref()
                .unwrap_or(&limits.default_language),
        );
        if options.query.chars().count() < 2 {
            return Ok(Vec::new());
        }

        let mut parts = options.query.split(',');
        let name = parts.next().unwrap_or_default().trim();
        let areas = match parts.next().map(str::trim) {
            Some(area) if area.chars().count() > 1 => Some(self.area_ids(area, language_id)?),
            _ => None,
        };

        let hits = self.search(name, language_id, count)?;
        self.views(hits, language_id, |place| {
            matches_country(place, options.country.as_deref())
                && areas.as_ref().map_or(true, |areas| {
                    place.area_ids().iter().any(|id| *id != 0 && areas.contains(id))
                })
        })
    }

    /// Proximity lookup with language and country handling. Views carry the
    /// distance in kilometres as their score.
    pub fn nearby_places(
        &self,
        options: &ProximityOptions,
        limits: &QueryLimits,
    ) -> Result<Vec<PlaceView>> {
        let count = limits.count(options.count)?;
        let language_id = self.language_id(
            options
                .language
                .as_deref()
                .unwrap_or(&limits.default_language),
        );
        let radius = options.radius_km.unwrap_or(limits.default_radius_km);
        let hits = self.proximity(options.latitude, options.longitude, count, radius)?;
        self.views(hits, language_id, |place| {
            matches_country(place, options.country.as_deref())
        })
    }

    /// Single place for one language.
    pub fn place_view(
        &self,
        id: PlaceId,
        language: Option<&str>,
        limits: &QueryLimits,
    ) -> Result<PlaceView> {
        let language_id = self.language_id(language.unwrap_or(&limits.default_language));
        self.resolve(id, language_id, 0.0)
            .ok_or_else(|| GeoError::NotFound(format!("place {id}")))
    }

    /// Ids of administrative areas and countries matching `area`.
    fn area_ids(&self, area: &str, language_id: u32) -> Result<Vec<PlaceId>> {
        let hits = self.search(area, language_id, AREA_CANDIDATES)?;
        Ok(hits
            .into_iter()
            .filter(|hit| {
                self.get_by_id(hit.id)
                    .is_some_and(|place| is_area(&place.feature_code))
            })
            .map(|hit| hit.id)
            .collect())
    }

    fn views(
        &self,
        hits: Vec<Scored>,
        language_id: u32,
        keep: impl Fn(&PlaceRecord) -> bool,
    ) -> Result<Vec<PlaceView>> {
        let mut views = Vec::with_capacity(hits.len());
        for hit in hits {
            let place = self
                .get_by_id(hit.id)
                .ok_or(GeoError::InconsistentIndex(hit.id))?;
            if !keep(place) {
                continue;
            }
            let view = self
                .resolve(hit.id, language_id, hit.score)
                .ok_or(GeoError::InconsistentIndex(hit.id))?;
            views.push(view);
        }
        Ok(views)
    }
}

fn matches_country(place: &PlaceRecord, country: Option<&str>) -> bool {
    country.map_or(true, |code| place.country_code.eq_ignore_ascii_case(code))
}
