// crates/toponym-core/src/model/place.rs
use crate::traits::{Ranked, SpatialElement};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// GeoNames id. Ids are sparse; `0` means "none".
pub type PlaceId = u32;

/// One gazetteer entry.
///
/// Created once during ingestion and never mutated afterwards. Timezone and
/// language keys are indices into the string tables held by the database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub id: PlaceId,
    pub name: String,
    pub latitude: f32,
    pub longitude: f32,
    pub elevation: f32,
    pub feature_code: String,
    pub country_code: String,
    pub admin1_id: PlaceId,
    pub admin2_id: PlaceId,
    pub admin3_id: PlaceId,
    pub admin4_id: PlaceId,
    pub country_id: PlaceId,
    pub population: u32,
    pub ranking: f32,
    pub timezone_index: u32,
    /// Best localized name per language id.
    pub localized_names: HashMap<u32, String>,
    pub postcodes: Vec<String>,
}

impl PlaceRecord {
    /// Name in the given language, falling back to the primary name.
    pub fn name_in(&self, language_id: u32) -> &str {
        self.localized_names
            .get(&language_id)
            .map(String::as_str)
            .unwrap_or(&self.name)
    }

    /// Admin area references from the most to the least significant, then
    /// the country.
    pub fn area_ids(&self) -> [PlaceId; 5] {
        [
            self.admin1_id,
            self.admin2_id,
            self.admin3_id,
            self.admin4_id,
            self.country_id,
        ]
    }
}

impl SpatialElement for PlaceRecord {
    #[inline]
    fn latitude(&self) -> f32 {
        self.latitude
    }

    #[inline]
    fn longitude(&self) -> f32 {
        self.longitude
    }
}

impl Ranked for PlaceRecord {
    #[inline]
    fn ranking(&self) -> f32 {
        self.ranking
    }
}

/// A place resolved for one language, with the names of its admin areas.
///
/// Returned by [`crate::Database::resolve`] and the option based search
/// helpers. `score` is the search relevance or the distance in kilometres,
/// depending on the query that produced the view.
#[derive(Clone, Debug, Serialize)]
pub struct PlaceView {
    pub id: PlaceId,
    pub name: String,
    pub latitude: f32,
    pub longitude: f32,
    pub elevation: f32,
    pub feature_code: String,
    pub country_code: String,
    pub country_id: PlaceId,
    pub country: String,
    pub admin1_id: PlaceId,
    pub admin2_id: PlaceId,
    pub admin3_id: PlaceId,
    pub admin4_id: PlaceId,
    pub admin1: String,
    pub admin2: String,
    pub admin3: String,
    pub admin4: String,
    pub population: u32,
    pub timezone: String,
    pub postcodes: Vec<String>,
    pub score: f32,
}
