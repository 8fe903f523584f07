// crates/toponym-core/src/loader/geonames.rs
//! Two pass parser for the GeoNames main table (`allCountries.txt`).
//!
//! The first pass registers administrative areas and countries so that the
//! second pass can resolve the hierarchy of every place regardless of the
//! order in which rows appear.

use super::alternate::AlternateNames;
use super::fields::{rows, Row};
use crate::error::Result;
use crate::intern::StringInterner;
use crate::model::feature::{self, admin_level, is_country};
use crate::model::{PlaceId, PlaceRecord};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

pub const FILE_NAME: &str = "allCountries.txt";

/// The columns every row carries.
const COLUMNS: [&str; 19] = [
    "geonameid",
    "name",
    "asciiname",
    "alternatenames",
    "latitude",
    "longitude",
    "feature class",
    "feature code",
    "country code",
    "cc2",
    "admin1 code",
    "admin2 code",
    "admin3 code",
    "admin4 code",
    "population",
    "elevation",
    "dem",
    "timezone",
    "modification date",
];

/// Borrowed view of one row, split into its columns.
struct RawPlace<'a> {
    row: Row<'a>,
    columns: [&'a str; 19],
}

impl<'a> RawPlace<'a> {
    fn split(mut row: Row<'a>) -> Result<Self> {
        let mut columns = [""; 19];
        for (slot, name) in columns.iter_mut().zip(COLUMNS) {
            *slot = row.next(name)?;
        }
        Ok(Self { row, columns })
    }

    fn id(&self) -> Result<PlaceId> {
        self.row.parse(COLUMNS[0], self.columns[0])
    }

    fn feature_code(&self) -> &'a str {
        self.columns[7]
    }

    fn country_code(&self) -> &'a str {
        self.columns[8]
    }

    /// Admin codes 1 to 4.
    fn admin_codes(&self) -> &[&'a str] {
        &self.columns[10..14]
    }

    fn coordinate(&self, index: usize) -> Result<f32> {
        let value: f32 = self.row.parse(COLUMNS[index], self.columns[index])?;
        if !value.is_finite() {
            return Err(self.row.malformed(format!("{} is not finite", COLUMNS[index])));
        }
        Ok(value)
    }

    /// Negative populations count as zero.
    fn population(&self) -> Result<u32> {
        let population: Option<i64> = self.row.parse_opt(COLUMNS[14], self.columns[14])?;
        Ok(population.unwrap_or(0).clamp(0, i64::from(u32::MAX)) as u32)
    }

    /// Elevation, falling back to the DEM column.
    fn elevation(&self) -> Result<f32> {
        let elevation: Option<f32> = self.row.parse_opt(COLUMNS[15], self.columns[15])?;
        if let Some(elevation) = elevation {
            return Ok(elevation);
        }
        let dem: Option<f32> = self.row.parse_opt(COLUMNS[16], self.columns[16])?;
        Ok(dem.unwrap_or(0.0))
    }

    fn timezone(&self) -> &'a str {
        self.columns[17]
    }
}

/// Exact key of an admin area: the country code followed by the admin codes
/// down to `level`. `None` when the code at `level` is blank.
fn admin_key(country_code: &str, codes: &[&str], level: usize) -> Option<String> {
    let codes = &codes[..level];
    if codes.last().map_or(true, |code| code.is_empty()) {
        return None;
    }
    let capacity = country_code.len() + codes.iter().map(|c| c.len() + 1).sum::<usize>();
    let mut key = String::with_capacity(capacity);
    key.push_str(country_code);
    for code in codes {
        key.push('\t');
        key.push_str(code);
    }
    Some(key)
}

/// Lookup tables filled by the first pass.
#[derive(Debug, Default)]
struct Hierarchy {
    /// One map per admin level 1 to 4.
    admins: [HashMap<String, PlaceId>; 4],
    countries: HashMap<String, PlaceId>,
}

impl Hierarchy {
    fn register(&mut self, raw: &RawPlace<'_>) -> Result<()> {
        let code = raw.feature_code();
        if let Some(level) = admin_level(code) {
            if let Some(key) = admin_key(raw.country_code(), raw.admin_codes(), level) {
                self.admins[level - 1].insert(key, raw.id()?);
            }
        } else if is_country(code) && !raw.country_code().is_empty() {
            self.countries.insert(raw.country_code().to_owned(), raw.id()?);
        }
        Ok(())
    }

    fn admin(&self, raw: &RawPlace<'_>, level: usize) -> PlaceId {
        admin_key(raw.country_code(), raw.admin_codes(), level)
            .and_then(|key| self.admins[level - 1].get(&key).copied())
            .unwrap_or(0)
    }

    fn country(&self, country_code: &str) -> PlaceId {
        self.countries.get(country_code).copied().unwrap_or(0)
    }
}

/// Every loaded place plus the string tables its records refer to.
#[derive(Debug, Default)]
pub struct Gazetteer {
    pub places: HashMap<PlaceId, PlaceRecord>,
    pub timezones: Vec<String>,
    pub languages: Vec<String>,
}

impl Gazetteer {
    /// Parses the main table and attaches localized names and postcodes.
    ///
    /// Only rows whose feature code passes [`feature::is_loaded`] become
    /// records. Rows with missing columns or unparsable numbers abort the
    /// whole parse with [`crate::GeoError::MalformedLine`].
    pub fn parse(text: &str, mut alternate: AlternateNames) -> Result<Self> {
        let started = Instant::now();
        info!("geonames: start parsing");

        let mut hierarchy = Hierarchy::default();
        let mut expected = 0usize;
        for row in rows(text, FILE_NAME) {
            let raw = RawPlace::split(row)?;
            if !feature::is_loaded(raw.feature_code()) {
                continue;
            }
            expected += 1;
            hierarchy.register(&raw)?;
        }
        debug!(
            expected,
            countries = hierarchy.countries.len(),
            adm1 = hierarchy.admins[0].len(),
            adm2 = hierarchy.admins[1].len(),
            adm3 = hierarchy.admins[2].len(),
            adm4 = hierarchy.admins[3].len(),
            "geonames: first pass done"
        );

        let mut timezones = StringInterner::new();
        let mut places = HashMap::with_capacity(expected);

        for row in rows(text, FILE_NAME) {
            let raw = RawPlace::split(row)?;
            let feature_code = raw.feature_code();
            if !feature::is_loaded(feature_code) {
                continue;
            }

            let id = raw.id()?;
            let postcodes = alternate.postcodes.remove(&id).unwrap_or_default();
            let population = raw.population()?;
            let record = PlaceRecord {
                id,
                name: raw.columns[1].to_owned(),
                latitude: raw.coordinate(4)?,
                longitude: raw.coordinate(5)?,
                elevation: raw.elevation()?,
                feature_code: feature_code.to_owned(),
                country_code: raw.country_code().to_owned(),
                admin1_id: hierarchy.admin(&raw, 1),
                admin2_id: hierarchy.admin(&raw, 2),
                admin3_id: hierarchy.admin(&raw, 3),
                admin4_id: hierarchy.admin(&raw, 4),
                country_id: hierarchy.country(raw.country_code()),
                population,
                ranking: feature::ranking(feature_code, population, !postcodes.is_empty()),
                timezone_index: timezones.intern(raw.timezone()),
                localized_names: alternate.preferred.remove(&id).unwrap_or_default(),
                postcodes,
            };

            match places.entry(id) {
                Entry::Occupied(_) => {
                    return Err(raw.row.malformed(format!("duplicate geonameid {id}")));
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }

        let timezones = timezones.into_strings();
        info!(
            places = places.len(),
            timezones = timezones.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "geonames: finished parsing"
        );

        Ok(Self {
            places,
            timezones,
            languages: alternate.languages.into_strings(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeoError;

    const MIXED: &str = "\
1529666\tBahnhof Grenzau\tBahnhof Grenzau\tBahnhof Grenzau,Grenzau\t50.45663\t7.66505\tS\tRSTN\tDE\t\t08\t00\t07143\t07143032\t0\t\t232\tEurope/Berlin\t2020-10-14
2038682\tBahnhof Annaburg\tBahnhof Annaburg\tAnnaburg,Bahnhof Annaburg,Bahnhof Annaburg West\t51.72858\t13.03311\tS\tRSTN\tDE\t\t11\t\t\t\t0\t\t77\tEurope/Berlin\t2020-10-14
2657946\tWyhlen\tWyhlen\tWyhlen\t47.54729\t7.69331\tP\tPPLX\tDE\t\t01\t083\t08336\t08336105\t0\t\t269\tEurope/Berlin\t2020-11-12
2658739\tSchiener Bach\tSchiener Bach\tSchiener Bach\t47.6802\t8.86131\tH\tSTM\tDE\tDE,CH\t00\t\t\t\t0\t\t512\tEurope/Zurich\t2015-09-06
2659829\tLunkenbach\tLunkenbach\tLunckenbach,Lunkenbach\t47.68136\t8.84938\tH\tSTM\tDE\tDE,CH\t00\t\t\t\t0\t\t462\tEurope/Zurich\t2015-09-06
2744273\tWitte Venn\tWitte Venn\tWitte Veen,Witte Venn\t52.15\t6.88333\tH\tMRSH\tDE\t\t00\t\t\t\t0\t\t40\tEurope/Amsterdam\t2014-08-05
2744666\tWesterwoldsche A\tWesterwoldsche A\tWesterwoldsche A,Westerwoldsche Aa,Westerwoldse Aa\t53.23333\t7.2\tH\tSTMC\tDE\t\t00\t\t\t\t0\t\t-1\tEurope/Amsterdam\t2014-08-05
2745605\tHoge Veenkanal\tHoge Veenkanal\tHoge Veenkanal,Verlangde Hoogeveensche Vaart,Verlengde Hoogeveensche Vaart,Verlengde Hoogeveense Vaart\t52.73333\t6.51667\tH\tCNL\tDE\t\t00\t\t\t\t0\t\t12\tEurope/Amsterdam\t2014-08-05
";

    const HIERARCHY: &str = "\
2921044\tFederal Republic of Germany\tFederal Republic of Germany\t\t51.5\t10.5\tA\tPCLI\tDE\t\t00\t\t\t\t82927922\t\t303\tEurope/Berlin\t2019-01-09
2953481\tBaden-Wuerttemberg\tBaden-Wuerttemberg\t\t48.5\t9.0\tA\tADM1\tDE\t\t01\t\t\t\t10744921\t\t324\tEurope/Berlin\t2019-07-03
3214105\tRegierungsbezirk Freiburg\tRegierungsbezirk Freiburg\t\t48.0\t8.0\tA\tADM2\tDE\t\t01\t083\t\t\t2200000\t\t463\tEurope/Berlin\t2012-01-19
2657946\tWyhlen\tWyhlen\tWyhlen\t47.54729\t7.69331\tP\tPPLX\tDE\t\t01\t083\t08336\t08336105\t0\t\t269\tEurope/Berlin\t2020-11-12
2950159\tBerlin\tBerlin\t\t52.52437\t13.41053\tP\tPPLC\tDE\t\t16\t00\t11000\t11000000\t3426354\t74\t43\tEurope/Berlin\t2019-09-05
";

    #[test]
    fn keeps_only_loaded_feature_codes() {
        let gazetteer = Gazetteer::parse(MIXED, AlternateNames::default()).unwrap();
        assert_eq!(gazetteer.places.len(), 1);

        let wyhlen = &gazetteer.places[&2657946];
        assert_eq!(wyhlen.name, "Wyhlen");
        assert_eq!(wyhlen.feature_code, "PPLX");
        assert_eq!(wyhlen.elevation, 269.0);
        assert_eq!(wyhlen.population, 0);
        assert_eq!(wyhlen.ranking, 0.0);
        assert_eq!(gazetteer.timezones, vec!["", "Europe/Berlin"]);
        assert_eq!(gazetteer.timezones[wyhlen.timezone_index as usize], "Europe/Berlin");
    }

    #[test]
    fn resolves_admin_hierarchy_in_any_row_order() {
        let gazetteer = Gazetteer::parse(HIERARCHY, AlternateNames::default()).unwrap();
        let wyhlen = &gazetteer.places[&2657946];
        assert_eq!(wyhlen.admin1_id, 2953481);
        assert_eq!(wyhlen.admin2_id, 3214105);
        assert_eq!(wyhlen.admin3_id, 0);
        assert_eq!(wyhlen.admin4_id, 0);
        assert_eq!(wyhlen.country_id, 2921044);

        let berlin = &gazetteer.places[&2950159];
        assert_eq!(berlin.admin1_id, 0);
        assert_eq!(berlin.country_id, 2921044);
        assert_eq!(berlin.elevation, 74.0);
        assert!((berlin.ranking - 1.3).abs() < 1e-6);
    }

    #[test]
    fn attaches_names_and_postcodes() {
        let alternate = AlternateNames::parse(
            "1\t2950159\tde\tBerlin\t1\t1\t\t\t\t\n2\t2950159\tpost\t10115\t\t\t\t\t\t\n",
        )
        .unwrap();
        let de = alternate.languages.get("de").unwrap();
        let gazetteer = Gazetteer::parse(HIERARCHY, alternate).unwrap();

        let berlin = &gazetteer.places[&2950159];
        assert_eq!(berlin.localized_names[&de], "Berlin");
        assert_eq!(berlin.postcodes, vec!["10115"]);
        assert!((berlin.ranking - 1.4).abs() < 1e-6);
        assert_eq!(gazetteer.languages, vec!["", "de"]);
    }

    #[test]
    fn malformed_rows_abort_with_line_number() {
        let short = "2657946\tWyhlen\tWyhlen\n";
        let err = Gazetteer::parse(short, AlternateNames::default()).unwrap_err();
        assert!(matches!(err, GeoError::MalformedLine { line: 1, .. }));

        let bad_latitude = MIXED.replacen("47.54729", "north", 1);
        let err = Gazetteer::parse(&bad_latitude, AlternateNames::default()).unwrap_err();
        assert!(matches!(err, GeoError::MalformedLine { line: 3, .. }));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let wyhlen = MIXED.lines().nth(2).unwrap();
        let text = format!("{wyhlen}\n{wyhlen}\n");
        let err = Gazetteer::parse(&text, AlternateNames::default()).unwrap_err();
        assert!(matches!(err, GeoError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn admin_keys_require_the_level_code() {
        let codes = ["01", "083", "", ""];
        assert_eq!(admin_key("DE", &codes, 1).as_deref(), Some("DE\t01"));
        assert_eq!(admin_key("DE", &codes, 2).as_deref(), Some("DE\t01\t083"));
        assert_eq!(admin_key("DE", &codes, 3), None);
    }
}
