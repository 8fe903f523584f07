// crates/toponym-core/src/model/feature.rs
//! GeoNames feature code classification and popularity ranking.
//!
//! See <https://www.geonames.org/export/codes.html> for the code list.

/// Whether a record with this feature code is loaded into the database.
pub fn is_loaded(feature_code: &str) -> bool {
    matches!(
        feature_code,
        "ADM1"
            | "ADM2"
            | "ADM3"
            | "ADM4"
            | "ADM5"
            | "PCLI"
            | "PCLD"
            | "PCLIX"
            | "PCLS"
            | "PCLF"
            | "PCL"
            | "PPL"
            | "PPLL"
            | "PPLC"
            | "PPLA"
            | "PPLA2"
            | "PPLA3"
            | "PPLA4"
            | "PPLX"
            | "PPLS"
            | "PPLCH"
            | "PPLG"
            | "AMUS"
            | "AIRP"
            | "MT"
            | "MTS"
            | "PK"
            | "PKS"
            | "PAN"
            | "PANS"
            | "PASS"
            | "VALL"
            | "VALX"
            | "VALG"
            | "VALS"
            | "FLLS"
            | "DAM"
            | "PRK"
            | "GLCR"
            | "CONT"
            | "UPLD"
            | "ISL"
            | "ISLET"
            | "ISLF"
            | "ISLM"
            | "ISLS"
            | "ISLT"
            | "CAPE"
            | "AIRF"
            | "AIRB"
            | "AIRH"
    )
}

/// Whether a loaded record also enters the name search index.
///
/// Administrative boundaries stay addressable by id and take part in the
/// hierarchy, but are not returned by name searches.
pub fn is_searchable(feature_code: &str) -> bool {
    !matches!(
        feature_code,
        "PCL" | "ADM1" | "ADM2" | "ADM3" | "ADM4" | "ADM5" | "LTER" | "PRSH" | "TERR" | "ZN" | "ZNB"
    )
}

/// Admin level (1-4) of an administrative area record.
pub fn admin_level(feature_code: &str) -> Option<usize> {
    match feature_code {
        "ADM1" => Some(1),
        "ADM2" => Some(2),
        "ADM3" => Some(3),
        "ADM4" => Some(4),
        _ => None,
    }
}

/// Sovereign country record.
pub fn is_country(feature_code: &str) -> bool {
    feature_code == "PCLI"
}

/// Records that can act as the "area" part of a `name, area` query.
pub fn is_area(feature_code: &str) -> bool {
    admin_level(feature_code).is_some() || is_country(feature_code)
}

/// Logistic popularity curve: `1 / (1 + 25 e^(-population / 50000))`.
///
/// Zero population ranks `0`. The curve saturates at `1.0` around one
/// million inhabitants.
pub fn population_rank(population: u32) -> f32 {
    if population == 0 {
        return 0.0;
    }
    let exponent = -(population as f32) / 50_000.0;
    1.0 / (1.0 + 25.0 * exponent.exp())
}

/// Bonus for capitals and seats of administrative divisions.
fn seat_bonus(feature_code: &str) -> f32 {
    match feature_code {
        "PPL" => 0.1,
        "PPLC" | "PPLA" => 0.3,
        "PPLA2" => 0.23,
        "PPLA3" => 0.2,
        "PPLA4" | "PPLA5" => 0.15,
        _ => 0.0,
    }
}

/// Final ranking of a place, used as the tie breaker of every search hit.
pub fn ranking(feature_code: &str, population: u32, has_postcodes: bool) -> f32 {
    let mut rank = population_rank(population);
    if has_postcodes {
        rank += 0.1;
    }
    rank + seat_bonus(feature_code)
}
