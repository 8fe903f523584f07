// crates/toponym-core/src/loader/alternate.rs
//! Parser for the GeoNames `alternateNames.txt` table.
//!
//! Columns: alternate name id, geonameid, language, name, isPreferredName,
//! isShortName, isColloquial, isHistoric, from, to. Only the first four are
//! required; missing flag columns read as unset.

use super::fields::rows;
use crate::error::Result;
use crate::intern::StringInterner;
use crate::model::PlaceId;
use std::collections::HashMap;
use std::time::Instant;
use tracing::info;

pub const FILE_NAME: &str = "alternateNames.txt";

/// Language tags that carry no place name.
const IGNORED_LANGUAGES: [&str; 3] = ["link", "wkdt", "fr_1793"];

const POSTCODE_LANGUAGE: &str = "post";

/// One candidate name, only alive while the table is parsed.
#[derive(Debug, Clone)]
struct AlternateNameEntry {
    language_id: u32,
    text: String,
    preferred: bool,
    short: bool,
}

/// Result of parsing the alternate names table.
#[derive(Debug, Default)]
pub struct AlternateNames {
    /// Chosen name per place and language id.
    pub preferred: HashMap<PlaceId, HashMap<u32, String>>,
    pub postcodes: HashMap<PlaceId, Vec<String>>,
    /// Language tags; id `0` is the generic language `""`.
    pub languages: StringInterner,
}

impl AlternateNames {
    pub fn parse(text: &str) -> Result<Self> {
        let started = Instant::now();
        info!("alternate names: start parsing");

        let mut languages = StringInterner::new();
        let mut candidates: HashMap<PlaceId, Vec<AlternateNameEntry>> = HashMap::new();
        let mut postcodes: HashMap<PlaceId, Vec<String>> = HashMap::new();
        let mut skipped = 0usize;

        for mut row in rows(text, FILE_NAME) {
            row.skip("alternateNameId")?;
            let raw_id = row.next("geonameid")?;
            let place_id: PlaceId = row.parse("geonameid", raw_id)?;
            let language = row.next("isolanguage")?;
            let name = row.next("alternate name")?;
            let preferred = row.next_or_empty() == "1";
            let short = row.next_or_empty() == "1";
            let colloquial = row.next_or_empty() == "1";

            if IGNORED_LANGUAGES.contains(&language) || colloquial {
                skipped += 1;
                continue;
            }
            if language == POSTCODE_LANGUAGE {
                postcodes.entry(place_id).or_default().push(name.to_owned());
                continue;
            }

            candidates.entry(place_id).or_default().push(AlternateNameEntry {
                language_id: languages.intern(language),
                text: name.to_owned(),
                preferred,
                short,
            });
        }

        let preferred: HashMap<PlaceId, HashMap<u32, String>> = candidates
            .into_iter()
            .map(|(id, entries)| (id, choose_per_language(entries)))
            .collect();

        info!(
            places = preferred.len(),
            postcodes = postcodes.len(),
            languages = languages.len(),
            skipped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "alternate names: finished parsing"
        );

        Ok(Self {
            preferred,
            postcodes,
            languages,
        })
    }
}

/// Picks one name per language. A preferred short name wins outright,
/// otherwise the last short, then the last preferred, then the last other.
fn choose_per_language(entries: Vec<AlternateNameEntry>) -> HashMap<u32, String> {
    #[derive(Default)]
    struct Choice {
        decided: Option<String>,
        short: Option<String>,
        preferred: Option<String>,
        other: Option<String>,
    }

    let mut choices: HashMap<u32, Choice> = HashMap::new();
    for entry in entries {
        let choice = choices.entry(entry.language_id).or_default();
        if choice.decided.is_some() {
            continue;
        }
        match (entry.preferred, entry.short) {
            (true, true) => choice.decided = Some(entry.text),
            (_, true) => choice.short = Some(entry.text),
            (true, false) => choice.preferred = Some(entry.text),
            (false, false) => choice.other = Some(entry.text),
        }
    }

    choices
        .into_iter()
        .map(|(language, c)| {
            let name = c
                .decided
                .or(c.short)
                .or(c.preferred)
                .or(c.other)
                .unwrap_or_default();
            (language, name)
        })
        .collect()
}
