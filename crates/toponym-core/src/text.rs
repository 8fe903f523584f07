// crates/toponym-core/src/text.rs

/// Convert a string into a folded key suitable for indexing and comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Rügen` -> `Rugen`)
/// 2\) Normalize to lowercase
///
/// Both the search tree builder and the query path go through this
/// function, so indexed names and queries always share one alphabet.
///
/// # Examples
///
/// ```rust
/// use toponym_core::text::fold_key;
///
/// assert_eq!(fold_key("Łódź"), "lodz");
/// assert_eq!(fold_key("Straße"), "strasse");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}
