// crates/toponym-core/src/intern.rs
use std::collections::HashMap;

/// Deduplicates highly redundant strings (timezones, language tags) into
/// small integer ids.
///
/// Index `0` is always the empty string, so a zero id doubles as "no
/// timezone" or "generic language". Ids are assigned in insertion order and
/// never change.
#[derive(Debug, Clone)]
pub struct StringInterner {
    strings: Vec<String>,
    positions: HashMap<String, u32>,
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl StringInterner {
    pub fn new() -> Self {
        let mut interner = Self {
            strings: Vec::new(),
            positions: HashMap::new(),
        };
        interner.intern("");
        interner
    }

    /// Returns the id of `value`, appending it on first sight.
    pub fn intern(&mut self, value: &str) -> u32 {
        if let Some(&index) = self.positions.get(value) {
            return index;
        }
        let index = self.strings.len() as u32;
        self.strings.push(value.to_owned());
        self.positions.insert(value.to_owned(), index);
        index
    }

    /// Looks up an id without inserting.
    pub fn get(&self, value: &str) -> Option<u32> {
        self.positions.get(value).copied()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Consumes the interner into its ordered string table.
    pub fn into_strings(self) -> Vec<String> {
        self.strings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_reserved_at_zero() {
        let mut interner = StringInterner::new();
        assert_eq!(interner.get(""), Some(0));
        assert_eq!(interner.intern(""), 0);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn ids_are_stable_and_sequential() {
        let mut interner = StringInterner::new();
        let berlin = interner.intern("Europe/Berlin");
        let zurich = interner.intern("Europe/Zurich");
        assert_eq!(berlin, 1);
        assert_eq!(zurich, 2);
        assert_eq!(interner.intern("Europe/Berlin"), berlin);
        assert_eq!(
            interner.into_strings(),
            vec!["", "Europe/Berlin", "Europe/Zurich"]
        );
    }
}
