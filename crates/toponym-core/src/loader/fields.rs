// crates/toponym-core/src/loader/fields.rs
//! Tab separated row access with line-numbered errors.

use crate::error::{GeoError, Result};
use std::str::{FromStr, Split};

/// One non-empty line of a GeoNames dump.
pub(crate) struct Row<'a> {
    file: &'static str,
    line: usize,
    fields: Split<'a, char>,
}

/// Iterates the non-empty lines of `text`, numbered from 1.
pub(crate) fn rows<'a>(text: &'a str, file: &'static str) -> impl Iterator<Item = Row<'a>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(move |(index, line)| Row {
            file,
            line: index + 1,
            fields: line.split('\t'),
        })
}

impl<'a> Row<'a> {
    pub fn malformed(&self, message: impl Into<String>) -> GeoError {
        GeoError::MalformedLine {
            file: self.file,
            line: self.line,
            message: message.into(),
        }
    }

    /// Next field, failing when the separator is missing.
    pub fn next(&mut self, name: &str) -> Result<&'a str> {
        match self.fields.next() {
            Some(value) => Ok(value),
            None => Err(self.malformed(format!("missing field `{name}`"))),
        }
    }

    /// Next field, or `""` when the row ends early.
    pub fn next_or_empty(&mut self) -> &'a str {
        self.fields.next().unwrap_or("")
    }

    pub fn skip(&mut self, name: &str) -> Result<()> {
        self.next(name).map(drop)
    }

    pub fn parse<T: FromStr>(&self, name: &str, value: &str) -> Result<T> {
        value
            .trim()
            .parse()
            .map_err(|_| self.malformed(format!("cannot parse `{name}` from {value:?}")))
    }

    /// Parses an optional numeric field; empty means `None`.
    pub fn parse_opt<T: FromStr>(&self, name: &str, value: &str) -> Result<Option<T>> {
        if value.trim().is_empty() {
            return Ok(None);
        }
        self.parse(name, value).map(Some)
    }
}
