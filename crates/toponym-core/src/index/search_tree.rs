// crates/toponym-core/src/index/search_tree.rs
//! Fuzzy prefix index over folded place names.
//!
//! Names are inserted into a [`SearchTreeBuilder`], which keeps up to
//! [`SPLIT_THRESHOLD`] pending suffixes per node before pushing them one level
//! deeper. Once every name is in, the builder is frozen into an immutable
//! [`SearchTree`] which is what gets serialized and queried.

use crate::error::{GeoError, Result};
use crate::model::PlaceId;
use crate::queue::BoundedQueue;
use crate::text::fold_key;
use crate::traits::{ElementLookup, Ranked};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of pending suffixes a node buffers before it splits.
pub const SPLIT_THRESHOLD: usize = 4096;

/// Score given to a full match at the top of the tree.
pub const INITIAL_FACTOR: f32 = 1.5;

/// A suffix of a folded name that has not been split into child nodes yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialName {
    pub remaining: String,
    pub id: PlaceId,
}

/// Mutable tree used while the database is being built.
#[derive(Debug)]
pub struct SearchTreeBuilder {
    /// Places whose name ends exactly at this node.
    ids: Vec<PlaceId>,
    branches: HashMap<char, SearchTreeBuilder>,
    buffer: Vec<PartialName>,
    split_threshold: usize,
}

impl Default for SearchTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchTreeBuilder {
    pub fn new() -> Self {
        Self::with_split_threshold(SPLIT_THRESHOLD)
    }

    pub fn with_split_threshold(split_threshold: usize) -> Self {
        Self {
            ids: Vec::new(),
            branches: HashMap::new(),
            buffer: Vec::new(),
            split_threshold: split_threshold.max(1),
        }
    }

    /// Folds `name` and inserts it for `id`.
    pub fn add(&mut self, name: &str, id: PlaceId) {
        let folded = fold_key(name);
        self.add_folded(&folded, id);
    }

    fn add_folded(&mut self, rest: &str, id: PlaceId) {
        let mut chars = rest.chars();
        let Some(next) = chars.next() else {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
            return;
        };

        if self.branches.is_empty() {
            self.buffer.push(PartialName {
                remaining: rest.to_owned(),
                id,
            });
            if self.buffer.len() >= self.split_threshold {
                self.split();
            }
            return;
        }
        self.branch(next).add_folded(chars.as_str(), id);
    }

    /// Moves every buffered suffix one level down.
    fn split(&mut self) {
        for entry in std::mem::take(&mut self.buffer) {
            let mut chars = entry.remaining.chars();
            if let Some(next) = chars.next() {
                self.branch(next).add_folded(chars.as_str(), entry.id);
            }
        }
    }

    fn branch(&mut self, next: char) -> &mut SearchTreeBuilder {
        let threshold = self.split_threshold;
        self.branches
            .entry(next)
            .or_insert_with(|| SearchTreeBuilder::with_split_threshold(threshold))
    }

    /// Converts into the immutable query structure.
    pub fn freeze(self) -> SearchTree {
        SearchTree {
            ids: self.ids,
            buffer: self.buffer,
            branches: self
                .branches
                .into_iter()
                .map(|(c, child)| (c, child.freeze()))
                .collect(),
        }
    }
}

/// Immutable search tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchTree {
    pub ids: Vec<PlaceId>,
    pub buffer: Vec<PartialName>,
    pub branches: HashMap<char, SearchTree>,
}

impl SearchTree {
    /// Scores every place matching the folded `query` into `results`.
    ///
    /// A full match scores `factor + ranking`. A partial match scores
    /// `factor / (len(suffix) + 1) + ranking`, so shorter leftovers rank
    /// higher. Once the query is consumed, deeper branches are visited with
    /// half the factor. With `only_exact` set, partial matches are skipped.
    pub fn search<T, L>(
        &self,
        query: &str,
        results: &mut BoundedQueue,
        only_exact: bool,
        factor: f32,
        elements: &L,
    ) -> Result<()>
    where
        T: Ranked,
        L: ElementLookup<T>,
    {
        let ranking = |id: PlaceId| -> Result<f32> {
            elements
                .element(id)
                .map(Ranked::ranking)
                .ok_or(GeoError::InconsistentIndex(id))
        };

        let mut chars = query.chars();
        let Some(next) = chars.next() else {
            for &id in &self.ids {
                results.insert(id, factor + ranking(id)?);
            }
            if only_exact {
                return Ok(());
            }
            for entry in &self.buffer {
                let partial = factor / (entry.remaining.chars().count() + 1) as f32;
                results.insert(entry.id, partial + ranking(entry.id)?);
            }
            for child in self.branches.values() {
                child.search(query, results, only_exact, factor / 2.0, elements)?;
            }
            return Ok(());
        };

        for entry in &self.buffer {
            if entry.remaining == query {
                results.insert(entry.id, factor + ranking(entry.id)?);
                continue;
            }
            if only_exact {
                continue;
            }
            if entry.remaining.starts_with(query) {
                let partial = factor / (entry.remaining.chars().count() + 1) as f32;
                results.insert(entry.id, partial + ranking(entry.id)?);
            }
        }
        if let Some(child) = self.branches.get(&next) {
            child.search(chars.as_str(), results, only_exact, factor, elements)?;
        }
        Ok(())
    }

    /// Number of (name, id) entries stored in the tree.
    pub fn entry_count(&self) -> usize {
        self.ids.len()
            + self.buffer.len()
            + self
                .branches
                .values()
                .map(SearchTree::entry_count)
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.buffer.is_empty() && self.branches.is_empty()
    }
}
