// crates/toponym-core/src/queue.rs
//! Fixed capacity, sorted result queues shared by both index query paths.

use crate::model::PlaceId;
use serde::Serialize;

/// One ranked result: a place id with its relevance or distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scored {
    pub id: PlaceId,
    pub score: f32,
}

/// Direction in which the queue keeps its entries sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Highest score first (search relevance).
    Descending,
    /// Lowest score first (distance).
    Ascending,
}

impl Order {
    #[inline]
    fn is_better(self, candidate: f32, existing: f32) -> bool {
        match self {
            Order::Descending => candidate > existing,
            Order::Ascending => candidate < existing,
        }
    }
}

/// Bounded top-k queue.
///
/// Entries are always sorted, never exceed the capacity and never contain an
/// id twice. Equal scores are ordered by ascending id so results are stable
/// regardless of traversal order.
#[derive(Debug, Clone)]
pub struct BoundedQueue {
    entries: Vec<Scored>,
    capacity: usize,
    order: Order,
}

impl BoundedQueue {
    pub fn new(capacity: usize, order: Order) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            order,
        }
    }

    /// Queue for search hits, best relevance first.
    pub fn relevance(capacity: usize) -> Self {
        Self::new(capacity, Order::Descending)
    }

    /// Queue for proximity hits, nearest first.
    pub fn distance(capacity: usize) -> Self {
        Self::new(capacity, Order::Ascending)
    }

    pub fn insert(&mut self, id: PlaceId, score: f32) {
        if self.capacity == 0 {
            return;
        }
        if let Some(duplicate) = self.entries.iter().position(|e| e.id == id) {
            if !self.order.is_better(score, self.entries[duplicate].score) {
                return;
            }
            self.entries.remove(duplicate);
        }

        let order = self.order;
        let position = self.entries.iter().position(|e| {
            if e.score == score {
                return e.id > id;
            }
            order.is_better(score, e.score)
        });

        match position {
            Some(pos) => {
                self.entries.insert(pos, Scored { id, score });
                self.entries.truncate(self.capacity);
            }
            None if self.entries.len() < self.capacity => {
                self.entries.push(Scored { id, score });
            }
            None => {}
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[Scored] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<Scored> {
        self.entries
    }
}
