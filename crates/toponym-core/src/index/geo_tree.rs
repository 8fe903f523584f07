// crates/toponym-core/src/index/geo_tree.rs
//! Static quadtree for k-nearest-neighbour lookups.
//!
//! All ids are kept in one flat ordering. At depth `z` that ordering is cut
//! into `2^z` contiguous tiles and every tile is sorted by latitude (even `z`)
//! or longitude (odd `z`). Only the first and last coordinate of each tile is
//! stored, which is enough to prune whole subtrees at query time.

use crate::error::{GeoError, Result};
use crate::model::PlaceId;
use crate::queue::{BoundedQueue, Scored};
use crate::traits::{ElementLookup, SpatialElement};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;
use tracing::debug;

pub const EARTH_RADIUS_KM: f32 = 6371.0;

/// Leaf size the automatic depth aims for.
pub const POINTS_PER_TILE: usize = 2000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoTree {
    ordered: Vec<PlaceId>,
    /// `(min, max)` per tile, level after level.
    bounds: Vec<f32>,
    depth: usize,
}

/// Explicit traversal state, replaces recursion.
#[derive(Debug, Clone, Copy)]
struct Frame {
    depth: usize,
    /// Left tile of the sibling pair at `depth`.
    tile: usize,
    right_checked: bool,
}

#[inline]
fn tile_range(len: usize, tiles: usize, tile: usize) -> Range<usize> {
    tile * len / tiles..(tile + 1) * len / tiles
}

#[inline]
fn bounds_offset(depth: usize) -> usize {
    ((1 << depth) - 1) * 2
}

/// `log2(count / POINTS_PER_TILE)`, at least one level.
pub fn default_depth(count: usize) -> usize {
    let depth = ((count / POINTS_PER_TILE) as f32).log2();
    if depth.is_finite() && depth >= 1.0 {
        depth as usize
    } else {
        1
    }
}

impl GeoTree {
    /// Builds the tree over every element. `depth` overrides the automatic
    /// choice of [`default_depth`].
    pub fn build<T: SpatialElement>(elements: &HashMap<PlaceId, T>, depth: Option<usize>) -> Self {
        let mut ordered: Vec<PlaceId> = elements.keys().copied().collect();
        ordered.sort_unstable();

        let depth = depth.unwrap_or_else(|| default_depth(ordered.len())).max(1);
        let mut bounds = Vec::with_capacity(bounds_offset(depth));

        for z in 0..depth {
            let tiles = 1 << z;
            let by_latitude = z % 2 == 0;
            debug!(level = z, depth, tiles, "quadtree: sorting level");

            let axis = |id: &PlaceId| {
                let element = &elements[id];
                if by_latitude {
                    element.latitude()
                } else {
                    element.longitude()
                }
            };

            for tile in 0..tiles {
                let range = tile_range(ordered.len(), tiles, tile);
                let slice = &mut ordered[range];
                slice.sort_by(|a, b| axis(a).total_cmp(&axis(b)));
                match (slice.first(), slice.last()) {
                    (Some(first), Some(last)) => {
                        bounds.push(axis(first));
                        bounds.push(axis(last));
                    }
                    // an empty tile never overlaps anything
                    _ => {
                        bounds.push(f32::INFINITY);
                        bounds.push(f32::NEG_INFINITY);
                    }
                }
            }
        }

        Self {
            ordered,
            bounds,
            depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Checks the structural invariants, e.g. after decoding a snapshot.
    pub fn validate(&self) -> Result<()> {
        if self.bounds.len() != bounds_offset(self.depth) {
            return Err(GeoError::InvalidData(format!(
                "quadtree of depth {} has {} bounds, expected {}",
                self.depth,
                self.bounds.len(),
                bounds_offset(self.depth)
            )));
        }
        Ok(())
    }

    #[inline]
    fn bound(&self, depth: usize, tile: usize) -> (f32, f32) {
        let offset = bounds_offset(depth) + tile * 2;
        (self.bounds[offset], self.bounds[offset + 1])
    }

    /// Up to `count` elements within `max_distance_km`, nearest first.
    ///
    /// Distances use [`SpatialElement::distance_km`].
    pub fn knn<T, L>(
        &self,
        latitude: f32,
        longitude: f32,
        count: usize,
        max_distance_km: f32,
        elements: &L,
    ) -> Result<Vec<Scored>>
    where
        T: SpatialElement,
        L: ElementLookup<T>,
    {
        let mut queue = BoundedQueue::distance(count);
        if self.ordered.is_empty() || self.depth == 0 || count == 0 {
            return Ok(queue.into_vec());
        }

        let delta_lat = max_distance_km / (EARTH_RADIUS_KM * std::f32::consts::PI * 2.0) * 360.0;
        let lon_sine = (max_distance_km / EARTH_RADIUS_KM).sin() / latitude.to_radians().cos();
        // close to the poles the small circle covers every longitude
        let delta_lon = if lon_sine.is_finite() && lon_sine.abs() <= 1.0 {
            lon_sine.asin().to_degrees()
        } else {
            180.0
        };
        let latitude_range = (latitude - delta_lat, latitude + delta_lat);
        let longitude_range = (longitude - delta_lon, longitude + delta_lon);

        let mut stack = vec![Frame {
            depth: 0,
            tile: 0,
            right_checked: false,
        }];

        while let Some(&Frame {
            depth,
            tile,
            right_checked,
        }) = stack.last()
        {
            let tile = tile + usize::from(right_checked);
            if right_checked || depth == 0 {
                stack.pop();
            } else if let Some(top) = stack.last_mut() {
                top.right_checked = true;
            }

            let (low, high) = self.bound(depth, tile);
            let (from, to) = if depth % 2 == 0 {
                latitude_range
            } else {
                longitude_range
            };
            if low > to || high < from {
                continue;
            }

            if depth + 1 < self.depth {
                stack.push(Frame {
                    depth: depth + 1,
                    tile: tile * 2,
                    right_checked: false,
                });
                continue;
            }

            for &id in &self.ordered[tile_range(self.ordered.len(), 1 << depth, tile)] {
                let element = elements.element(id).ok_or(GeoError::InconsistentIndex(id))?;
                let distance = element.distance_km(latitude, longitude);
                if distance <= max_distance_km {
                    queue.insert(id, distance);
                }
            }
        }
        Ok(queue.into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        latitude: f32,
        longitude: f32,
    }

    impl SpatialElement for Point {
        fn latitude(&self) -> f32 {
            self.latitude
        }
        fn longitude(&self) -> f32 {
            self.longitude
        }
    }

    fn diagonal(count: u32) -> HashMap<PlaceId, Point> {
        (0..count)
            .map(|i| {
                let v = i as f32 / 10.0;
                (
                    i,
                    Point {
                        latitude: v,
                        longitude: v,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn builds_flat_layout() {
        let points = diagonal(256);
        let tree = GeoTree::build(&points, Some(5));
        assert_eq!(tree.len(), 256);
        assert_eq!(tree.depth(), 5);
        assert_eq!(tree.bounds.len(), 2 * (1 + 2 + 4 + 8 + 16));
        tree.validate().expect("valid layout");

        let mut ids = tree.ordered.clone();
        ids.sort_unstable();
        assert_eq!(ids, (0..256).collect::<Vec<_>>());
    }

    #[test]
    fn nearest_neighbours_on_grid() {
        let points = diagonal(256);
        let tree = GeoTree::build(&points, Some(5));

        let res = tree.knn(0.72, 0.71, 5, 500.0, &points).unwrap();
        assert_eq!(res.len(), 5);
        assert_eq!(res[0].id, 7);
        assert!((res[0].score - 2.486387).abs() < 1e-3);
        assert_eq!(res[1].id, 8);
        assert!((res[1].score - 13.3895855).abs() < 1e-3);
        assert!(res.windows(2).all(|w| w[0].score <= w[1].score));
    }

    #[test]
    fn every_point_finds_itself_first() {
        let points = diagonal(256);
        let tree = GeoTree::build(&points, Some(5));
        for i in 0..256u32 {
            let v = i as f32 / 10.0;
            let res = tree.knn(v + 0.02, v + 0.01, 5, 500.0, &points).unwrap();
            assert_eq!(res[0].id, i, "query near point {i}");
            assert_ne!(res[1].id, i);
        }
    }

    #[test]
    fn radius_limits_results() {
        let points = diagonal(256);
        let tree = GeoTree::build(&points, Some(5));
        let res = tree.knn(0.72, 0.71, 5, 5.0, &points).unwrap();
        assert_eq!(res.iter().map(|s| s.id).collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn automatic_depth_handles_small_sets() {
        assert_eq!(default_depth(0), 1);
        assert_eq!(default_depth(3999), 1);
        assert_eq!(default_depth(16_000), 3);

        let points = diagonal(3);
        let tree = GeoTree::build(&points, None);
        assert_eq!(tree.depth(), 1);
        let res = tree.knn(0.1, 0.1, 5, 100.0, &points).unwrap();
        assert_eq!(res[0].id, 1);
    }

    #[test]
    fn empty_tiles_are_skipped() {
        let points = diagonal(5);
        let tree = GeoTree::build(&points, Some(4));
        tree.validate().unwrap();
        let res = tree.knn(0.4, 0.4, 2, 50.0, &points).unwrap();
        assert_eq!(res[0].id, 4);
        assert_eq!(res[1].id, 3);
    }

    #[test]
    fn missing_element_is_an_inconsistency() {
        let points = diagonal(16);
        let tree = GeoTree::build(&points, Some(2));
        let mut partial = diagonal(16);
        partial.remove(&3);
        let err = tree.knn(0.3, 0.3, 3, 100.0, &partial).unwrap_err();
        assert!(matches!(err, GeoError::InconsistentIndex(3)));
    }
}
