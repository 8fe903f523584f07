// crates/toponym-core/src/traits.rs
use crate::model::PlaceId;
use std::collections::HashMap;

/// Mean circumference of the earth used by the planar distance approximation.
pub const EARTH_CIRCUMFERENCE_KM: f32 = 40030.0;

/// Anything with a position that the quadtree can index.
///
/// # Examples
/// ```rust
/// use toponym_core::traits::SpatialElement;
///
/// struct Point(f32, f32);
/// impl SpatialElement for Point {
///     fn latitude(&self) -> f32 { self.0 }
///     fn longitude(&self) -> f32 { self.1 }
/// }
///
/// let d = Point(0.7, 0.7).distance_km(0.72, 0.71);
/// assert!((d - 2.486).abs() < 1e-3);
/// ```
pub trait SpatialElement {
    fn latitude(&self) -> f32;
    fn longitude(&self) -> f32;

    /// Flat-plane approximation of the distance in kilometres.
    ///
    /// Treats degrees of latitude and longitude as equal lengths. Good enough
    /// for city scale radii and much cheaper than a great-circle formula.
    #[inline]
    fn distance_km(&self, latitude: f32, longitude: f32) -> f32 {
        let d_lat = self.latitude() - latitude;
        let d_lon = self.longitude() - longitude;
        (d_lat * d_lat + d_lon * d_lon).sqrt() / 360.0 * EARTH_CIRCUMFERENCE_KM
    }
}

/// Anything carrying a popularity score that search results are ordered by.
pub trait Ranked {
    fn ranking(&self) -> f32;
}

/// Id based access to elements, used by both indices at query time.
///
/// `None` means the index and the element store disagree; callers surface
/// that as [`crate::GeoError::InconsistentIndex`].
pub trait ElementLookup<T> {
    fn element(&self, id: PlaceId) -> Option<&T>;
}

impl<T> ElementLookup<T> for HashMap<PlaceId, T> {
    #[inline]
    fn element(&self, id: PlaceId) -> Option<&T> {
        self.get(&id)
    }
}
