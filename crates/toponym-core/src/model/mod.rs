// crates/toponym-core/src/model/mod.rs
pub mod feature;
pub mod place;

pub use place::{PlaceId, PlaceRecord, PlaceView};
