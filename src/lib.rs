#![doc = include_str!("../README.md")]

mod error;
pub mod geo;
pub mod indices;
pub mod kdtree;
mod r#type;

pub use error::{GeoKdError, Result};
#[cfg(feature = "rayon")]
pub use geo::par_around;
pub use geo::{around_items, box_dist, distance, try_around_items, GeoBox, Neighbor, QueryPoint};
pub use r#type::{CoordType, IndexableNum};

#[cfg(test)]
pub(crate) mod test;
