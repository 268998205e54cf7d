//! Geographic nearest-neighbor search.
//!
//! - [`distance`](distance()) computes great-circle distances on a sphere of radius
//!   [`EARTH_RADIUS_KM`].
//! - [`box_dist`] bounds the distance from a query point to anything inside a [`GeoBox`] from
//!   below.
//! - [`KDTreeIndex::around`][crate::kdtree::KDTreeIndex::around] and [`around_items`] walk a
//!   [`KDTree`][crate::kdtree::KDTree] best-first and return points in ascending distance.

pub(crate) mod around;
mod bound;
mod distance;

pub use around::{around_items, try_around_items, Neighbor};
#[cfg(feature = "rayon")]
pub use around::par_around;
pub use bound::{box_dist, GeoBox};
pub use distance::{
    distance, distance_part, QueryPoint, EARTH_CIRCUMFERENCE_KM, EARTH_RADIUS_KM, RAD,
};
