//! Shared fixtures for unit tests.

mod cities;

pub(crate) use cities::{cities, cities_index, City};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geo::distance;
use crate::kdtree::{KDTree, KDTreeBuilder};

/// `n` uniformly random longitude/latitude points.
pub(crate) fn random_points(n: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (rng.gen_range(-180.0..180.0), rng.gen_range(-90.0..90.0)))
        .collect()
}

pub(crate) fn build_tree(points: &[(f64, f64)], node_size: u16) -> KDTree<f64> {
    let mut builder = KDTreeBuilder::new_with_node_size(points.len() as u32, node_size);
    for (lng, lat) in points {
        builder.add(*lng, *lat);
    }
    builder.finish().unwrap()
}

/// Every point's (index, distance) from `(lng, lat)`, closest first.
pub(crate) fn brute_force(points: &[(f64, f64)], lng: f64, lat: f64) -> Vec<(u32, f64)> {
    let mut all: Vec<(u32, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, (p_lng, p_lat))| (i as u32, distance(lng, lat, *p_lng, *p_lat)))
        .collect();
    all.sort_by(|a, b| a.1.total_cmp(&b.1));
    all
}
