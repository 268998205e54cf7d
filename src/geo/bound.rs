//! Lower bounds on the great-circle distance from a query point to a longitude/latitude box.

use crate::geo::distance::{arc_km, distance_part, QueryPoint, EARTH_CIRCUMFERENCE_KM, RAD};

/// An axis-aligned longitude/latitude box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl GeoBox {
    /// The whole sphere.
    pub const WORLD: GeoBox = GeoBox {
        min_lng: -180.,
        min_lat: -90.,
        max_lng: 180.,
        max_lat: 90.,
    };

    /// Create a new box from its corners.
    pub fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }

    /// Returns `true` if `(lng, lat)` lies inside this box or on its edge.
    #[inline]
    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        lng >= self.min_lng && lng <= self.max_lng && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Split this box on `axis` (0 for longitude, 1 for latitude) at `value`.
    ///
    /// The first box keeps everything below `value` on that axis, the second everything above.
    /// Both include `value` itself.
    #[inline]
    pub fn split(&self, axis: usize, value: f64) -> (GeoBox, GeoBox) {
        let mut lower = *self;
        let mut upper = *self;
        if axis == 0 {
            lower.max_lng = value;
            upper.min_lng = value;
        } else {
            lower.max_lat = value;
            upper.min_lat = value;
        }
        (lower, upper)
    }
}

impl Default for GeoBox {
    fn default() -> Self {
        Self::WORLD
    }
}

/// A lower bound, in kilometers, on the great-circle distance from `query` to any point inside
/// `bbox`.
///
/// The bound never exceeds the true distance, which is what lets a best-first search emit a
/// point as soon as it is closer than every unexpanded box.
pub fn box_dist(query: &QueryPoint, bbox: &GeoBox) -> f64 {
    let lng = query.lng();
    let lat = query.lat();

    // query point is between minimum and maximum longitudes
    if lng >= bbox.min_lng && lng <= bbox.max_lng {
        if lat <= bbox.min_lat {
            // south of the box
            return EARTH_CIRCUMFERENCE_KM * (bbox.min_lat - lat) / 360.;
        }
        if lat >= bbox.max_lat {
            // north of the box
            return EARTH_CIRCUMFERENCE_KM * (lat - bbox.max_lat) / 360.;
        }
        return 0.;
    }

    // The query is east or west of the box, so the nearest point lies on the closest meridian
    // edge. Along that meridian the distance has an extremum where its derivative in latitude
    // vanishes.
    let closest_lng = if (bbox.min_lng - lng).rem_euclid(360.) <= (lng - bbox.max_lng).rem_euclid(360.)
    {
        bbox.min_lng
    } else {
        bbox.max_lng
    };
    let cos_lng_delta = query.cos_lng_delta(closest_lng);
    let extremum_lat = (query.sin_lat() / (query.cos_lat() * cos_lng_delta)).atan() / RAD;

    let part = |lat: f64| distance_part(lat, query.cos_lat(), query.sin_lat(), cos_lng_delta);

    // the minimum over the edge is at one of its corners or at the extremum
    let mut d = part(bbox.min_lat).max(part(bbox.max_lat));
    if extremum_lat > bbox.min_lat && extremum_lat < bbox.max_lat {
        d = d.max(part(extremum_lat));
    }

    arc_km(d)
}

impl QueryPoint {
    /// A lower bound on the distance from this point to anything inside `bbox`. See [`box_dist`].
    #[inline]
    pub fn box_dist(&self, bbox: &GeoBox) -> f64 {
        box_dist(self, bbox)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geo::distance::distance;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn inside_box_is_zero() {
        let q = QueryPoint::new(30.5, 50.5);
        assert_eq!(q.box_dist(&GeoBox::WORLD), 0.);
        assert_eq!(q.box_dist(&GeoBox::new(30., 50., 31., 51.)), 0.);
    }

    #[test]
    fn north_and_south_use_linear_latitude_gap() {
        let q = QueryPoint::new(10., 0.);
        let bbox = GeoBox::new(0., 10., 20., 20.);
        let expected = EARTH_CIRCUMFERENCE_KM * 10. / 360.;
        assert!((q.box_dist(&bbox) - expected).abs() < 1e-9);

        let q = QueryPoint::new(10., 30.);
        let expected = EARTH_CIRCUMFERENCE_KM * 10. / 360.;
        assert!((q.box_dist(&bbox) - expected).abs() < 1e-9);

        // never more than the true meridian distance
        assert!(q.box_dist(&bbox) <= distance(10., 30., 10., 20.));
    }

    #[test]
    fn east_of_box_matches_nearest_edge_point() {
        // On the equator the nearest point of a box straddling it is on the equator
        let q = QueryPoint::new(20., 0.);
        let bbox = GeoBox::new(0., -5., 10., 5.);
        let d = q.box_dist(&bbox);
        assert!((d - distance(20., 0., 10., 0.)).abs() < 1e-6);
    }

    #[test]
    fn interior_extremum_is_used() {
        // Great circles bulge poleward: from (0, 60) the closest point of the 40E meridian edge is
        // near 66N, well inside the box and far from both corners.
        let q = QueryPoint::new(0., 60.);
        let bbox = GeoBox::new(40., 0., 50., 89.);
        let d = q.box_dist(&bbox);
        assert!(d < distance(0., 60., 40., 89.) - 1000.);
        assert!(d < distance(0., 60., 40., 0.) - 1000.);

        let nearest = (0..=8900)
            .map(|i| distance(0., 60., 40., i as f64 / 100.))
            .fold(f64::INFINITY, f64::min);
        assert!(d <= nearest + 1e-9);
        assert!(nearest - d < 1e-3);
    }

    #[test]
    fn wraps_across_antimeridian() {
        // 175E is closer to -175 going east than to 170W going west
        let q = QueryPoint::new(175., 0.);
        let bbox = GeoBox::new(-175., -1., -170., 1.);
        let d = q.box_dist(&bbox);
        assert!((d - distance(175., 0., -175., 0.)).abs() < 1e-6);
    }

    #[test]
    fn never_exceeds_distance_to_enclosed_points() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let q_lng = rng.gen_range(-180.0..180.0);
            let q_lat = rng.gen_range(-90.0..90.0);
            let query = QueryPoint::new(q_lng, q_lat);

            let lng_a: f64 = rng.gen_range(-180.0..180.0);
            let lng_b: f64 = rng.gen_range(-180.0..180.0);
            let lat_a: f64 = rng.gen_range(-90.0..90.0);
            let lat_b: f64 = rng.gen_range(-90.0..90.0);
            let bbox = GeoBox::new(lng_a.min(lng_b), lat_a.min(lat_b), lng_a.max(lng_b), lat_a.max(lat_b));
            let bound = query.box_dist(&bbox);

            for _ in 0..20 {
                let lng = rng.gen_range(bbox.min_lng..=bbox.max_lng);
                let lat = rng.gen_range(bbox.min_lat..=bbox.max_lat);
                let d = query.distance_to(lng, lat);
                assert!(
                    bound <= d + 1e-6,
                    "bound {} > distance {} for query ({}, {}) box {:?} point ({}, {})",
                    bound,
                    d,
                    q_lng,
                    q_lat,
                    bbox,
                    lng,
                    lat
                );
            }
        }
    }

    #[test]
    fn split_clips_one_axis() {
        let (lower, upper) = GeoBox::WORLD.split(0, 12.5);
        assert_eq!(lower, GeoBox::new(-180., -90., 12.5, 90.));
        assert_eq!(upper, GeoBox::new(12.5, -90., 180., 90.));

        let (lower, upper) = lower.split(1, -3.);
        assert_eq!(lower, GeoBox::new(-180., -90., 12.5, -3.));
        assert_eq!(upper, GeoBox::new(-180., -3., 12.5, 90.));
    }
}
