//! Great-circle distance on a spherical Earth.
//!
//! Distances use the spherical law of cosines. Within one query the cosine and sine of the query
//! latitude are computed once in [`QueryPoint::new`] and shared by every exact distance and every
//! box bound evaluated for that query.

use std::f64::consts::PI;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth circumference in kilometers, used for the north/south box bound.
pub const EARTH_CIRCUMFERENCE_KM: f64 = 40007.0;

/// Degrees to radians.
pub const RAD: f64 = PI / 180.0;

/// Great-circle distance in kilometers between two longitude/latitude points given in degrees.
///
/// ```
/// use geo_kdtree::distance;
///
/// let d = distance(30.5, 50.5, -119.7, 34.4);
/// assert!((d - 10131.7396).abs() < 1e-4);
/// ```
pub fn distance(lng: f64, lat: f64, lng2: f64, lat2: f64) -> f64 {
    QueryPoint::new(lng, lat).distance_to(lng2, lat2)
}

/// A query location with its latitude trigonometry precomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryPoint {
    lng: f64,
    lat: f64,
    cos_lat: f64,
    sin_lat: f64,
}

impl QueryPoint {
    /// Create a new query point from degrees.
    ///
    /// Coordinates are not validated. Values outside of `[-180, 180] x [-90, 90]` produce
    /// meaningless but finite distances.
    pub fn new(lng: f64, lat: f64) -> Self {
        Self {
            lng,
            lat,
            cos_lat: (lat * RAD).cos(),
            sin_lat: (lat * RAD).sin(),
        }
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Cosine of the latitude.
    pub fn cos_lat(&self) -> f64 {
        self.cos_lat
    }

    /// Sine of the latitude.
    pub fn sin_lat(&self) -> f64 {
        self.sin_lat
    }

    /// `cos` of the longitude difference between `lng` and this point.
    #[inline]
    pub fn cos_lng_delta(&self, lng: f64) -> f64 {
        ((lng - self.lng) * RAD).cos()
    }

    /// Great-circle distance in kilometers from this point to `(lng, lat)`.
    #[inline]
    pub fn distance_to(&self, lng: f64, lat: f64) -> f64 {
        arc_km(distance_part(
            lat,
            self.cos_lat,
            self.sin_lat,
            self.cos_lng_delta(lng),
        ))
    }
}

/// The cosine of the central angle between a query point and a target at latitude `lat`.
///
/// `cos_lat` and `sin_lat` belong to the query point and `cos_lng_delta` is the cosine of the
/// longitude difference. Larger values mean closer points. The result is clamped to `[-1, 1]` so
/// that rounding never pushes it outside the domain of `acos`.
#[inline]
pub fn distance_part(lat: f64, cos_lat: f64, sin_lat: f64, cos_lng_delta: f64) -> f64 {
    let d = sin_lat * (lat * RAD).sin() + cos_lat * (lat * RAD).cos() * cos_lng_delta;
    d.clamp(-1.0, 1.0)
}

/// Convert a clamped [`distance_part`] value into kilometers.
#[inline]
pub(crate) fn arc_km(part: f64) -> f64 {
    EARTH_RADIUS_KM * part.acos()
}

#[cfg(test)]
mod test {
    use super::*;
    use geo_0_31::algorithm::{Distance, Haversine};
    use geo_0_31::Point;

    #[test]
    fn kiev_to_santa_barbara() {
        let d = distance(30.5, 50.5, -119.7, 34.4);
        let rounded = (1e4 * d).round() / 1e4;
        assert!((rounded - 10131.7396).abs() < 1e-9, "got {}", rounded);
    }

    #[test]
    fn identical_points_are_zero_apart() {
        // cos of the central angle can round above 1 here
        for (lng, lat) in [(30.5, 50.5), (-119.7051, 34.4363), (0.1, 89.9), (179.9, -12.3)] {
            let d = distance(lng, lat, lng, lat);
            assert!(d.is_finite());
            assert!(d < 1e-3, "{} {} -> {}", lng, lat, d);
        }
    }

    #[test]
    fn antipodal_points_are_finite() {
        let d = distance(0., 0., 180., 0.);
        assert!(d.is_finite());
        assert!((d - PI * EARTH_RADIUS_KM).abs() < 1e-6);

        let d = distance(45., 30., -135., -30.);
        assert!(d.is_finite());
    }

    #[test]
    fn symmetric() {
        let pairs = [
            ((30.5, 50.5), (-119.7, 34.4)),
            ((0.0, 0.0), (90.0, 45.0)),
            ((-73.9, 40.7), (139.7, 35.7)),
            ((12.1, -33.3), (12.2, -33.4)),
        ];
        for ((a_lng, a_lat), (b_lng, b_lat)) in pairs {
            let ab = distance(a_lng, a_lat, b_lng, b_lat);
            let ba = distance(b_lng, b_lat, a_lng, a_lat);
            assert!((ab - ba).abs() <= 1e-9 * ab.max(1.0), "{} != {}", ab, ba);
        }
    }

    #[test]
    fn agrees_with_haversine() {
        // geo uses a mean radius of 6371.0088 km
        let pairs = [
            ((30.5, 50.5), (-119.7, 34.4)),
            ((-74.0, 40.7), (-0.1, 51.5)),
            ((151.2, -33.9), (-58.4, -34.6)),
            ((10.0, 10.0), (10.5, 10.5)),
        ];
        for ((a_lng, a_lat), (b_lng, b_lat)) in pairs {
            let ours = distance(a_lng, a_lat, b_lng, b_lat);
            let theirs = Haversine.distance(Point::new(a_lng, a_lat), Point::new(b_lng, b_lat)) / 1000.;
            assert!(
                ((ours - theirs) / theirs).abs() < 1e-5,
                "{} vs {}",
                ours,
                theirs
            );
        }
    }

    #[test]
    fn distance_part_is_clamped() {
        // A cos_lng_delta slightly above 1 would otherwise overshoot
        let q = QueryPoint::new(0., 0.);
        let part = distance_part(0., q.cos_lat(), q.sin_lat(), 1.0 + 1e-12);
        assert_eq!(part, 1.0);
        let part = distance_part(0., q.cos_lat(), q.sin_lat(), -1.0 - 1e-12);
        assert_eq!(part, -1.0);
    }
}
