use geo::{Distance, Geodesic, Point};
use serde::{Deserialize, Serialize};

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Geodesic distance to `other` in metres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_meters(*self, *other)
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        Point::new(coordinate.lon, coordinate.lat)
    }
}

/// Distance between two coordinates along the WGS-84 ellipsoid (Karney's
/// geodesic algorithm).
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    Geodesic.distance(Point::from(a), Point::from(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_apart() {
        let p = Coordinate::new(34.4876, 136.7122);
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_on_the_ellipsoid() {
        // Meridian arc from the equator, shorter than on a sphere.
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let d = distance_meters(a, b);
        assert!((d - 110_574.389).abs() < 0.01, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(34.48756, 136.71216);
        let b = Coordinate::new(34.48906, 136.71424);
        let ab = distance_meters(a, b);
        let ba = distance_meters(b, a);
        assert!((ab - ba).abs() < 1e-6);
        assert!((ab - 253.356).abs() < 0.01, "got {ab}");
    }
}
