//! Great-circle distance, used both as edge weight and as search heuristic.

use geo::Point;

use crate::Kilometers;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometers.
///
/// Returns `None` when any coordinate is non-finite, so that malformed
/// points cannot take part in distance rankings. The measure is symmetric,
/// zero exactly for identical coordinates, and satisfies the triangle
/// inequality, which makes it usable as an admissible search heuristic.
pub fn haversine(from: &Point<f64>, to: &Point<f64>) -> Option<Kilometers> {
    let (lon1, lat1) = (from.x(), from.y());
    let (lon2, lat2) = (to.x(), to.y());
    if !(lon1.is_finite() && lat1.is_finite() && lon2.is_finite() && lat2.is_finite()) {
        return None;
    }

    let (lat1, lon1) = (lat1.to_radians(), lon1.to_radians());
    let (lat2, lon2) = (lat2.to_radians(), lon2.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    Some(EARTH_RADIUS_KM * c)
}

#[cfg(test)]
mod test {
    use super::*;

    const ONE_DEGREE_KM: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

    #[test]
    fn symmetric() {
        let prague = Point::new(14.4208, 50.0880);
        let brno = Point::new(16.6068, 49.1951);
        assert_eq!(haversine(&prague, &brno), haversine(&brno, &prague));
    }

    #[test]
    fn zero_for_identical_points() {
        let p = Point::new(14.4208, 50.0880);
        assert_eq!(haversine(&p, &p), Some(0.0));
    }

    #[test]
    fn one_degree_along_equator() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let d = haversine(&a, &b).unwrap();
        assert!((d - ONE_DEGREE_KM).abs() < 1e-9, "got {d}");
    }

    #[test]
    fn triangle_inequality() {
        let points = [
            Point::new(14.42, 50.09),
            Point::new(16.61, 49.20),
            Point::new(12.55, 50.31),
            Point::new(0.0, 0.0),
            Point::new(-73.99, 40.73),
        ];
        for a in &points {
            for b in &points {
                for c in &points {
                    let ac = haversine(a, c).unwrap();
                    let ab = haversine(a, b).unwrap();
                    let bc = haversine(b, c).unwrap();
                    assert!(ac <= ab + bc + 1e-9);
                }
            }
        }
    }

    #[test]
    fn invalid_coordinates_are_not_measured() {
        let good = Point::new(14.42, 50.09);
        let nan = Point::new(f64::NAN, 50.09);
        let inf = Point::new(14.42, f64::INFINITY);
        assert_eq!(haversine(&good, &nan), None);
        assert_eq!(haversine(&nan, &good), None);
        assert_eq!(haversine(&inf, &nan), None);
    }
}
