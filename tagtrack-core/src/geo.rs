//! Great-circle distance between two latitude/longitude pairs.

/// Mean Earth radius used for the spherical model, in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two points given in degrees.
///
/// Identical points give 0 and the result is symmetric in its arguments.
/// The intermediate term is clamped to `[0, 1]` so rounding near antipodal
/// points cannot push `asin` out of its domain. NaN inputs yield NaN.
///
/// # Example
/// ```
/// use tagtrack_core::geo::distance;
/// let d = distance(0.0, 0.0, 0.0, 1.0);
/// assert!((d - 111_195.0).abs() < 50.0);
/// ```
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);

    // f64::clamp passes NaN through unchanged
    let c = 2.0 * a.sqrt().clamp(0.0, 1.0).asin();

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_identical_points() {
        for &(lat, lon) in &[(0.0, 0.0), (37.0, -122.0), (-89.9, 179.9), (51.5, -0.1)] {
            assert_eq!(distance(lat, lon, lat, lon), 0.0);
        }
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ((37.0, -122.0), (37.001, -122.0)),
            ((51.5, -0.1), (48.85, 2.35)),
            ((-33.9, 151.2), (40.7, -74.0)),
            ((0.0, 179.5), (0.0, -179.5)),
        ];
        for ((lat1, lon1), (lat2, lon2)) in pairs {
            let ab = distance(lat1, lon1, lat2, lon2);
            let ba = distance(lat2, lon2, lat1, lon1);
            assert!((ab - ba).abs() < 1e-6, "{} vs {}", ab, ba);
        }
    }

    #[test]
    fn test_one_degree_on_equator() {
        let d = distance(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111_195.0).abs() < 50.0, "got {}", d);
    }

    #[test]
    fn test_small_latitude_step() {
        let d = distance(37.0, -122.0, 37.001, -122.0);
        assert!((d - 111.0).abs() < 5.0, "got {}", d);
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let d = distance(0.0, 0.0, 0.0, 180.0);
        assert!(!d.is_nan());
        assert!((d - PI * EARTH_RADIUS_M).abs() < 1.0);

        let d = distance(45.0, 30.0, -45.0, -150.0);
        assert!(!d.is_nan());
        assert!((d - PI * EARTH_RADIUS_M).abs() < 1.0);
    }

    #[test]
    fn test_dateline_crossing() {
        let d = distance(0.0, 179.5, 0.0, -179.5);
        assert!((d - 111_195.0).abs() < 50.0, "got {}", d);
    }

    #[test]
    fn test_nan_propagates() {
        assert!(distance(f64::NAN, 0.0, 0.0, 0.0).is_nan());
        assert!(distance(0.0, 0.0, 0.0, f64::NAN).is_nan());
    }
}
