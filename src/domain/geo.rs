//! Great-circle distance on a spherical Earth.
//!
//! [`GeoPoint`] can only be built from a finite latitude in [-90, 90] and a
//! finite longitude in [-180, 180], so [`distance`] itself never fails.
//! [`haversine_km`] is the raw-coordinate entry point and reports
//! [`EtlError::InvalidCoordinate`] for anything outside those ranges.

use crate::utils::error::{EtlError, Result};
use std::fmt;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let invalid = |reason: &str| EtlError::InvalidCoordinate {
            latitude,
            longitude,
            reason: reason.to_string(),
        };

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid("coordinates must be finite numbers"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn distance_to(&self, other: &GeoPoint) -> Distance {
        distance(*self, *other)
    }
}

/// Non-negative distance in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Distance(f64);

impl Distance {
    pub const ZERO: Distance = Distance(0.0);

    pub fn kilometers(self) -> f64 {
        self.0
    }
}

impl std::ops::Add for Distance {
    type Output = Distance;

    fn add(self, rhs: Distance) -> Distance {
        Distance(self.0 + rhs.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} km", self.0)
    }
}

/// Haversine distance between two points.
pub fn distance(a: GeoPoint, b: GeoPoint) -> Distance {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // rounding can push h just past 1 near the poles and antipodes
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    Distance(EARTH_RADIUS_KM * c)
}

/// Distance in kilometers between two raw (latitude, longitude) pairs.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64> {
    let a = GeoPoint::new(lat1, lon1)?;
    let b = GeoPoint::new(lat2, lon2)?;
    Ok(distance(a, b).kilometers())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const HALF_CIRCUMFERENCE_KM: f64 = EARTH_RADIUS_KM * PI;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn sample_points() -> Vec<GeoPoint> {
        vec![
            point(0.0, 0.0),
            point(51.4700, -0.4543),
            point(40.6413, -73.7781),
            point(-33.9461, 151.1772),
            point(35.5494, 139.7798),
            point(90.0, 0.0),
            point(-90.0, 45.0),
            point(0.0, 180.0),
            point(0.0, -180.0),
            point(-54.8433, -68.2958),
        ]
    }

    #[test]
    fn test_identical_points_are_zero() {
        for p in sample_points() {
            assert_eq!(distance(p, p).kilometers(), 0.0);
        }
        assert_eq!(haversine_km(0.0, 0.0, 0.0, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_symmetric_and_non_negative() {
        let points = sample_points();
        for a in &points {
            for b in &points {
                let ab = distance(*a, *b).kilometers();
                let ba = distance(*b, *a).kilometers();
                assert_eq!(ab, ba, "asymmetric for {:?} / {:?}", a, b);
                assert!(ab >= 0.0);
            }
        }
    }

    #[test]
    fn test_triangle_inequality() {
        let points = sample_points();
        for a in &points {
            for b in &points {
                for c in &points {
                    let ac = a.distance_to(c).kilometers();
                    let via_b = a.distance_to(b).kilometers() + b.distance_to(c).kilometers();
                    assert!(ac <= via_b + 1e-3, "{:?} -> {:?} -> {:?}", a, b, c);
                }
            }
        }
    }

    #[test]
    fn test_equator_antipodes_are_half_circumference() {
        let km = haversine_km(0.0, 0.0, 0.0, 180.0).unwrap();
        assert!((km - HALF_CIRCUMFERENCE_KM).abs() < 1e-6);
        assert!((km - 20015.1).abs() < 0.1);
    }

    #[test]
    fn test_off_equator_antipodes_stay_finite() {
        // unclamped, h lands one ulp above 1 here and c becomes NaN
        let km = haversine_km(-25.2, -37.3, 25.2, 142.7).unwrap();
        assert!(km.is_finite());
        assert!((km - HALF_CIRCUMFERENCE_KM).abs() < 1e-6, "got {}", km);

        for lat in [10.7, 33.9, 47.05, 61.3, 72.8, 89.9] {
            let km = haversine_km(-lat, -37.3, lat, 142.7).unwrap();
            assert!(km.is_finite(), "lat {} gave {}", lat, km);
            assert!((km - HALF_CIRCUMFERENCE_KM).abs() < 1e-3, "lat {} gave {}", lat, km);
        }
    }

    #[test]
    fn test_heathrow_to_jfk() {
        let km = haversine_km(51.4700, -0.4543, 40.6413, -73.7781).unwrap();
        assert!((5540.0..=5560.0).contains(&km), "got {}", km);
    }

    #[test]
    fn test_poles_ignore_longitude() {
        for lon in [-180.0, -90.0, 0.0, 33.3, 180.0] {
            let km = haversine_km(90.0, 0.0, -90.0, lon).unwrap();
            assert!((km - 20015.1).abs() < 0.1, "lon {} gave {}", lon, km);
        }
        let km = haversine_km(90.0, -120.0, 90.0, 60.0).unwrap();
        assert!(km.abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_latitude_rejected() {
        let err = haversine_km(91.0, 0.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, EtlError::InvalidCoordinate { latitude, .. } if latitude == 91.0));
        assert!(GeoPoint::new(-90.5, 0.0).is_err());
    }

    #[test]
    fn test_out_of_range_longitude_rejected() {
        assert!(matches!(
            haversine_km(0.0, 0.0, 0.0, 180.01),
            Err(EtlError::InvalidCoordinate { .. })
        ));
        assert!(GeoPoint::new(0.0, -181.0).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        for (lat, lon) in [
            (f64::NAN, 0.0),
            (0.0, f64::NAN),
            (f64::INFINITY, 0.0),
            (0.0, f64::NEG_INFINITY),
        ] {
            assert!(matches!(
                GeoPoint::new(lat, lon),
                Err(EtlError::InvalidCoordinate { .. })
            ));
        }
    }

    #[test]
    fn test_boundaries_accepted() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_distance_display() {
        let d = point(0.0, 0.0).distance_to(&point(0.0, 180.0));
        assert_eq!(d.to_string(), "20015.1 km");
        assert_eq!((Distance::ZERO + d).kilometers(), d.kilometers());
    }
}
