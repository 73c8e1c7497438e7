use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid coordinates")]
pub struct InvalidCoordinates;

/// A validated WGS84 position. Latitude ∈ [-90, 90], longitude ∈ [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinates> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(InvalidCoordinates);
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_the_range_edges() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
        assert!(GeoPoint::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(GeoPoint::new(90.01, 0.0), Err(InvalidCoordinates));
        assert_eq!(GeoPoint::new(-90.01, 0.0), Err(InvalidCoordinates));
        assert_eq!(GeoPoint::new(0.0, 180.01), Err(InvalidCoordinates));
        assert_eq!(GeoPoint::new(0.0, -180.01), Err(InvalidCoordinates));
        assert_eq!(GeoPoint::new(f64::NAN, 0.0), Err(InvalidCoordinates));
    }

    proptest! {
        /// Property: construction succeeds exactly on the closed ranges.
        #[test]
        fn construction_matches_the_declared_ranges(
            lat in -180.0f64..=180.0,
            lng in -360.0f64..=360.0,
        ) {
            let in_range = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng);
            prop_assert_eq!(GeoPoint::new(lat, lng).is_ok(), in_range);
        }
    }
}
