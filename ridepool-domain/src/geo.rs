use serde::{Deserialize, Serialize};

/// Mean earth radius in miles.
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A WGS84 latitude/longitude pair.
///
/// Distances between points are great-circle (haversine), never Euclidean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Reject coordinates outside the WGS84 domain before they reach any store.
    pub fn validate(&self) -> Result<(), GeoError> {
        let lat_ok = self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat);
        let lng_ok = self.lng.is_finite() && (-180.0..=180.0).contains(&self.lng);

        if !lat_ok || !lng_ok {
            return Err(GeoError::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            });
        }
        Ok(())
    }

    /// Great-circle distance to `other`, in miles.
    pub fn distance_miles(&self, other: &GeoPoint) -> f64 {
        let (lat1, lon1) = (self.lat.to_radians(), self.lng.to_radians());
        let (lat2, lon2) = (other.lat.to_radians(), other.lng.to_radians());
        let dlat = lat2 - lat1;
        let dlon = lon2 - lon1;
        let sin_dlat = (dlat * 0.5).sin();
        let sin_dlon = (dlon * 0.5).sin();
        let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
        let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
        EARTH_RADIUS_MILES * c
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GeoError {
    #[error("Invalid coordinate: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },
}
