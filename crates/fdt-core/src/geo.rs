//! Coordinates of zones, facilities and shelters.
//!
//! Positions are kept as `f32` so the R-tree over graph nodes stays compact;
//! distances are computed in `f64` because they feed route lengths and
//! travel-time estimates.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// A WGS-84 latitude/longitude pair in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f32,
    pub lon: f32,
}

impl GeoPoint {
    pub const fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }

    /// Narrow the `f64` degrees carried by CSV records.
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self::new(lat as f32, lon as f32)
    }

    /// Great-circle (haversine) distance in kilometres.
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        let (lat1, lon1) = (f64::from(self.lat).to_radians(), f64::from(self.lon).to_radians());
        let (lat2, lon2) = (f64::from(other.lat).to_radians(), f64::from(other.lon).to_radians());

        let h = ((lat2 - lat1) / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
    }

    /// `[lat, lon]` key for the spatial index.
    #[inline]
    pub fn as_array(self) -> [f32; 2] {
        [self.lat, self.lon]
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}°N {:.5}°E", self.lat, self.lon)
    }
}
