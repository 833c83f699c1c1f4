//! Coordinates and great-circle distance.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::numbers::round_f64_to_u32;

/// Mean Earth radius used for every distance in the crate.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Ordered coordinate sequence. Routes and drift paths rarely exceed eight points.
pub type Path = SmallVec<[Coordinate; 8]>;

/// A longitude/latitude pair in degrees.
///
/// Values are not range-restricted: jittered samples may fall outside
/// `[-180, 180] x [-90, 90]` and are still valid inputs to the water check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Linear interpolation between two coordinates at fraction `t`.
    #[must_use]
    pub fn lerp(start: Self, end: Self, t: f64) -> Self {
        Self {
            lon: start.lon + (end.lon - start.lon) * t,
            lat: start.lat + (end.lat - start.lat) * t,
        }
    }

    /// Shift by the given degree offsets.
    #[must_use]
    pub fn offset(self, d_lon: f64, d_lat: f64) -> Self {
        Self {
            lon: self.lon + d_lon,
            lat: self.lat + d_lat,
        }
    }
}

/// Haversine distance in kilometres.
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance rounded to the nearest whole kilometre.
#[must_use]
pub fn great_circle_km(a: Coordinate, b: Coordinate) -> u32 {
    round_f64_to_u32(haversine_km(a, b))
}
