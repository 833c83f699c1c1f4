//! Water-containment check and bounded resampling against it.
//!
//! Navigability is a coarse approximation: a point is "water" when it lies
//! inside the closed box of at least one catalog corridor.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{HAZARD_MAX_ATTEMPTS, WAYPOINT_MAX_ATTEMPTS};
use crate::data::{Catalog, Corridor};
use crate::geo::Coordinate;

impl Corridor {
    /// Closed-box containment. NaN never matches.
    #[must_use]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min.lon && lon <= self.max.lon && lat >= self.min.lat && lat <= self.max.lat
    }

    /// Closest point of this box to `point`.
    #[must_use]
    pub fn clamp(&self, point: Coordinate) -> Coordinate {
        Coordinate::new(
            point.lon.clamp(self.min.lon, self.max.lon),
            point.lat.clamp(self.min.lat, self.max.lat),
        )
    }
}

impl Catalog {
    /// True iff `(lon, lat)` falls inside any corridor.
    #[must_use]
    pub fn is_navigable(&self, lon: f64, lat: f64) -> bool {
        self.corridors.iter().any(|c| c.contains(lon, lat))
    }

    #[must_use]
    pub fn contains_point(&self, point: Coordinate) -> bool {
        self.is_navigable(point.lon, point.lat)
    }

    /// Project `point` onto the nearest corridor box.
    ///
    /// Distance is planar in degrees, with longitude measured the short way
    /// round the antimeridian, so a point at -150 snaps to the Ross Sea box
    /// (edge at 180) rather than the Drake Passage.
    ///
    /// Returns `point` unchanged when it is already navigable or when it is not
    /// finite, and `None` only if the catalog has no corridors.
    #[must_use]
    pub fn nearest_navigable(&self, point: Coordinate) -> Option<Coordinate> {
        if self.contains_point(point) || !point.lon.is_finite() || !point.lat.is_finite() {
            return Some(point);
        }
        self.corridors
            .iter()
            .map(|corridor| {
                let lon = corridor.nearest_wrapped_lon(point.lon);
                let snapped = corridor.clamp(Coordinate::new(lon, point.lat));
                let d_lon = snapped.lon - lon;
                let d_lat = snapped.lat - point.lat;
                (d_lon * d_lon + d_lat * d_lat, snapped)
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, snapped)| snapped)
    }
}

impl Corridor {
    fn lon_gap(&self, lon: f64) -> f64 {
        if lon < self.min.lon {
            self.min.lon - lon
        } else if lon > self.max.lon {
            lon - self.max.lon
        } else {
            0.0
        }
    }

    /// `lon`, shifted by a full turn when that brings it closer to this box.
    fn nearest_wrapped_lon(&self, lon: f64) -> f64 {
        [lon, lon - 360.0, lon + 360.0]
            .into_iter()
            .min_by(|a, b| self.lon_gap(*a).total_cmp(&self.lon_gap(*b)))
            .unwrap_or(lon)
    }
}

/// What to do once every attempt has produced a point outside the corridors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// Keep the last candidate even though it is on "land".
    AcceptLast,
    /// Snap the last candidate onto the nearest corridor.
    NearestCorridor,
}

/// Bounded rejection sampling against the water check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resampler {
    pub max_attempts: u32,
    pub fallback: Fallback,
}

impl Resampler {
    /// Interior route waypoints: best effort, the last candidate wins.
    pub const WAYPOINT: Self = Self {
        max_attempts: WAYPOINT_MAX_ATTEMPTS,
        fallback: Fallback::AcceptLast,
    };

    /// Icebergs, drift paths and alternative routes: always end up in water.
    pub const HAZARD: Self = Self {
        max_attempts: HAZARD_MAX_ATTEMPTS,
        fallback: Fallback::NearestCorridor,
    };

    /// Draw candidates from `propose(rng, attempt)` until one is navigable,
    /// applying the fallback once `max_attempts` candidates have failed.
    ///
    /// `propose` is always called at least once.
    pub fn sample<R, F>(&self, catalog: &Catalog, rng: &mut R, mut propose: F) -> Coordinate
    where
        R: Rng + ?Sized,
        F: FnMut(&mut R, u32) -> Coordinate,
    {
        let attempts = self.max_attempts.max(1);
        let mut candidate = propose(&mut *rng, 0);
        if catalog.contains_point(candidate) {
            return candidate;
        }
        for attempt in 1..attempts {
            candidate = propose(&mut *rng, attempt);
            if catalog.contains_point(candidate) {
                return candidate;
            }
        }

        log::warn!(
            "no navigable sample after {attempts} attempts near ({:.3}, {:.3}); applying {:?}",
            candidate.lon,
            candidate.lat,
            self.fallback
        );
        match self.fallback {
            Fallback::AcceptLast => candidate,
            Fallback::NearestCorridor => catalog.nearest_navigable(candidate).unwrap_or(candidate),
        }
    }
}

/// Uniform offset in `[-span / 2, span / 2)`. A zero span yields exactly zero.
pub fn centered_jitter<R: Rng + ?Sized>(rng: &mut R, span: f64) -> f64 {
    (rng.r#gen::<f64>() - 0.5) * span
}
