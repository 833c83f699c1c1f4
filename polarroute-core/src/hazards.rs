//! Iceberg and ship generation along a route path.
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::constants::{
    HAZARD_COUNT_MAX, HAZARD_COUNT_MIN, ICEBERG_DRIFT_MAX_KNOTS, ICEBERG_DRIFT_STEP_SPAN,
    ICEBERG_MELT_WINDOW_MS, ICEBERG_OFFSET_SPAN, ICEBERG_PATH_POINTS, SHIP_ETA_WINDOW_MS,
    SHIP_SPEED_MAX_KNOTS, SHIP_SPEED_MIN_KNOTS,
};
use crate::data::Catalog;
use crate::geo::{Coordinate, Path};
use crate::numbers::{floor_f64_to_usize, usize_to_f64};
use crate::water::{Resampler, centered_jitter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum IcebergSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl IcebergSize {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }
}

/// A tracked iceberg near the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Iceberg {
    pub id: String,
    pub name: String,
    pub position: Coordinate,
    pub size: IcebergSize,
    pub drift_speed_knots: f64,
    /// Collision probability percentage in `[0, 100)`.
    pub risk_probability: f64,
    pub last_seen: DateTime<Utc>,
    pub predicted_path: Path,
    pub estimated_melt_date: DateTime<Utc>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CargoType {
    #[default]
    Container,
    Bulk,
    Tanker,
    #[serde(rename = "LNG")]
    Lng,
    Research,
}

impl CargoType {
    pub const ALL: [Self; 5] = [
        Self::Container,
        Self::Bulk,
        Self::Tanker,
        Self::Lng,
        Self::Research,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Container => "Container",
            Self::Bulk => "Bulk",
            Self::Tanker => "Tanker",
            Self::Lng => "LNG",
            Self::Research => "Research",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShipStatus {
    #[default]
    #[serde(rename = "En Route")]
    EnRoute,
    Anchored,
    Loading,
}

impl ShipStatus {
    pub const ALL: [Self; 3] = [Self::EnRoute, Self::Anchored, Self::Loading];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EnRoute => "En Route",
            Self::Anchored => "Anchored",
            Self::Loading => "Loading",
        }
    }
}

/// A vessel sharing the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub id: String,
    pub name: String,
    pub position: Coordinate,
    pub speed_knots: f64,
    pub destination: String,
    /// Risk score in `[0, 100)`.
    pub risk_score: f64,
    pub cargo_type: CargoType,
    pub eta: DateTime<Utc>,
    /// Degrees in `[0, 360)`.
    pub heading: f64,
    pub status: ShipStatus,
}

/// Scatter two to four icebergs around the route.
///
/// Each iceberg starts from a waypoint other than the final one, is offset
/// by up to two degrees per axis and gets a five-step drift path. Every
/// position is resampled until it lies in a corridor.
pub fn generate_icebergs<R: Rng + ?Sized>(
    catalog: &Catalog,
    route_id: &str,
    waypoints: &[Coordinate],
    rng: &mut R,
    now: DateTime<Utc>,
) -> Vec<Iceberg> {
    if waypoints.is_empty() {
        return Vec::new();
    }
    let count = rng.gen_range(HAZARD_COUNT_MIN..=HAZARD_COUNT_MAX);
    let base_choices = waypoints.len().saturating_sub(1).max(1);

    (0..count)
        .map(|i| {
            let base = waypoints[rng.gen_range(0..base_choices)];
            let position = Resampler::HAZARD.sample(catalog, rng, |rng, _| {
                base.offset(
                    centered_jitter(rng, ICEBERG_OFFSET_SPAN),
                    centered_jitter(rng, ICEBERG_OFFSET_SPAN),
                )
            });
            let size = IcebergSize::ALL.choose(rng).copied().unwrap_or_default();
            let drift_speed_knots = rng.gen_range(0.0..ICEBERG_DRIFT_MAX_KNOTS);
            let risk_probability = rng.gen_range(0.0..100.0);
            let predicted_path = drift_path(catalog, position, rng);
            let melt_offset = Duration::milliseconds(rng.gen_range(0..ICEBERG_MELT_WINDOW_MS));

            Iceberg {
                id: format!("iceberg-{route_id}-{i}"),
                name: format!("Titan-{:02}", i + 1),
                position,
                size,
                drift_speed_knots,
                risk_probability,
                last_seen: now,
                predicted_path,
                estimated_melt_date: now + melt_offset,
                description: format!(
                    "{} iceberg drifting at {drift_speed_knots:.1} knots",
                    size.label()
                ),
            }
        })
        .collect()
}

/// Random walk from `start`; each step moves at most a quarter degree per axis.
fn drift_path<R: Rng + ?Sized>(catalog: &Catalog, start: Coordinate, rng: &mut R) -> Path {
    let mut path = Path::new();
    let mut current = start;
    for _ in 0..ICEBERG_PATH_POINTS {
        let from = current;
        current = Resampler::HAZARD.sample(catalog, rng, |rng, _| {
            from.offset(
                centered_jitter(rng, ICEBERG_DRIFT_STEP_SPAN),
                centered_jitter(rng, ICEBERG_DRIFT_STEP_SPAN),
            )
        });
        path.push(current);
    }
    path
}

/// Place two to four ships directly on route waypoints.
///
/// Ship positions inherit whatever validity the route path has; no water
/// check is applied.
pub fn generate_ships<R: Rng + ?Sized>(
    route_id: &str,
    waypoints: &[Coordinate],
    destination: &str,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Vec<Ship> {
    if waypoints.is_empty() {
        return Vec::new();
    }
    let count = rng.gen_range(HAZARD_COUNT_MIN..=HAZARD_COUNT_MAX);
    let last = usize_to_f64(waypoints.len() - 1);

    (0..count)
        .map(|i| {
            let progress: f64 = rng.r#gen();
            let index = floor_f64_to_usize(progress * last).min(waypoints.len() - 1);
            let speed_knots = rng.gen_range(SHIP_SPEED_MIN_KNOTS..SHIP_SPEED_MAX_KNOTS);
            let risk_score = rng.gen_range(0.0..100.0);
            let cargo_type = CargoType::ALL.choose(rng).copied().unwrap_or_default();
            let eta = now + Duration::milliseconds(rng.gen_range(0..SHIP_ETA_WINDOW_MS));
            let heading = rng.gen_range(0.0..360.0);
            let status = ShipStatus::ALL.choose(rng).copied().unwrap_or_default();

            Ship {
                id: format!("ship-{route_id}-{i}"),
                name: format!("Arctic Voyager {}", i + 1),
                position: waypoints[index],
                speed_knots,
                destination: destination.to_string(),
                risk_score,
                cargo_type,
                eta,
                heading,
                status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
    }

    fn murmansk_longyearbyen() -> Path {
        Catalog::builtin().curated("p1", "p3").unwrap().waypoints.clone()
    }

    #[test]
    fn icebergs_are_always_in_water() {
        let catalog = Catalog::builtin();
        let path = murmansk_longyearbyen();
        for seed in 0..128 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let icebergs = generate_icebergs(catalog, "p1-p3", &path, &mut rng, now());
            assert!((2..=4).contains(&icebergs.len()));
            for berg in &icebergs {
                assert!(catalog.contains_point(berg.position), "{:?}", berg.position);
                assert_eq!(berg.predicted_path.len(), ICEBERG_PATH_POINTS);
                assert!(berg.predicted_path.iter().all(|p| catalog.contains_point(*p)));
            }
        }
    }

    #[test]
    fn iceberg_fields_follow_ranges_and_naming() {
        let catalog = Catalog::builtin();
        let path = murmansk_longyearbyen();
        let mut rng = SmallRng::seed_from_u64(4);
        let icebergs = generate_icebergs(catalog, "p1-p3", &path, &mut rng, now());
        for (i, berg) in icebergs.iter().enumerate() {
            assert_eq!(berg.id, format!("iceberg-p1-p3-{i}"));
            assert_eq!(berg.name, format!("Titan-{:02}", i + 1));
            assert!((0.0..2.0).contains(&berg.drift_speed_knots));
            assert!((0.0..100.0).contains(&berg.risk_probability));
            assert_eq!(berg.last_seen, now());
            assert!(berg.estimated_melt_date >= now());
            assert!(berg.estimated_melt_date < now() + Duration::days(90));
            assert!(berg.description.starts_with(berg.size.label()));
        }
    }

    #[test]
    fn drift_steps_are_small() {
        let catalog = Catalog::builtin();
        let start = Coordinate::new(100.0, 72.0);
        let mut rng = SmallRng::seed_from_u64(21);
        let path = drift_path(catalog, start, &mut rng);
        let mut previous = start;
        for point in &path {
            assert!((point.lon - previous.lon).abs() <= 0.25);
            assert!((point.lat - previous.lat).abs() <= 0.25);
            previous = *point;
        }
    }

    #[test]
    fn ships_sit_on_route_waypoints() {
        let path = murmansk_longyearbyen();
        for seed in 0..64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let ships = generate_ships("p1-p3", &path, "Longyearbyen", &mut rng, now());
            assert!((2..=4).contains(&ships.len()));
            for (i, ship) in ships.iter().enumerate() {
                assert!(path.contains(&ship.position));
                assert_eq!(ship.id, format!("ship-p1-p3-{i}"));
                assert_eq!(ship.name, format!("Arctic Voyager {}", i + 1));
                assert_eq!(ship.destination, "Longyearbyen");
                assert!((12.0..20.0).contains(&ship.speed_knots));
                assert!((0.0..360.0).contains(&ship.heading));
                assert!((0.0..100.0).contains(&ship.risk_score));
                assert!(ship.eta >= now() && ship.eta < now() + Duration::days(5));
            }
        }
    }

    #[test]
    fn empty_path_yields_no_hazards() {
        let catalog = Catalog::builtin();
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(generate_icebergs(catalog, "x", &[], &mut rng, now()).is_empty());
        assert!(generate_ships("x", &[], "Nowhere", &mut rng, now()).is_empty());
    }

    #[test]
    fn labels_serialise_like_display_names() {
        assert_eq!(
            serde_json::to_string(&ShipStatus::EnRoute).unwrap(),
            "\"En Route\""
        );
        assert_eq!(serde_json::to_string(&CargoType::Lng).unwrap(), "\"LNG\"");
        assert_eq!(CargoType::Lng.label(), "LNG");
    }
}
