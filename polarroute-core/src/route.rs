//! Route assembly: composes waypoints, weather, hazards and alerts.
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::alerts::{Alert, Severity, derive_alerts};
use crate::constants::{
    ALTERNATIVE_DISTANCE_FACTOR_MAX, ALTERNATIVE_JITTER_SPAN, ALTERNATIVES_MAX, ALTERNATIVES_MIN,
    TRANSIT_HOURS_MAX, TRANSIT_HOURS_MIN,
};
use crate::data::{Catalog, Port};
use crate::geo::{Coordinate, Path, great_circle_km};
use crate::hazards::{Iceberg, Ship, generate_icebergs, generate_ships};
use crate::rng::RngBundle;
use crate::water::{Resampler, centered_jitter};
use crate::waypoints::synthesize_waypoints;
use crate::weather::{WeatherCondition, generate_weather};

/// Coarse hazard summary for a route or alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];
    /// Alternatives are never offered as high risk.
    pub const ALTERNATIVE: [Self; 2] = [Self::Low, Self::Medium];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeRoute {
    pub waypoints: Path,
    pub distance_km: f64,
    pub estimated_time_hours: u32,
    pub risk_level: RiskLevel,
}

/// A fully synthesised voyage between two ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub departure: Port,
    pub arrival: Port,
    pub distance_km: u32,
    pub estimated_time_hours: u32,
    /// Drawn before any hazard data exists and never recomputed from it.
    pub risk_level: RiskLevel,
    pub weather: WeatherCondition,
    pub traffic_congestion: f64,
    pub waypoints: Path,
    pub alternatives: Vec<AlternativeRoute>,
    pub alerts: Vec<Alert>,
    pub ships: Vec<Ship>,
    pub icebergs: Vec<Iceberg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HazardSummary {
    pub ships: usize,
    pub icebergs: usize,
    pub alerts_high: usize,
    pub alerts_medium: usize,
    pub alerts_low: usize,
}

impl HazardSummary {
    #[must_use]
    pub const fn total_alerts(&self) -> usize {
        self.alerts_high + self.alerts_medium + self.alerts_low
    }
}

impl Route {
    #[must_use]
    pub fn route_id(departure_id: &str, arrival_id: &str) -> String {
        format!("{departure_id}-{arrival_id}")
    }

    #[must_use]
    pub fn hazard_summary(&self) -> HazardSummary {
        let count = |severity: Severity| {
            self.alerts
                .iter()
                .filter(|alert| alert.severity == severity)
                .count()
        };
        HazardSummary {
            ships: self.ships.len(),
            icebergs: self.icebergs.len(),
            alerts_high: count(Severity::High),
            alerts_medium: count(Severity::Medium),
            alerts_low: count(Severity::Low),
        }
    }
}

/// Build a route between two catalog ports.
///
/// Returns `None` when either id is unknown. Generation order is waypoints,
/// distance, transit time, risk, weather, traffic, alternatives, icebergs,
/// ships and finally alerts, each drawing from its own stream in `rngs`.
pub fn assemble_route(
    catalog: &Catalog,
    departure_id: &str,
    arrival_id: &str,
    rngs: &RngBundle,
    now: DateTime<Utc>,
) -> Option<Route> {
    let Some(departure) = catalog.port(departure_id) else {
        log::warn!("unknown departure port {departure_id}");
        return None;
    };
    let Some(arrival) = catalog.port(arrival_id) else {
        log::warn!("unknown arrival port {arrival_id}");
        return None;
    };

    let id = Route::route_id(&departure.id, &arrival.id);
    let mut route_rng = rngs.route();

    let waypoints = synthesize_waypoints(catalog, departure, arrival, &mut *route_rng);
    let distance_km = great_circle_km(departure.position, arrival.position);
    let estimated_time_hours = transit_hours(&mut *route_rng);
    let risk_level = RiskLevel::ALL
        .choose(&mut *route_rng)
        .copied()
        .unwrap_or_default();
    let weather = generate_weather(Some(departure), Some(arrival), now, &mut *rngs.weather());
    let traffic_congestion = route_rng.gen_range(0.0..100.0);
    let alternatives = generate_alternatives(catalog, &waypoints, distance_km, &mut *route_rng);
    drop(route_rng);

    let (icebergs, ships) = {
        let mut hazard_rng = rngs.hazards();
        let icebergs = generate_icebergs(catalog, &id, &waypoints, &mut *hazard_rng, now);
        let ships = generate_ships(&id, &waypoints, &arrival.name, &mut *hazard_rng, now);
        (icebergs, ships)
    };
    let alerts = derive_alerts(&weather, traffic_congestion, &icebergs, &mut *rngs.alerts());

    log::debug!(
        "assembled {id}: {distance_km} km, {} waypoints, {} alternatives, {} icebergs, {} ships, {} alerts",
        waypoints.len(),
        alternatives.len(),
        icebergs.len(),
        ships.len(),
        alerts.len()
    );

    Some(Route {
        id,
        departure: departure.clone(),
        arrival: arrival.clone(),
        distance_km,
        estimated_time_hours,
        risk_level,
        weather,
        traffic_congestion,
        waypoints,
        alternatives,
        alerts,
        ships,
        icebergs,
        seed: rngs.seed(),
    })
}

fn transit_hours<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(TRANSIT_HOURS_MIN..TRANSIT_HOURS_MAX)
}

/// One or two re-jittered copies of the primary path.
fn generate_alternatives<R: Rng + ?Sized>(
    catalog: &Catalog,
    waypoints: &[Coordinate],
    distance_km: u32,
    rng: &mut R,
) -> Vec<AlternativeRoute> {
    let count = rng.gen_range(ALTERNATIVES_MIN..=ALTERNATIVES_MAX);
    (0..count)
        .map(|_| {
            let path: Path = waypoints
                .iter()
                .map(|&base| {
                    Resampler::HAZARD.sample(catalog, rng, |rng, _| {
                        base.offset(
                            centered_jitter(rng, ALTERNATIVE_JITTER_SPAN),
                            centered_jitter(rng, ALTERNATIVE_JITTER_SPAN),
                        )
                    })
                })
                .collect();
            let factor = rng.gen_range(1.0..ALTERNATIVE_DISTANCE_FACTOR_MAX);
            AlternativeRoute {
                waypoints: path,
                distance_km: f64::from(distance_km) * factor,
                estimated_time_hours: transit_hours(rng),
                risk_level: RiskLevel::ALTERNATIVE
                    .choose(rng)
                    .copied()
                    .unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 6, 0, 0).unwrap()
    }

    #[test]
    fn murmansk_to_longyearbyen_uses_curated_path() {
        let catalog = Catalog::builtin();
        let rngs = RngBundle::from_user_seed(2024);
        let route = assemble_route(catalog, "p1", "p3", &rngs, now()).unwrap();
        assert_eq!(route.id, "p1-p3");
        assert_eq!(route.departure.name, "Murmansk");
        assert_eq!(route.arrival.name, "Longyearbyen");
        assert_eq!(route.distance_km, 1156);
        assert_eq!(route.waypoints, catalog.curated("p1", "p3").unwrap().waypoints);
        assert_eq!(route.seed, Some(2024));
    }

    #[test]
    fn unknown_ports_yield_none() {
        let catalog = Catalog::builtin();
        let rngs = RngBundle::from_user_seed(1);
        assert!(assemble_route(catalog, "p1", "nowhere", &rngs, now()).is_none());
        assert!(assemble_route(catalog, "nowhere", "p1", &rngs, now()).is_none());
        assert!(assemble_route(catalog, "", "", &rngs, now()).is_none());
        assert_eq!(rngs.total_draws(), 0);
    }

    #[test]
    fn generated_values_stay_in_range() {
        let catalog = Catalog::builtin();
        for seed in 0..32 {
            let rngs = RngBundle::from_user_seed(seed);
            let route = assemble_route(catalog, "p4", "p7", &rngs, now()).unwrap();
            assert!((48..168).contains(&route.estimated_time_hours));
            assert!((0.0..100.0).contains(&route.traffic_congestion));
            assert!((1..=2).contains(&route.alternatives.len()));
            for alt in &route.alternatives {
                assert_eq!(alt.waypoints.len(), route.waypoints.len());
                assert_ne!(alt.risk_level, RiskLevel::High);
                assert!(alt.distance_km >= f64::from(route.distance_km));
                assert!(alt.distance_km < f64::from(route.distance_km) * 1.2);
                assert!((48..168).contains(&alt.estimated_time_hours));
                assert!(alt.waypoints.iter().all(|p| catalog.contains_point(*p)));
            }
        }
    }

    #[test]
    fn same_seed_reproduces_route() {
        let catalog = Catalog::builtin();
        let a = assemble_route(catalog, "p6", "p5", &RngBundle::from_user_seed(9), now());
        let b = assemble_route(catalog, "p6", "p5", &RngBundle::from_user_seed(9), now());
        assert_eq!(a, b);
    }

    #[test]
    fn hazard_summary_counts_alerts() {
        let catalog = Catalog::builtin();
        let rngs = RngBundle::from_user_seed(5);
        let route = assemble_route(catalog, "p8", "p9", &rngs, now()).unwrap();
        let summary = route.hazard_summary();
        assert_eq!(summary.ships, route.ships.len());
        assert_eq!(summary.icebergs, route.icebergs.len());
        assert_eq!(summary.total_alerts(), route.alerts.len());
        assert_eq!(summary.alerts_low, 0);
    }

    #[test]
    fn route_id_joins_port_ids() {
        assert_eq!(Route::route_id("p4", "p7"), "p4-p7");
    }
}
