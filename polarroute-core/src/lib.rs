//! Polar Route Core
//!
//! Platform-agnostic synthesis of Arctic and Antarctic shipping routes:
//! waypoints, weather, icebergs, ships and hazard alerts. This crate has no
//! UI or I/O dependencies beyond its embedded reference catalog.

pub mod alerts;
pub mod constants;
pub mod data;
pub mod geo;
pub mod hazards;
pub mod numbers;
pub mod planner;
pub mod rng;
pub mod route;
pub mod seed;
pub mod water;
pub mod waypoints;
pub mod weather;

// Re-export commonly used types
pub use alerts::{Alert, AlertKind, Severity, derive_alerts};
pub use data::{Catalog, CatalogError, Corridor, CuratedRoute, HistoricalData, PolarRegion, Port};
pub use geo::{Coordinate, EARTH_RADIUS_KM, Path, great_circle_km, haversine_km};
pub use hazards::{
    CargoType, Iceberg, IcebergSize, Ship, ShipStatus, generate_icebergs, generate_ships,
};
pub use planner::RoutePlanner;
pub use rng::{CountingRng, RngBundle};
pub use route::{AlternativeRoute, HazardSummary, RiskLevel, Route, assemble_route};
pub use seed::{decode_to_seed, encode_friendly, generate_code_from_entropy, parse_voyage_code};
pub use water::{Fallback, Resampler};
pub use waypoints::{interpolate_waypoints, synthesize_waypoints};
pub use weather::{
    Forecast, HourlyPrediction, Season, Visibility, WeatherCondition, generate_weather,
};

/// Trait for abstracting catalog loading.
/// Platform-specific implementations should provide this
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load and validate the reference catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read, parsed or validated.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;
}

/// Loader returning a copy of the embedded catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl CatalogLoader for BuiltinCatalog {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Ok(Catalog::builtin().clone())
    }
}

/// Loader parsing catalog JSON held in memory.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    json: String,
}

impl JsonCatalog {
    #[must_use]
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl CatalogLoader for JsonCatalog {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Catalog::from_json(&self.json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    struct FixtureLoader;

    impl CatalogLoader for FixtureLoader {
        type Error = Infallible;

        fn load_catalog(&self) -> Result<Catalog, Self::Error> {
            let mut catalog = Catalog::builtin().clone();
            catalog.ports.truncate(3);
            catalog.curated_routes.retain(|r| r.from == "p1" && r.to == "p3");
            Ok(catalog)
        }
    }

    #[test]
    fn builtin_loader_matches_static_catalog() {
        let catalog = BuiltinCatalog.load_catalog().unwrap();
        assert_eq!(&catalog, Catalog::builtin());
    }

    #[test]
    fn json_loader_surfaces_validation_errors() {
        let loader = JsonCatalog::new(r#"{ "ports": [], "corridors": [] }"#);
        assert_eq!(loader.load_catalog(), Err(CatalogError::NoCorridors));
    }

    #[test]
    fn custom_loader_drives_planner() {
        let catalog = FixtureLoader.load_catalog().unwrap();
        let mut planner = RoutePlanner::seeded(&catalog, 1);
        assert_eq!(planner.ports().len(), 3);
        planner.set_departure(Some("p1"));
        planner.set_arrival(Some("p4"));
        let now = chrono::DateTime::UNIX_EPOCH;
        assert!(planner.calculate_route(now).is_none());
        planner.set_arrival(Some("p3"));
        assert!(planner.calculate_route(now).is_some());
    }
}
