//! Geography reference data: ports, sea-lane corridors and curated routes.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;

use crate::geo::{Coordinate, Path};

const DEFAULT_CATALOG_DATA: &str = include_str!("../assets/data/catalog.json");

/// Historical aggregates attached to a port when known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HistoricalData {
    #[serde(default)]
    pub average_traffic: Vec<f64>,
    #[serde(default)]
    pub weather_patterns: Vec<String>,
    #[serde(default)]
    pub seasonal_risks: Vec<String>,
}

/// A named port or research station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    pub name: String,
    pub position: Coordinate,
    pub country: String,
    /// Congestion percentage in `[0, 100]`.
    pub congestion: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical: Option<HistoricalData>,
}

/// Polar region a corridor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolarRegion {
    Arctic,
    Antarctic,
}

/// Axis-aligned longitude/latitude box approximating a navigable sea lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CorridorRecord", into = "CorridorRecord")]
pub struct Corridor {
    pub name: String,
    pub region: PolarRegion,
    pub min: Coordinate,
    pub max: Coordinate,
}

impl Corridor {
    /// Build a corridor from two opposite corners given in any order.
    #[must_use]
    pub fn from_corners(
        name: impl Into<String>,
        region: PolarRegion,
        a: Coordinate,
        b: Coordinate,
    ) -> Self {
        Self {
            name: name.into(),
            region,
            min: Coordinate::new(a.lon.min(b.lon), a.lat.min(b.lat)),
            max: Coordinate::new(a.lon.max(b.lon), a.lat.max(b.lat)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CorridorRecord {
    name: String,
    region: PolarRegion,
    corners: [[f64; 2]; 2],
}

impl From<CorridorRecord> for Corridor {
    fn from(record: CorridorRecord) -> Self {
        let [[lon_a, lat_a], [lon_b, lat_b]] = record.corners;
        Self::from_corners(
            record.name,
            record.region,
            Coordinate::new(lon_a, lat_a),
            Coordinate::new(lon_b, lat_b),
        )
    }
}

impl From<Corridor> for CorridorRecord {
    fn from(corridor: Corridor) -> Self {
        Self {
            name: corridor.name,
            region: corridor.region,
            corners: [
                [corridor.min.lon, corridor.min.lat],
                [corridor.max.lon, corridor.max.lat],
            ],
        }
    }
}

/// Hand-drawn path for a well-known ordered port pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedRoute {
    pub from: String,
    pub to: String,
    pub waypoints: Path,
}

/// Errors raised when catalog data fails to parse or validate.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog JSON parse error: {0}")]
    Parse(String),
    #[error("catalog defines no corridors")]
    NoCorridors,
    #[error("duplicate port id {0}")]
    DuplicatePort(String),
    #[error("port {id} congestion {value:.1} outside 0..=100")]
    CongestionRange { id: String, value: f64 },
    #[error("curated route {from}-{to} references unknown port {missing}")]
    UnknownCuratedPort {
        from: String,
        to: String,
        missing: String,
    },
    #[error("curated route {from}-{to} needs at least two waypoints (got {count})")]
    ShortCuratedRoute {
        from: String,
        to: String,
        count: usize,
    },
}

/// Static reference data. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub ports: Vec<Port>,
    pub corridors: Vec<Corridor>,
    #[serde(default)]
    pub curated_routes: Vec<CuratedRoute>,
}

impl Catalog {
    /// Load a catalog from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the data fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        catalog.validate()?;
        log::debug!(
            "catalog loaded: {} ports, {} corridors, {} curated routes",
            catalog.ports.len(),
            catalog.corridors.len(),
            catalog.curated_routes.len()
        );
        Ok(catalog)
    }

    /// Check referential integrity and value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.corridors.is_empty() {
            return Err(CatalogError::NoCorridors);
        }

        let mut seen = HashSet::new();
        for port in &self.ports {
            if !seen.insert(port.id.as_str()) {
                return Err(CatalogError::DuplicatePort(port.id.clone()));
            }
            if !(0.0..=100.0).contains(&port.congestion) {
                return Err(CatalogError::CongestionRange {
                    id: port.id.clone(),
                    value: port.congestion,
                });
            }
        }

        for route in &self.curated_routes {
            for id in [&route.from, &route.to] {
                if !seen.contains(id.as_str()) {
                    return Err(CatalogError::UnknownCuratedPort {
                        from: route.from.clone(),
                        to: route.to.clone(),
                        missing: id.clone(),
                    });
                }
            }
            if route.waypoints.len() < 2 {
                return Err(CatalogError::ShortCuratedRoute {
                    from: route.from.clone(),
                    to: route.to.clone(),
                    count: route.waypoints.len(),
                });
            }
        }

        Ok(())
    }

    /// The embedded catalog, parsed once per process.
    ///
    /// # Panics
    ///
    /// Panics if the embedded asset is malformed.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(|| Self::from_json(DEFAULT_CATALOG_DATA).expect("valid built-in catalog"))
    }

    #[must_use]
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    #[must_use]
    pub fn port(&self, id: &str) -> Option<&Port> {
        self.ports.iter().find(|port| port.id == id)
    }

    /// Curated path for the ordered pair `from -> to`. The reverse pair is not implied.
    #[must_use]
    pub fn curated(&self, from: &str, to: &str) -> Option<&CuratedRoute> {
        self.curated_routes
            .iter()
            .find(|route| route.from == from && route.to == to)
    }
}
