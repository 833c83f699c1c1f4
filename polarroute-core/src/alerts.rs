//! Threshold-based hazard alerts.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    COLLISION_IMPACT_HOURS, COLLISION_RISK_THRESHOLD, SEA_ICE_ALERT_THRESHOLD,
    SEA_ICE_IMPACT_HOURS, TRAFFIC_ALERT_THRESHOLD, TRAFFIC_IMPACT_HOURS, WIND_ALERT_THRESHOLD_KNOTS,
    WIND_IMPACT_HOURS,
};
use crate::geo::Coordinate;
use crate::hazards::Iceberg;
use crate::numbers::round_f64_to_u32;
use crate::weather::WeatherCondition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    Collision,
    Weather,
    Traffic,
    /// Representable for consumers; no rule currently emits it.
    Environmental,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
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
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    pub time_to_impact_hours: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Derive alerts from finished route data.
///
/// Emission order is fixed: one collision alert per qualifying iceberg in
/// input order, then wind, then sea ice, then traffic. Every comparison is a
/// strict `>` against the thresholds in [`crate::constants`]. Only the
/// time-to-impact values come from `rng`.
pub fn derive_alerts<R: Rng + ?Sized>(
    weather: &WeatherCondition,
    traffic_congestion: f64,
    icebergs: &[Iceberg],
    rng: &mut R,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for iceberg in icebergs
        .iter()
        .filter(|iceberg| iceberg.risk_probability > COLLISION_RISK_THRESHOLD)
    {
        alerts.push(Alert {
            kind: AlertKind::Collision,
            severity: Severity::High,
            message: format!("High risk of collision with {}", iceberg.name),
            time_to_impact_hours: rng.gen_range(0..COLLISION_IMPACT_HOURS),
            location: Some(iceberg.position),
            details: None,
        });
    }

    if weather.wind_speed_knots > WIND_ALERT_THRESHOLD_KNOTS {
        alerts.push(Alert {
            kind: AlertKind::Weather,
            severity: Severity::Medium,
            message: "Severe weather conditions expected".to_string(),
            time_to_impact_hours: rng.gen_range(0..WIND_IMPACT_HOURS),
            location: None,
            details: Some(format!(
                "Wind speeds exceeding {} knots",
                round_f64_to_u32(weather.wind_speed_knots)
            )),
        });
    }

    if weather.sea_ice_concentration > SEA_ICE_ALERT_THRESHOLD {
        alerts.push(Alert {
            kind: AlertKind::Weather,
            severity: Severity::High,
            message: "High sea ice concentration".to_string(),
            time_to_impact_hours: rng.gen_range(0..SEA_ICE_IMPACT_HOURS),
            location: None,
            details: Some(format!(
                "Sea ice concentration at {}%",
                round_f64_to_u32(weather.sea_ice_concentration)
            )),
        });
    }

    if traffic_congestion > TRAFFIC_ALERT_THRESHOLD {
        alerts.push(Alert {
            kind: AlertKind::Traffic,
            severity: Severity::Medium,
            message: "High traffic area ahead".to_string(),
            time_to_impact_hours: rng.gen_range(0..TRAFFIC_IMPACT_HOURS),
            location: None,
            details: Some("Multiple vessels converging".to_string()),
        });
    }

    alerts
}
