//! Rendering for `polarroute route`.
use anyhow::Result;
use colored::Colorize;
use polarroute_core::{Route, Severity};
use serde::Serialize;
use std::hash::Hasher;
use std::io::Write;
use twox_hash::XxHash64;

/// Stable hash of the serialised route, used to compare replays.
pub fn fingerprint(route: &Route) -> Result<u64> {
    let bytes = serde_json::to_vec(route)?;
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&bytes);
    Ok(hasher.finish())
}

#[derive(Debug, Serialize)]
pub struct RouteReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voyage_code: Option<String>,
    pub fingerprint: String,
    pub route: &'a Route,
}

impl<'a> RouteReport<'a> {
    pub fn new(route: &'a Route, voyage_code: Option<String>) -> Result<Self> {
        Ok(Self {
            voyage_code,
            fingerprint: format!("{:016x}", fingerprint(route)?),
            route,
        })
    }
}

fn severity_badge(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::High => severity.label().red().bold(),
        Severity::Medium => severity.label().yellow(),
        Severity::Low => severity.label().normal(),
    }
}

pub fn generate_console_report(writer: &mut dyn Write, report: &RouteReport<'_>) -> Result<()> {
    let route = report.route;
    let summary = route.hazard_summary();

    writeln!(
        writer,
        "{}",
        format!("🧭 {} → {}", route.departure.name, route.arrival.name)
            .bright_cyan()
            .bold()
    )?;
    writeln!(writer, "{}", "=========================".cyan())?;
    writeln!(writer, "Route: {}", route.id)?;
    if let Some(code) = &report.voyage_code {
        writeln!(writer, "Voyage code: {code}")?;
    }
    writeln!(writer, "Distance: {} km", route.distance_km)?;
    writeln!(writer, "Estimated time: {} h", route.estimated_time_hours)?;
    writeln!(writer, "Risk level: {}", route.risk_level.label())?;
    writeln!(writer, "Traffic congestion: {:.1}%", route.traffic_congestion)?;
    writeln!(writer)?;

    let weather = &route.weather;
    writeln!(writer, "{}", "🌨  Weather".bright_white().bold())?;
    writeln!(
        writer,
        "   {:.1}°C, wind {:.1} kn, {}, visibility {:?}",
        weather.temperature_c,
        weather.wind_speed_knots,
        weather.forecast.label(),
        weather.visibility
    )?;
    writeln!(
        writer,
        "   Waves {:.1} m, sea ice {:.1}%",
        weather.wave_height_m, weather.sea_ice_concentration
    )?;
    writeln!(writer)?;

    writeln!(writer, "{}", "📍 Waypoints".bright_white().bold())?;
    for (i, point) in route.waypoints.iter().enumerate() {
        writeln!(writer, "   {i:>2}. {:>8.3}, {:>8.3}", point.lon, point.lat)?;
    }
    writeln!(writer)?;

    writeln!(
        writer,
        "{} ({} ships, {} icebergs)",
        "⚠️  Hazards".bright_yellow().bold(),
        summary.ships,
        summary.icebergs
    )?;
    for berg in &route.icebergs {
        writeln!(
            writer,
            "   🧊 {} {} risk {:.1}%",
            berg.name,
            berg.size.label(),
            berg.risk_probability
        )?;
    }
    for ship in &route.ships {
        writeln!(
            writer,
            "   🚢 {} ({}, {}) {:.1} kn",
            ship.name,
            ship.cargo_type.label(),
            ship.status.label(),
            ship.speed_knots
        )?;
    }
    writeln!(writer)?;

    if route.alerts.is_empty() {
        writeln!(writer, "No active alerts.")?;
    } else {
        writeln!(writer, "{}", "🚨 Alerts".bright_red().bold())?;
        for alert in &route.alerts {
            writeln!(
                writer,
                "   [{}] {} (in {} h)",
                severity_badge(alert.severity),
                alert.message,
                alert.time_to_impact_hours
            )?;
        }
    }

    if !route.alternatives.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{}", "🔀 Alternatives".bright_white().bold())?;
        for (i, alt) in route.alternatives.iter().enumerate() {
            writeln!(
                writer,
                "   {}. {:.0} km, {} h, {} risk",
                i + 1,
                alt.distance_km,
                alt.estimated_time_hours,
                alt.risk_level.label()
            )?;
        }
    }
    writeln!(writer)?;
    writeln!(writer, "Fingerprint: {}", report.fingerprint)?;
    Ok(())
}

pub fn generate_json_report(writer: &mut dyn Write, report: &RouteReport<'_>) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(writer: &mut dyn Write, report: &RouteReport<'_>) -> Result<()> {
    let route = report.route;
    writeln!(
        writer,
        "# {} → {}\n",
        route.departure.name, route.arrival.name
    )?;
    writeln!(writer, "- **Route**: {}", route.id)?;
    if let Some(code) = &report.voyage_code {
        writeln!(writer, "- **Voyage code**: {code}")?;
    }
    writeln!(writer, "- **Distance**: {} km", route.distance_km)?;
    writeln!(writer, "- **Estimated time**: {} h", route.estimated_time_hours)?;
    writeln!(writer, "- **Risk level**: {}", route.risk_level.label())?;
    writeln!(
        writer,
        "- **Traffic congestion**: {:.1}%",
        route.traffic_congestion
    )?;
    writeln!(writer, "- **Forecast**: {}\n", route.weather.forecast.label())?;

    writeln!(writer, "## Waypoints\n")?;
    writeln!(writer, "| # | Longitude | Latitude |")?;
    writeln!(writer, "|---|-----------|----------|")?;
    for (i, point) in route.waypoints.iter().enumerate() {
        writeln!(writer, "| {i} | {:.3} | {:.3} |", point.lon, point.lat)?;
    }
    writeln!(writer)?;

    writeln!(writer, "## Alerts\n")?;
    if route.alerts.is_empty() {
        writeln!(writer, "_No active alerts._")?;
    }
    for alert in &route.alerts {
        writeln!(
            writer,
            "- **{}** {:?}: {}",
            alert.severity.label(),
            alert.kind,
            alert.message
        )?;
    }
    writeln!(writer)?;
    writeln!(writer, "Fingerprint: `{}`", report.fingerprint)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use polarroute_core::{Catalog, RngBundle, assemble_route};

    fn sample_route(seed: u64) -> Route {
        let now = Utc.with_ymd_and_hms(2026, 2, 14, 6, 0, 0).unwrap();
        assemble_route(
            Catalog::builtin(),
            "p1",
            "p3",
            &RngBundle::from_user_seed(seed),
            now,
        )
        .unwrap()
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn fingerprint_tracks_route_contents() {
        let a = sample_route(4);
        assert_eq!(fingerprint(&a).unwrap(), fingerprint(&sample_route(4)).unwrap());
        let mut b = a.clone();
        b.traffic_congestion += 1.0;
        assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn console_report_mentions_core_fields() {
        let route = sample_route(8);
        let report = RouteReport::new(&route, Some("AR-WALRUS19".to_string())).unwrap();
        let out = render(|w| generate_console_report(w, &report));
        assert!(out.contains("Route: p1-p3"));
        assert!(out.contains("Voyage code: AR-WALRUS19"));
        assert!(out.contains("Distance: 1156 km"));
        assert!(out.contains(&report.fingerprint));
    }

    #[test]
    fn json_report_wraps_route() {
        let route = sample_route(8);
        let report = RouteReport::new(&route, None).unwrap();
        let out = render(|w| generate_json_report(w, &report));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value.get("voyage_code").is_none());
        assert_eq!(value["route"]["id"], "p1-p3");
        assert_eq!(value["fingerprint"].as_str().map(str::len), Some(16));
    }

    #[test]
    fn markdown_report_tables_waypoints() {
        let route = sample_route(2);
        let report = RouteReport::new(&route, None).unwrap();
        let out = render(|w| generate_markdown_report(w, &report));
        assert!(out.starts_with("# Murmansk → Longyearbyen"));
        let rows = out.lines().filter(|l| l.starts_with("| ") && !l.starts_with("| #")).count();
        assert_eq!(rows, route.waypoints.len());
    }
}
