//! Invariant checks run by `polarroute check`.
use anyhow::{Context, Result, bail, ensure};
use polarroute_core::constants::{
    COLLISION_RISK_THRESHOLD, SEA_ICE_ALERT_THRESHOLD, TRAFFIC_ALERT_THRESHOLD,
    WIND_ALERT_THRESHOLD_KNOTS,
};
use polarroute_core::{
    AlertKind, Catalog, Coordinate, Iceberg, IcebergSize, Path, RiskLevel, RngBundle, Route,
    Severity, WeatherCondition, assemble_route, derive_alerts, great_circle_km,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::ScenarioCtx;
use crate::logic::fingerprint;

fn port_pairs(catalog: &Catalog) -> impl Iterator<Item = (&str, &str)> {
    catalog.ports().iter().flat_map(move |from| {
        catalog
            .ports()
            .iter()
            .map(move |to| (from.id.as_str(), to.id.as_str()))
    })
}

fn route_for(ctx: &ScenarioCtx<'_>, from: &str, to: &str) -> Result<Route> {
    let rngs = RngBundle::from_user_seed(ctx.seed);
    assemble_route(ctx.catalog, from, to, &rngs, ctx.now)
        .with_context(|| format!("{from}-{to} did not resolve (seed {})", ctx.seed))
}

pub fn smoke(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let mut ports = ctx.catalog.ports().iter();
    let (Some(first), Some(second)) = (ports.next(), ports.next()) else {
        bail!("catalog needs at least two ports");
    };
    let route = route_for(ctx, &first.id, &second.id)?;
    ensure!(route.departure.id == first.id, "departure mismatch");
    ensure!(route.arrival.id == second.id, "arrival mismatch");
    ensure!(
        route.weather.predictions.len() == 24,
        "expected 24 hourly predictions, got {}",
        route.weather.predictions.len()
    );
    ensure!(
        (1..=2).contains(&route.alternatives.len()),
        "expected one or two alternatives"
    );
    if ctx.verbose {
        println!(
            "  ↳ {} {} km, {} alerts",
            route.id,
            route.distance_km,
            route.alerts.len()
        );
    }
    Ok(())
}

pub fn curated_paths(ctx: &ScenarioCtx<'_>) -> Result<()> {
    for curated in &ctx.catalog.curated_routes {
        let route = route_for(ctx, &curated.from, &curated.to)?;
        ensure!(
            route.waypoints == curated.waypoints,
            "{} did not return its curated path",
            route.id
        );
    }
    Ok(())
}

pub fn water_invariant(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let catalog = ctx.catalog;
    for (from, to) in port_pairs(catalog) {
        let route = route_for(ctx, from, to)?;
        for berg in &route.icebergs {
            ensure!(
                catalog.contains_point(berg.position),
                "{} {} placed on land at {:?}",
                route.id,
                berg.name,
                berg.position
            );
            if let Some(point) = berg
                .predicted_path
                .iter()
                .find(|p| !catalog.contains_point(**p))
            {
                bail!("{} {} drifts onto land at {point:?}", route.id, berg.name);
            }
        }
        for (i, alt) in route.alternatives.iter().enumerate() {
            ensure!(
                alt.risk_level != RiskLevel::High,
                "{} alternative {i} is high risk",
                route.id
            );
            if let Some(point) = alt.waypoints.iter().find(|p| !catalog.contains_point(**p)) {
                bail!("{} alternative {i} crosses land at {point:?}", route.id);
            }
        }
    }
    Ok(())
}

pub fn distance_symmetry(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let catalog = ctx.catalog;
    for (from, to) in port_pairs(catalog) {
        let (Some(a), Some(b)) = (catalog.port(from), catalog.port(to)) else {
            bail!("catalog lookup failed for {from}-{to}");
        };
        let there = great_circle_km(a.position, b.position);
        let back = great_circle_km(b.position, a.position);
        ensure!(there == back, "{from}-{to}: {there} km vs {back} km");
        if from == to {
            ensure!(there == 0, "{from} is {there} km from itself");
        }
    }
    Ok(())
}

fn threshold_iceberg(risk: f64, ctx: &ScenarioCtx<'_>) -> Iceberg {
    Iceberg {
        id: "iceberg-threshold-0".to_string(),
        name: "Titan-01".to_string(),
        position: Coordinate::new(0.0, 75.0),
        size: IcebergSize::Medium,
        drift_speed_knots: 0.5,
        risk_probability: risk,
        last_seen: ctx.now,
        predicted_path: Path::new(),
        estimated_melt_date: ctx.now,
        description: String::new(),
    }
}

pub fn alert_thresholds(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(ctx.seed);

    let mut weather = WeatherCondition::fallback();
    weather.wind_speed_knots = WIND_ALERT_THRESHOLD_KNOTS;
    weather.sea_ice_concentration = SEA_ICE_ALERT_THRESHOLD;
    let at_threshold = derive_alerts(
        &weather,
        TRAFFIC_ALERT_THRESHOLD,
        &[threshold_iceberg(COLLISION_RISK_THRESHOLD, ctx)],
        &mut rng,
    );
    ensure!(
        at_threshold.is_empty(),
        "values exactly at thresholds raised {} alerts",
        at_threshold.len()
    );

    weather.wind_speed_knots += 0.1;
    weather.sea_ice_concentration += 0.1;
    let above = derive_alerts(
        &weather,
        TRAFFIC_ALERT_THRESHOLD + 0.1,
        &[threshold_iceberg(COLLISION_RISK_THRESHOLD + 0.1, ctx)],
        &mut rng,
    );
    let observed: Vec<_> = above.iter().map(|a| (a.kind, a.severity)).collect();
    let expected = [
        (AlertKind::Collision, Severity::High),
        (AlertKind::Weather, Severity::Medium),
        (AlertKind::Weather, Severity::High),
        (AlertKind::Traffic, Severity::Medium),
    ];
    ensure!(
        observed == expected,
        "unexpected alerts above thresholds: {observed:?}"
    );

    let route = route_for(ctx, "p1", "p2").or_else(|_| {
        let first = ctx.catalog.ports().first().context("empty catalog")?;
        route_for(ctx, &first.id, &first.id)
    })?;
    let expected_count = route
        .icebergs
        .iter()
        .filter(|b| b.risk_probability > COLLISION_RISK_THRESHOLD)
        .count()
        + usize::from(route.weather.wind_speed_knots > WIND_ALERT_THRESHOLD_KNOTS)
        + usize::from(route.weather.sea_ice_concentration > SEA_ICE_ALERT_THRESHOLD)
        + usize::from(route.traffic_congestion > TRAFFIC_ALERT_THRESHOLD);
    ensure!(
        route.alerts.len() == expected_count,
        "{} has {} alerts, expected {expected_count}",
        route.id,
        route.alerts.len()
    );
    Ok(())
}

pub fn deterministic_replay(ctx: &ScenarioCtx<'_>) -> Result<()> {
    for (from, to) in port_pairs(ctx.catalog).take(12) {
        let first = fingerprint(&route_for(ctx, from, to)?)?;
        let second = fingerprint(&route_for(ctx, from, to)?)?;
        ensure!(
            first == second,
            "{from}-{to} diverged for seed {}: {first:016x} vs {second:016x}",
            ctx.seed
        );
    }
    Ok(())
}

pub fn unknown_ports(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let rngs = RngBundle::from_user_seed(ctx.seed);
    let known = ctx.catalog.ports().first().map(|p| p.id.as_str());
    for bogus in ["", "p0", "atlantis", "P1 "] {
        if ctx.catalog.port(bogus).is_some() {
            continue;
        }
        if let Some(id) = known {
            ensure!(
                assemble_route(ctx.catalog, id, bogus, &rngs, ctx.now).is_none(),
                "arrival {bogus:?} resolved"
            );
            ensure!(
                assemble_route(ctx.catalog, bogus, id, &rngs, ctx.now).is_none(),
                "departure {bogus:?} resolved"
            );
        }
        ensure!(
            assemble_route(ctx.catalog, bogus, bogus, &rngs, ctx.now).is_none(),
            "{bogus:?} resolved against itself"
        );
    }
    Ok(())
}
