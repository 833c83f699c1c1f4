//! Waypoint synthesis between two ports.
use rand::Rng;

use crate::constants::{SYNTHESIZED_WAYPOINTS, WAYPOINT_DEVIATION_MAX, WAYPOINT_DEVIATION_STEP};
use crate::data::{Catalog, Port};
use crate::geo::{Coordinate, Path};
use crate::numbers::usize_to_f64;
use crate::water::{Resampler, centered_jitter};

/// Ordered waypoints from `departure` to `arrival`.
///
/// Curated port pairs return their literal path unchanged. Every other pair gets
/// five points: the exact endpoints plus three interior points interpolated at
/// 1/4, 2/4 and 3/4 and jittered until they land in a corridor.
pub fn synthesize_waypoints<R: Rng + ?Sized>(
    catalog: &Catalog,
    departure: &Port,
    arrival: &Port,
    rng: &mut R,
) -> Path {
    if let Some(curated) = catalog.curated(&departure.id, &arrival.id) {
        log::debug!("using curated path for {}-{}", departure.id, arrival.id);
        return curated.waypoints.clone();
    }
    interpolate_waypoints(catalog, departure.position, arrival.position, rng)
}

/// Procedural path between two arbitrary coordinates.
pub fn interpolate_waypoints<R: Rng + ?Sized>(
    catalog: &Catalog,
    start: Coordinate,
    end: Coordinate,
    rng: &mut R,
) -> Path {
    let segments = usize_to_f64(SYNTHESIZED_WAYPOINTS - 1);
    let mut path = Path::new();
    path.push(start);

    for i in 1..SYNTHESIZED_WAYPOINTS - 1 {
        let base = Coordinate::lerp(start, end, usize_to_f64(i) / segments);
        let point = Resampler::WAYPOINT.sample(catalog, rng, |rng, attempt| {
            let deviation = deviation_for_attempt(attempt);
            base.offset(
                centered_jitter(rng, deviation),
                centered_jitter(rng, deviation),
            )
        });
        path.push(point);
    }

    path.push(end);
    path
}

/// Jitter span grows with each failed attempt: 0, 0.5, 1.0 ... capped at 5.
fn deviation_for_attempt(attempt: u32) -> f64 {
    (f64::from(attempt) * WAYPOINT_DEVIATION_STEP).min(WAYPOINT_DEVIATION_MAX)
}
