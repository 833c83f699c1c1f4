//! Centralized generation ranges and hazard thresholds.
//!
//! Alert thresholds are fixed design constants. Keeping them together ensures
//! they can only be adjusted via reviewed code changes, never through catalog
//! JSON.

// Resampling ---------------------------------------------------------------
pub const WAYPOINT_MAX_ATTEMPTS: u32 = 10;
pub const HAZARD_MAX_ATTEMPTS: u32 = 10;
pub(crate) const WAYPOINT_DEVIATION_STEP: f64 = 0.5;
pub(crate) const WAYPOINT_DEVIATION_MAX: f64 = 5.0;
pub const SYNTHESIZED_WAYPOINTS: usize = 5;

// Route ---------------------------------------------------------------------
pub(crate) const TRANSIT_HOURS_MIN: u32 = 48;
pub(crate) const TRANSIT_HOURS_MAX: u32 = 168;
pub(crate) const ALTERNATIVES_MIN: usize = 1;
pub(crate) const ALTERNATIVES_MAX: usize = 2;
pub(crate) const ALTERNATIVE_JITTER_SPAN: f64 = 2.0;
pub(crate) const ALTERNATIVE_DISTANCE_FACTOR_MAX: f64 = 1.2;

// Hazards -------------------------------------------------------------------
pub(crate) const HAZARD_COUNT_MIN: usize = 2;
pub(crate) const HAZARD_COUNT_MAX: usize = 4;
pub(crate) const ICEBERG_OFFSET_SPAN: f64 = 4.0;
pub(crate) const ICEBERG_DRIFT_STEP_SPAN: f64 = 0.5;
pub const ICEBERG_PATH_POINTS: usize = 5;
pub(crate) const ICEBERG_DRIFT_MAX_KNOTS: f64 = 2.0;
pub(crate) const ICEBERG_MELT_WINDOW_MS: i64 = 90 * 24 * 60 * 60 * 1000;
pub(crate) const SHIP_SPEED_MIN_KNOTS: f64 = 12.0;
pub(crate) const SHIP_SPEED_MAX_KNOTS: f64 = 20.0;
pub(crate) const SHIP_ETA_WINDOW_MS: i64 = 5 * 24 * 60 * 60 * 1000;

// Weather -------------------------------------------------------------------
pub(crate) const ARCTIC_SUMMER_TEMP_C: f64 = -5.0;
pub(crate) const ARCTIC_WINTER_TEMP_C: f64 = -25.0;
pub(crate) const ANTARCTIC_SUMMER_TEMP_C: f64 = 0.0;
pub(crate) const ANTARCTIC_WINTER_TEMP_C: f64 = -15.0;
pub(crate) const TEMP_NOISE_SPAN: f64 = 10.0;
pub(crate) const SUMMER_BASE_WIND_KNOTS: f64 = 15.0;
pub(crate) const WINTER_BASE_WIND_KNOTS: f64 = 25.0;
pub(crate) const WIND_GUST_RANGE_KNOTS: f64 = 20.0;
pub(crate) const WAVE_HEIGHT_MIN_M: f64 = 1.0;
pub(crate) const WAVE_HEIGHT_MAX_M: f64 = 5.0;
pub(crate) const HOURLY_TEMP_SPAN: f64 = 5.0;
pub(crate) const HOURLY_WIND_SPAN: f64 = 10.0;
pub const FORECAST_HOURS: u8 = 24;
/// Calm conditions reported when a route has no usable endpoints.
pub const FALLBACK_TEMPERATURE_C: f64 = 0.0;
pub const FALLBACK_WIND_KNOTS: f64 = 15.0;
pub const FALLBACK_WAVE_HEIGHT_M: f64 = 1.0;
/// Zero-based months May through September count as summer.
pub(crate) const SUMMER_MONTHS0: std::ops::RangeInclusive<u32> = 4..=8;

// Alerts --------------------------------------------------------------------
pub const COLLISION_RISK_THRESHOLD: f64 = 70.0;
pub const WIND_ALERT_THRESHOLD_KNOTS: f64 = 30.0;
pub const SEA_ICE_ALERT_THRESHOLD: f64 = 80.0;
pub const TRAFFIC_ALERT_THRESHOLD: f64 = 80.0;
pub(crate) const COLLISION_IMPACT_HOURS: u32 = 12;
pub(crate) const WIND_IMPACT_HOURS: u32 = 24;
pub(crate) const SEA_ICE_IMPACT_HOURS: u32 = 12;
pub(crate) const TRAFFIC_IMPACT_HOURS: u32 = 6;
