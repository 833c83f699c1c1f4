//! Route weather synthesis
use chrono::{DateTime, Datelike, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ANTARCTIC_SUMMER_TEMP_C, ANTARCTIC_WINTER_TEMP_C, ARCTIC_SUMMER_TEMP_C, ARCTIC_WINTER_TEMP_C,
    FALLBACK_TEMPERATURE_C, FALLBACK_WAVE_HEIGHT_M, FALLBACK_WIND_KNOTS, FORECAST_HOURS,
    HOURLY_TEMP_SPAN, HOURLY_WIND_SPAN, SUMMER_BASE_WIND_KNOTS, SUMMER_MONTHS0, TEMP_NOISE_SPAN,
    WAVE_HEIGHT_MAX_M, WAVE_HEIGHT_MIN_M, WIND_GUST_RANGE_KNOTS, WINTER_BASE_WIND_KNOTS,
};
use crate::data::{PolarRegion, Port};
use crate::water::centered_jitter;

/// Horizontal visibility band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Visibility {
    Poor,
    Moderate,
    #[default]
    Good,
}

impl Visibility {
    pub const ALL: [Self; 3] = [Self::Poor, Self::Moderate, Self::Good];
}

/// Sky and precipitation label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Forecast {
    #[default]
    Clear,
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
    Overcast,
    Snow,
    Blizzard,
}

impl Forecast {
    pub const ALL: [Self; 5] = [
        Self::Clear,
        Self::PartlyCloudy,
        Self::Overcast,
        Self::Snow,
        Self::Blizzard,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Overcast => "Overcast",
            Self::Snow => "Snow",
            Self::Blizzard => "Blizzard",
        }
    }
}

/// Coarse season split used for the temperature and wind baselines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    /// Zero-based months 4..=8 (May to September) are summer.
    #[must_use]
    pub fn from_month0(month0: u32) -> Self {
        if SUMMER_MONTHS0.contains(&month0) {
            Self::Summer
        } else {
            Self::Winter
        }
    }

    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        Self::from_month0(now.month0())
    }

    const fn base_wind_knots(self) -> f64 {
        match self {
            Self::Summer => SUMMER_BASE_WIND_KNOTS,
            Self::Winter => WINTER_BASE_WIND_KNOTS,
        }
    }
}

impl PolarRegion {
    /// Hemisphere of a latitude: anything strictly north of the equator is Arctic.
    #[must_use]
    pub fn of_latitude(lat: f64) -> Self {
        if lat > 0.0 { Self::Arctic } else { Self::Antarctic }
    }
}

/// Mean temperature for a region and season before noise.
#[must_use]
pub const fn base_temperature_c(region: PolarRegion, season: Season) -> f64 {
    match (region, season) {
        (PolarRegion::Arctic, Season::Summer) => ARCTIC_SUMMER_TEMP_C,
        (PolarRegion::Arctic, Season::Winter) => ARCTIC_WINTER_TEMP_C,
        (PolarRegion::Antarctic, Season::Summer) => ANTARCTIC_SUMMER_TEMP_C,
        (PolarRegion::Antarctic, Season::Winter) => ANTARCTIC_WINTER_TEMP_C,
    }
}

/// One hour of the 24-hour outlook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPrediction {
    pub hour: u8,
    pub temperature_c: f64,
    pub wind_speed_knots: f64,
    pub condition: Forecast,
}

/// Weather along a route at calculation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub temperature_c: f64,
    pub wind_speed_knots: f64,
    pub visibility: Visibility,
    pub forecast: Forecast,
    pub wave_height_m: f64,
    /// Sea-ice concentration percentage in `[0, 100)`.
    pub sea_ice_concentration: f64,
    pub predictions: Vec<HourlyPrediction>,
}

impl WeatherCondition {
    /// Calm placeholder used when a route has no usable endpoints.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            temperature_c: FALLBACK_TEMPERATURE_C,
            wind_speed_knots: FALLBACK_WIND_KNOTS,
            visibility: Visibility::Good,
            forecast: Forecast::Clear,
            wave_height_m: FALLBACK_WAVE_HEIGHT_M,
            sea_ice_concentration: 0.0,
            predictions: (0..FORECAST_HOURS)
                .map(|hour| HourlyPrediction {
                    hour,
                    temperature_c: FALLBACK_TEMPERATURE_C,
                    wind_speed_knots: FALLBACK_WIND_KNOTS,
                    condition: Forecast::Clear,
                })
                .collect(),
        }
    }
}

/// Generate weather for a route between two ports.
///
/// Returns [`WeatherCondition::fallback`] when either endpoint is missing.
/// The hemisphere follows the departure latitude and the season follows `now`.
pub fn generate_weather<R: Rng + ?Sized>(
    departure: Option<&Port>,
    arrival: Option<&Port>,
    now: DateTime<Utc>,
    rng: &mut R,
) -> WeatherCondition {
    let (Some(departure), Some(_)) = (departure, arrival) else {
        log::debug!("route endpoints incomplete; using fallback weather");
        return WeatherCondition::fallback();
    };

    let region = PolarRegion::of_latitude(departure.position.lat);
    let season = Season::at(now);

    let temperature_c =
        base_temperature_c(region, season) + centered_jitter(rng, TEMP_NOISE_SPAN);
    let wind_speed_knots =
        season.base_wind_knots() + rng.gen_range(0.0..WIND_GUST_RANGE_KNOTS);
    let forecast = pick(rng, &Forecast::ALL);
    let visibility = pick(rng, &Visibility::ALL);
    let wave_height_m = rng.gen_range(WAVE_HEIGHT_MIN_M..WAVE_HEIGHT_MAX_M);
    let sea_ice_concentration = rng.gen_range(0.0..100.0);

    let predictions = (0..FORECAST_HOURS)
        .map(|hour| HourlyPrediction {
            hour,
            temperature_c: temperature_c + centered_jitter(rng, HOURLY_TEMP_SPAN),
            wind_speed_knots: wind_speed_knots + centered_jitter(rng, HOURLY_WIND_SPAN),
            condition: pick(rng, &Forecast::ALL),
        })
        .collect();

    WeatherCondition {
        temperature_c,
        wind_speed_knots,
        visibility,
        forecast,
        wave_height_m,
        sea_ice_concentration,
        predictions,
    }
}

fn pick<R: Rng + ?Sized, T: Copy + Default>(rng: &mut R, options: &[T]) -> T {
    options.choose(rng).copied().unwrap_or_default()
}
