//! Feed-neutral readings as returned by a [`WeatherFeed`](crate::WeatherFeed).
//!
//! These still carry raw numbers; the fetchers turn them into display records.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One geocoding hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMatch {
    pub name: String,
    pub state: Option<String>,
    /// ISO 3166-1 alpha-2
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub id: i64,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Unix seconds, UTC.
    pub timestamp: i64,
    /// Seconds east of UTC at the observed location.
    pub utc_offset: i32,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub visibility_m: i64,
    pub wind_speed: f64,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: i64,
    pub temperature: f64,
    pub condition: Condition,
}
