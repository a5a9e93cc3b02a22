//! In-memory feed and fixtures shared by the unit tests.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::{
    model::{Condition, Coordinates, ForecastSample, GeoMatch, Observation},
    provider::WeatherFeed,
    units::UnitSystem,
};

/// 2024-03-14T12:00:00Z
pub const NOON_UTC: i64 = 1_710_417_600;

#[derive(Debug, Default)]
struct Calls {
    geocode: Vec<String>,
    current: Vec<(Coordinates, UnitSystem)>,
    forecast: Vec<(UnitSystem, usize)>,
}

/// Clones share the recorded calls.
#[derive(Debug, Clone, Default)]
pub struct StubFeed {
    matches: Vec<GeoMatch>,
    observation: Option<Observation>,
    samples: Vec<ForecastSample>,
    geocode_failure: Option<String>,
    weather_failure: Option<String>,
    calls: Arc<Mutex<Calls>>,
}

impl StubFeed {
    /// Every query fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            geocode_failure: Some(message.to_string()),
            weather_failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn with_matches(mut self, matches: Vec<GeoMatch>) -> Self {
        self.matches = matches;
        self
    }

    pub fn with_observation(mut self, observation: Observation) -> Self {
        self.observation = Some(observation);
        self
    }

    pub fn with_samples(mut self, samples: Vec<ForecastSample>) -> Self {
        self.samples = samples;
        self
    }

    /// Geocoding still works; current and forecast queries fail.
    pub fn failing_weather(mut self, message: &str) -> Self {
        self.weather_failure = Some(message.to_string());
        self
    }

    pub fn geocode_queries(&self) -> Vec<String> {
        self.calls.lock().unwrap().geocode.clone()
    }

    pub fn current_calls(&self) -> Vec<(Coordinates, UnitSystem)> {
        self.calls.lock().unwrap().current.clone()
    }

    pub fn forecast_calls(&self) -> Vec<(UnitSystem, usize)> {
        self.calls.lock().unwrap().forecast.clone()
    }
}

#[async_trait]
impl WeatherFeed for StubFeed {
    async fn geocode(&self, query: &str, limit: usize) -> Result<Vec<GeoMatch>> {
        self.calls.lock().unwrap().geocode.push(query.to_string());
        if let Some(msg) = &self.geocode_failure {
            return Err(anyhow!("{msg}"));
        }
        Ok(self.matches.iter().take(limit).cloned().collect())
    }

    async fn current(&self, at: Coordinates, unit: UnitSystem) -> Result<Observation> {
        self.calls.lock().unwrap().current.push((at, unit));
        if let Some(msg) = &self.weather_failure {
            return Err(anyhow!("{msg}"));
        }
        self.observation.clone().ok_or_else(|| anyhow!("no observation stubbed"))
    }

    async fn forecast(
        &self,
        _at: Coordinates,
        unit: UnitSystem,
        count: usize,
    ) -> Result<Vec<ForecastSample>> {
        self.calls.lock().unwrap().forecast.push((unit, count));
        if let Some(msg) = &self.weather_failure {
            return Err(anyhow!("{msg}"));
        }
        Ok(self.samples.clone())
    }
}

pub fn sample_match() -> GeoMatch {
    GeoMatch {
        name: "Mumbai".into(),
        state: Some("Maharashtra".into()),
        country_code: "IN".into(),
        latitude: 19.076,
        longitude: 72.8777,
    }
}

/// Mumbai at 17:30 local (UTC+5:30).
pub fn sample_observation() -> Observation {
    Observation {
        timestamp: NOON_UTC,
        utc_offset: 19_800,
        temperature: 20.6,
        feels_like: 19.8,
        humidity_pct: 71,
        pressure_hpa: 1012,
        // 06:12Z and 18:03Z
        sunrise: 1_710_396_720,
        sunset: 1_710_439_380,
        visibility_m: 8000,
        wind_speed: 3.5,
        condition: Condition {
            id: 802,
            description: "scattered clouds".into(),
            icon: "03d".into(),
        },
    }
}

/// Three-hourly samples from [`NOON_UTC`], temperatures 11, 12, 13, ...
pub fn sample_forecast(count: usize) -> Vec<ForecastSample> {
    (0..count)
        .map(|i| ForecastSample {
            timestamp: NOON_UTC + (i as i64) * 3 * 3600,
            temperature: 11.0 + i as f64,
            condition: Condition {
                id: 500,
                description: "light rain".into(),
                icon: "10d".into(),
            },
        })
        .collect()
}
