use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::fmt;

use crate::{
    model::{Condition, Coordinates, ForecastSample, GeoMatch, Observation},
    units::UnitSystem,
};

use super::WeatherFeed;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Clone)]
pub struct OpenWeatherFeed {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherFeed {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the feed at another host, e.g. a proxy or a mock server.
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, ?params, "OpenWeather {what} request");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {what} JSON"))
    }
}

impl fmt::Debug for OpenWeatherFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherFeed")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoMatch {
    name: String,
    state: Option<String>,
    country: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: i64,
    description: String,
    icon: String,
}

impl From<OwWeather> for Condition {
    fn from(w: OwWeather) -> Self {
        Condition { id: w.id, description: w.description, icon: w.icon }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: i64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: i64,
    timezone: i32,
    main: OwMain,
    sys: OwSys,
    visibility: i64,
    wind: OwWind,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

/// Entries stay raw so one bad sample does not sink the whole list.
#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<serde_json::Value>,
}

fn sample_from_entry(entry: serde_json::Value) -> Option<ForecastSample> {
    let entry: OwForecastEntry = match serde_json::from_value(entry) {
        Ok(entry) => entry,
        Err(e) => {
            tracing::warn!(error = %e, "Dropping malformed forecast sample");
            return None;
        }
    };

    let Some(weather) = entry.weather.into_iter().next() else {
        tracing::warn!(dt = entry.dt, "Dropping forecast sample without weather conditions");
        return None;
    };

    Some(ForecastSample {
        timestamp: entry.dt,
        temperature: entry.main.temp,
        condition: weather.into(),
    })
}

fn coordinate_params(at: Coordinates, unit: UnitSystem) -> Vec<(&'static str, String)> {
    vec![
        ("lat", at.latitude.to_string()),
        ("lon", at.longitude.to_string()),
        ("units", unit.as_str().to_string()),
    ]
}

#[async_trait]
impl WeatherFeed for OpenWeatherFeed {
    async fn geocode(&self, query: &str, limit: usize) -> Result<Vec<GeoMatch>> {
        let params = [("q", query.to_string()), ("limit", limit.to_string())];
        let parsed: Vec<OwGeoMatch> = self.get_json("/geo/1.0/direct", &params, "geocoding").await?;

        Ok(parsed
            .into_iter()
            .map(|m| GeoMatch {
                name: m.name,
                state: m.state,
                country_code: m.country,
                latitude: m.lat,
                longitude: m.lon,
            })
            .collect())
    }

    async fn current(&self, at: Coordinates, unit: UnitSystem) -> Result<Observation> {
        let params = coordinate_params(at, unit);
        let parsed: OwCurrentResponse =
            self.get_json("/data/2.5/weather", &params, "current weather").await?;

        let condition = parsed
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("OpenWeather current response contained no weather conditions"))?;

        Ok(Observation {
            timestamp: parsed.dt,
            utc_offset: parsed.timezone,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            sunrise: parsed.sys.sunrise,
            sunset: parsed.sys.sunset,
            visibility_m: parsed.visibility,
            wind_speed: parsed.wind.speed,
            condition: condition.into(),
        })
    }

    async fn forecast(
        &self,
        at: Coordinates,
        unit: UnitSystem,
        count: usize,
    ) -> Result<Vec<ForecastSample>> {
        let mut params = coordinate_params(at, unit);
        params.push(("cnt", count.to_string()));
        let parsed: OwForecastResponse =
            self.get_json("/data/2.5/forecast", &params, "forecast").await?;

        Ok(parsed.list.into_iter().filter_map(sample_from_entry).collect())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
