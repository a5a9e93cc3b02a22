use crate::{
    Config, UnitSystem,
    model::{Coordinates, ForecastSample, GeoMatch, Observation},
    provider::openweather::OpenWeatherFeed,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The three upstream queries the dashboard is built on.
#[async_trait]
pub trait WeatherFeed: Send + Sync + Debug {
    /// Matches for a free-text place name, best first, at most `limit`.
    async fn geocode(&self, query: &str, limit: usize) -> anyhow::Result<Vec<GeoMatch>>;

    async fn current(&self, at: Coordinates, unit: UnitSystem) -> anyhow::Result<Observation>;

    /// Up to `count` samples in chronological order.
    async fn forecast(
        &self,
        at: Coordinates,
        unit: UnitSystem,
        count: usize,
    ) -> anyhow::Result<Vec<ForecastSample>>;
}

/// Construct the OpenWeather feed from config.
pub fn feed_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherFeed>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `weatherdash configure` or pass --api-key."
        )
    })?;

    let feed = match config.api_base.as_deref() {
        Some(base) => OpenWeatherFeed::with_base_url(api_key.to_owned(), base),
        None => OpenWeatherFeed::new(api_key.to_owned()),
    };

    Ok(Box::new(feed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = feed_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("Hint: run `weatherdash configure`"));
    }

    #[test]
    fn feed_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(feed_from_config(&cfg).is_ok());
    }

    #[test]
    fn feed_from_config_honours_api_base() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());
        cfg.api_base = Some("http://127.0.0.1:9".to_string());

        let feed = feed_from_config(&cfg).expect("feed must build");
        assert!(format!("{feed:?}").contains("127.0.0.1:9"));
    }
}
