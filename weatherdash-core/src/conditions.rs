//! Current conditions as a display record.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Feed, FetchError, FormatError, Result},
    location::{Location, resolve_city},
    model::Observation,
    provider::WeatherFeed,
    time::{ClockStyle, resolve_local},
    units::{
        UnitSystem, capitalize_description, format_humidity, format_pressure, format_temperature,
        format_visibility, format_wind_speed,
    },
};

/// Every field is ready to print; units are already attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub local_date: String,
    pub local_time: String,
    pub current_temp: String,
    pub feels_like_temp: String,
    pub humidity: String,
    pub pressure: String,
    pub sunrise: String,
    pub sunset: String,
    pub visibility: String,
    pub wind_speed: String,
    pub description: String,
    pub icon_code: String,
    pub condition_code: i64,
}

impl CurrentConditions {
    /// Builds the record from a raw observation. Times are rendered at the
    /// observed location's offset, not the viewer's.
    pub fn from_observation(
        obs: &Observation,
        unit: UnitSystem,
        clock: ClockStyle,
    ) -> Result<Self, FormatError> {
        let now = resolve_local(obs.timestamp, obs.utc_offset, clock)?;
        let sunrise = resolve_local(obs.sunrise, obs.utc_offset, clock)?;
        let sunset = resolve_local(obs.sunset, obs.utc_offset, clock)?;

        Ok(CurrentConditions {
            local_date: now.date,
            local_time: now.time,
            current_temp: format_temperature(obs.temperature, unit),
            feels_like_temp: format_temperature(obs.feels_like, unit),
            humidity: format_humidity(obs.humidity_pct),
            pressure: format_pressure(obs.pressure_hpa),
            sunrise: sunrise.time,
            sunset: sunset.time,
            visibility: format_visibility(obs.visibility_m),
            wind_speed: format_wind_speed(obs.wind_speed, unit),
            description: capitalize_description(&obs.condition.description),
            icon_code: obs.condition.icon.clone(),
            condition_code: obs.condition.id,
        })
    }
}

/// Resolves `city_query`, then fetches and formats its current conditions.
/// The resolved location is returned alongside for display.
pub async fn fetch_current_with_location(
    feed: &dyn WeatherFeed,
    city_query: &str,
    unit: UnitSystem,
    clock: ClockStyle,
) -> Result<(Location, CurrentConditions)> {
    let location = resolve_city(feed, city_query).await?;

    let observation = feed
        .current(location.coordinates(), unit)
        .await
        .map_err(|source| FetchError::new(Feed::Current, source))?;
    debug!(?observation, "Received current observation");

    let conditions = CurrentConditions::from_observation(&observation, unit, clock)?;
    Ok((location, conditions))
}

pub async fn fetch_current_conditions(
    feed: &dyn WeatherFeed,
    city_query: &str,
    unit: UnitSystem,
    clock: ClockStyle,
) -> Result<CurrentConditions> {
    let (_, conditions) = fetch_current_with_location(feed, city_query, unit, clock).await?;
    Ok(conditions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{Error, LookupError},
        testing::{StubFeed, sample_match, sample_observation},
    };

    #[test]
    fn formats_every_field() {
        let obs = sample_observation();

        let cc = CurrentConditions::from_observation(&obs, UnitSystem::Metric, ClockStyle::TwentyFourHour)
            .expect("valid observation");

        assert_eq!(cc.local_date, "Thursday, 14 March 2024");
        assert_eq!(cc.local_time, "17:30");
        assert_eq!(cc.current_temp, "21°C");
        assert_eq!(cc.feels_like_temp, "20°C");
        assert_eq!(cc.humidity, "71%");
        assert_eq!(cc.pressure, "1012hPa");
        assert_eq!(cc.sunrise, "11:42");
        assert_eq!(cc.sunset, "23:33");
        assert_eq!(cc.visibility, "8km");
        assert_eq!(cc.wind_speed, "3.5m/s");
        assert_eq!(cc.description, "Scattered Clouds");
        assert_eq!(cc.icon_code, "03d");
        assert_eq!(cc.condition_code, 802);
    }

    #[test]
    fn imperial_labels() {
        let obs = sample_observation();

        let cc = CurrentConditions::from_observation(&obs, UnitSystem::Imperial, ClockStyle::TwelveHour)
            .expect("valid observation");

        assert_eq!(cc.current_temp, "21°F");
        assert_eq!(cc.wind_speed, "3.5mph");
        assert_eq!(cc.local_time, "5:30 PM");
    }

    #[test]
    fn bad_offset_fails_instead_of_partial_record() {
        let mut obs = sample_observation();
        obs.utc_offset = 100_000;

        let err = CurrentConditions::from_observation(&obs, UnitSystem::Metric, ClockStyle::default())
            .unwrap_err();
        assert_eq!(err, FormatError::OffsetOutOfRange(100_000));
    }

    #[tokio::test]
    async fn fetch_uses_resolved_coordinates_and_unit() {
        let feed = StubFeed::default()
            .with_matches(vec![sample_match()])
            .with_observation(sample_observation());

        let (location, cc) =
            fetch_current_with_location(&feed, "Mumbai", UnitSystem::Imperial, ClockStyle::default())
                .await
                .expect("fetch must succeed");

        assert_eq!(location.country, "India");
        assert_eq!(cc.humidity, "71%");
        assert_eq!(feed.current_calls(), vec![(location.coordinates(), UnitSystem::Imperial)]);
    }

    #[tokio::test]
    async fn lookup_failure_propagates() {
        let feed = StubFeed::default().with_observation(sample_observation());

        let err = fetch_current_conditions(&feed, "nowhere", UnitSystem::Metric, ClockStyle::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Lookup(LookupError::NotFound { .. })));
        assert!(feed.current_calls().is_empty());
    }

    #[tokio::test]
    async fn weather_failure_is_a_fetch_error() {
        let feed = StubFeed::default().with_matches(vec![sample_match()]);

        let err = fetch_current_conditions(&feed, "Mumbai", UnitSystem::Metric, ClockStyle::default())
            .await
            .unwrap_err();

        match err {
            Error::Fetch(e) => assert_eq!(e.feed, Feed::Current),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
