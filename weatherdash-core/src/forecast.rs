//! Short-range forecast as an ordered list of display records.
//!
//! Forecast times are rendered in the viewer's own zone, unlike current
//! conditions which use the location's offset. See DESIGN.md.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, warn};

use crate::{
    error::{Feed, FetchError, FormatError, Result},
    location::resolve_city,
    model::ForecastSample,
    provider::WeatherFeed,
    time::{ClockStyle, format_in_zone, instant},
    units::{UnitSystem, capitalize_description, format_temperature},
};

/// Samples requested from the feed; three-hourly steps, so three days.
pub const FORECAST_SAMPLES: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub local_date: String,
    pub local_time: String,
    pub temp: String,
    pub description: String,
    pub icon_code: String,
    pub condition_code: i64,
}

/// At most [`FORECAST_SAMPLES`] entries, in feed order.
pub type Forecast = Vec<ForecastEntry>;

impl ForecastEntry {
    pub fn from_sample<Tz>(
        sample: &ForecastSample,
        unit: UnitSystem,
        clock: ClockStyle,
        zone: &Tz,
    ) -> Result<Self, FormatError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let when = format_in_zone(&instant(sample.timestamp)?.with_timezone(zone), clock);

        Ok(ForecastEntry {
            local_date: when.date,
            local_time: when.time,
            temp: format_temperature(sample.temperature, unit),
            description: capitalize_description(&sample.condition.description),
            icon_code: sample.condition.icon.clone(),
            condition_code: sample.condition.id,
        })
    }
}

/// Formats up to [`FORECAST_SAMPLES`] samples. A sample that cannot be placed
/// in time is skipped, a short feed gives a short forecast, and anything past
/// the limit is ignored.
pub fn assemble_forecast<Tz>(
    samples: &[ForecastSample],
    unit: UnitSystem,
    clock: ClockStyle,
    zone: &Tz,
) -> Forecast
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let forecast: Forecast = samples
        .iter()
        .filter_map(|sample| match ForecastEntry::from_sample(sample, unit, clock, zone) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(timestamp = sample.timestamp, error = %e, "Dropping unformattable forecast sample");
                None
            }
        })
        .take(FORECAST_SAMPLES)
        .collect();

    if forecast.len() < FORECAST_SAMPLES {
        warn!(
            received = samples.len(),
            usable = forecast.len(),
            expected = FORECAST_SAMPLES,
            "Forecast feed returned fewer usable samples than requested"
        );
    }

    forecast
}

pub async fn fetch_forecast(
    feed: &dyn WeatherFeed,
    city_query: &str,
    unit: UnitSystem,
    clock: ClockStyle,
) -> Result<Forecast> {
    let location = resolve_city(feed, city_query).await?;

    let samples = feed
        .forecast(location.coordinates(), unit, FORECAST_SAMPLES)
        .await
        .map_err(|source| FetchError::new(Feed::Forecast, source))?;
    debug!(count = samples.len(), "Received forecast samples");

    Ok(assemble_forecast(&samples, unit, clock, &Local))
}
