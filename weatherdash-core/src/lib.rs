//! Core library for the `weatherdash` dashboard.
//!
//! This crate defines:
//! - Unit-aware formatting and location-local time rendering
//! - An abstraction over the weather feed, with an OpenWeather implementation
//! - The location, current-conditions and forecast fetchers
//! - Preference persistence and the orchestrating [`Dashboard`]
//!
//! It is used by `weatherdash-cli`, but any front end that implements
//! [`RenderSink`] can drive it.

pub mod conditions;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod location;
pub mod model;
pub mod preferences;
pub mod provider;
pub mod region;
pub mod render;
pub mod time;
pub mod units;

#[cfg(test)]
mod testing;

pub use conditions::{CurrentConditions, fetch_current_conditions, fetch_current_with_location};
pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{Error, FetchError, FormatError, LookupError};
pub use forecast::{FORECAST_SAMPLES, Forecast, ForecastEntry, fetch_forecast};
pub use location::{Location, resolve_city};
pub use preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Preferences};
pub use provider::{WeatherFeed, feed_from_config, openweather::OpenWeatherFeed};
pub use render::{RenderSink, region_label};
pub use time::{ClockStyle, LocalDateTime};
pub use units::UnitSystem;
