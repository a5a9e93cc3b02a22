//! Typed failures surfaced by the dashboard operations.
//!
//! Provider internals and configuration work with `anyhow`; these types are
//! what callers of the fetch operations match on.

use std::fmt;

use thiserror::Error;

/// Which upstream feed a [`FetchError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Current,
    Forecast,
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feed::Current => f.write_str("current weather"),
            Feed::Forecast => f.write_str("forecast"),
        }
    }
}

/// Location resolution failed.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("No location found for '{query}'")]
    NotFound { query: String },

    #[error("Geocoding request for '{query}' failed")]
    Request {
        query: String,
        #[source]
        source: anyhow::Error,
    },
}

/// The weather or forecast call failed (network, status or body shape).
#[derive(Debug, Error)]
#[error("Failed to fetch {feed} data")]
pub struct FetchError {
    pub feed: Feed,
    #[source]
    pub source: anyhow::Error,
}

impl FetchError {
    pub fn new(feed: Feed, source: anyhow::Error) -> Self {
        Self { feed, source }
    }
}

/// A value could not be turned into a display string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("Unknown unit system '{0}'. Supported unit systems: metric, imperial.")]
    UnknownUnit(String),

    #[error("UTC offset of {0} seconds is out of range")]
    OffsetOutOfRange(i32),

    #[error("Timestamp {0} is out of range")]
    TimestampOutOfRange(i64),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Preference store error: {0:#}")]
    Preferences(anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
