//! Resolving a free-text city query into a [`Location`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::LookupError,
    model::{Coordinates, GeoMatch},
    provider::WeatherFeed,
    region::display_country,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub display_name: String,
    /// Sub-national administrative area, when the geocoder knows one.
    pub region: Option<String>,
    /// Full English country name.
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates { latitude: self.latitude, longitude: self.longitude }
    }
}

impl From<GeoMatch> for Location {
    fn from(m: GeoMatch) -> Self {
        Location {
            display_name: m.name,
            region: m.state.filter(|s| !s.trim().is_empty()),
            country: display_country(&m.country_code),
            latitude: m.latitude,
            longitude: m.longitude,
        }
    }
}

/// Looks up `query` and builds a [`Location`] from the first match.
pub async fn resolve_city(feed: &dyn WeatherFeed, query: &str) -> Result<Location, LookupError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(LookupError::NotFound { query: query.to_string() });
    }

    debug!("Geocoding location name: {}", query);

    let matches = feed
        .geocode(query, 1)
        .await
        .map_err(|source| LookupError::Request { query: query.to_string(), source })?;

    let first = matches
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::NotFound { query: query.to_string() })?;

    let location = Location::from(first);
    info!(
        "Resolved '{}' to {} ({:.4}, {:.4})",
        query, location.display_name, location.latitude, location.longitude
    );

    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubFeed;

    fn london() -> GeoMatch {
        GeoMatch {
            name: "London".into(),
            state: Some("England".into()),
            country_code: "GB".into(),
            latitude: 51.5073,
            longitude: -0.1277,
        }
    }

    #[tokio::test]
    async fn resolves_first_match_with_full_country_name() {
        let feed = StubFeed::default().with_matches(vec![london()]);

        let location = resolve_city(&feed, "london").await.expect("must resolve");

        assert_eq!(location.display_name, "London");
        assert_eq!(location.region.as_deref(), Some("England"));
        assert_eq!(location.country, "United Kingdom");
        assert_eq!(location.coordinates(), Coordinates { latitude: 51.5073, longitude: -0.1277 });
        assert_eq!(feed.geocode_queries(), vec!["london".to_string()]);
    }

    #[tokio::test]
    async fn empty_result_set_is_not_found() {
        let feed = StubFeed::default();

        let err = resolve_city(&feed, "atlantis").await.unwrap_err();

        assert!(matches!(err, LookupError::NotFound { ref query } if query == "atlantis"));
    }

    #[tokio::test]
    async fn blank_query_skips_the_network() {
        let feed = StubFeed::default().with_matches(vec![london()]);

        let err = resolve_city(&feed, "   ").await.unwrap_err();

        assert!(matches!(err, LookupError::NotFound { .. }));
        assert!(feed.geocode_queries().is_empty());
    }

    #[tokio::test]
    async fn feed_failure_is_a_request_error() {
        let feed = StubFeed::failing("connection refused");

        let err = resolve_city(&feed, "paris").await.unwrap_err();

        match err {
            LookupError::Request { query, source } => {
                assert_eq!(query, "paris");
                assert!(source.to_string().contains("connection refused"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_or_blank_state_means_no_region() {
        let mut m = london();
        m.state = None;
        assert_eq!(Location::from(m.clone()).region, None);

        m.state = Some(String::new());
        assert_eq!(Location::from(m).region, None);
    }
}
