use crate::{conditions::CurrentConditions, forecast::ForecastEntry, location::Location};

/// Where finished display records go. Each call replaces what was shown before.
pub trait RenderSink {
    fn render_current(&mut self, location: &Location, conditions: &CurrentConditions);
    fn render_forecast(&mut self, forecast: &[ForecastEntry]);
}

/// "Maharashtra, India", or just the country when there is no region.
pub fn region_label(location: &Location) -> String {
    match &location.region {
        Some(region) => format!("{region}, {}", location.country),
        None => location.country.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(region: Option<&str>) -> Location {
        Location {
            display_name: "Springfield".into(),
            region: region.map(str::to_string),
            country: "United States".into(),
            latitude: 39.8,
            longitude: -89.6,
        }
    }

    #[test]
    fn region_label_with_and_without_region() {
        assert_eq!(region_label(&location(Some("Illinois"))), "Illinois, United States");
        assert_eq!(region_label(&location(None)), "United States");
    }
}
