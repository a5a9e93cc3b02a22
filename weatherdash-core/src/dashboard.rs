//! Drives the fetchers from the remembered preferences and user actions.

use tracing::{info, warn};

use crate::{
    conditions::fetch_current_with_location,
    error::{Error, Result},
    forecast::fetch_forecast,
    preferences::{PreferenceStore, Preferences},
    provider::WeatherFeed,
    render::RenderSink,
    time::ClockStyle,
    units::UnitSystem,
};

#[derive(Debug)]
pub struct Dashboard<S: PreferenceStore> {
    feed: Box<dyn WeatherFeed>,
    store: S,
    prefs: Preferences,
    clock: ClockStyle,
}

impl<S: PreferenceStore> Dashboard<S> {
    /// Reads the remembered unit and city from `store`.
    pub fn load(feed: Box<dyn WeatherFeed>, store: S, clock: ClockStyle) -> Result<Self> {
        let prefs = Preferences::load(&store)?;
        info!(unit = %prefs.unit, city = %prefs.city, "Loaded preferences");
        Ok(Self { feed, store, prefs, clock })
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn unit(&self) -> UnitSystem {
        self.prefs.unit
    }

    pub fn city(&self) -> &str {
        &self.prefs.city
    }

    /// Fetches current conditions and the forecast for the remembered city
    /// concurrently and renders whichever succeed. The first failure, if
    /// any, is returned after both have finished.
    pub async fn refresh(&self, sink: &mut dyn RenderSink) -> Result<()> {
        let feed = self.feed.as_ref();
        let city = self.prefs.city.as_str();
        let unit = self.prefs.unit;

        let (current, forecast) = tokio::join!(
            fetch_current_with_location(feed, city, unit, self.clock),
            fetch_forecast(feed, city, unit, self.clock),
        );

        let mut first_err: Option<Error> = None;

        match current {
            Ok((location, conditions)) => sink.render_current(&location, &conditions),
            Err(e) => {
                warn!(error = %e, "Current conditions unavailable");
                first_err = Some(e);
            }
        }

        match forecast {
            Ok(entries) => sink.render_forecast(&entries),
            Err(e) => {
                warn!(error = %e, "Forecast unavailable");
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Flips metric/imperial, refreshes, then persists the new unit. The
    /// unit is persisted even when the refresh fails. If persisting fails,
    /// that error is returned and a refresh error is only logged; the session
    /// keeps the new unit either way.
    pub async fn toggle_unit(&mut self, sink: &mut dyn RenderSink) -> Result<()> {
        let unit = self.prefs.unit.toggled();
        self.apply_unit(unit, sink).await
    }

    pub async fn set_unit(&mut self, unit: UnitSystem, sink: &mut dyn RenderSink) -> Result<()> {
        self.apply_unit(unit, sink).await
    }

    async fn apply_unit(&mut self, unit: UnitSystem, sink: &mut dyn RenderSink) -> Result<()> {
        self.prefs.unit = unit;
        let refreshed = self.refresh(sink).await;

        if let Err(e) = self.prefs.save_unit(&mut self.store, unit) {
            if let Err(refresh_err) = &refreshed {
                warn!(error = %refresh_err, "Refresh failed before the unit could be saved");
            }
            return Err(Error::Preferences(e));
        }

        refreshed
    }

    /// Remembers `city` and shows it.
    pub async fn search(&mut self, city: &str, sink: &mut dyn RenderSink) -> Result<()> {
        let city = city.trim();
        self.prefs
            .save_city(&mut self.store, city)
            .map_err(Error::Preferences)?;

        self.refresh(sink).await
    }
}
