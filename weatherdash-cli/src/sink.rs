use chrono::Local;
use serde_json::{Value, json};
use std::io::{self, Write};
use weatherdash_core::{CurrentConditions, ForecastEntry, Location, RenderSink, region_label};

/// Prints records as they arrive.
pub struct TerminalSink<W: Write> {
    out: W,
}

impl TerminalSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalSink<W> {
    #[cfg(test)]
    fn new(out: W) -> Self {
        Self { out }
    }

    fn write_current(&mut self, location: &Location, cc: &CurrentConditions) -> io::Result<()> {
        let out = &mut self.out;
        writeln!(out)?;
        writeln!(out, "{}", location.display_name)?;
        writeln!(out, "{}", region_label(location))?;
        writeln!(out, "{}  {}", cc.local_date, cc.local_time)?;
        writeln!(out)?;
        writeln!(out, "  {}  {} [{}]", cc.current_temp, cc.description, cc.icon_code)?;
        writeln!(out, "  {:<12} {}", "Feels like", cc.feels_like_temp)?;
        writeln!(out, "  {:<12} {}", "Humidity", cc.humidity)?;
        writeln!(out, "  {:<12} {}", "Pressure", cc.pressure)?;
        writeln!(out, "  {:<12} {}", "Wind", cc.wind_speed)?;
        writeln!(out, "  {:<12} {}", "Visibility", cc.visibility)?;
        writeln!(out, "  {:<12} {}", "Sunrise", cc.sunrise)?;
        writeln!(out, "  {:<12} {}", "Sunset", cc.sunset)?;
        Ok(())
    }

    fn write_forecast(&mut self, forecast: &[ForecastEntry]) -> io::Result<()> {
        let out = &mut self.out;
        writeln!(out)?;
        writeln!(out, "Forecast")?;

        let mut current_date: Option<&str> = None;
        for entry in forecast {
            if current_date != Some(entry.local_date.as_str()) {
                writeln!(out, "  {}", entry.local_date)?;
                current_date = Some(entry.local_date.as_str());
            }
            writeln!(out, "    {:>8}  {:>6}  {}", entry.local_time, entry.temp, entry.description)?;
        }

        writeln!(out)?;
        writeln!(out, "Fetched at {}", Local::now().format("%H:%M"))?;
        Ok(())
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn render_current(&mut self, location: &Location, conditions: &CurrentConditions) {
        if let Err(e) = self.write_current(location, conditions) {
            tracing::error!("Failed to write current conditions: {e}");
        }
    }

    fn render_forecast(&mut self, forecast: &[ForecastEntry]) {
        if let Err(e) = self.write_forecast(forecast) {
            tracing::error!("Failed to write forecast: {e}");
        }
    }
}

/// Collects records and prints them as one JSON document.
#[derive(Debug, Default)]
pub struct JsonSink {
    location: Option<Location>,
    current: Option<CurrentConditions>,
    forecast: Option<Vec<ForecastEntry>>,
}

impl JsonSink {
    pub fn to_value(&self) -> Value {
        json!({
            "location": self.location,
            "current": self.current,
            "forecast": self.forecast,
        })
    }

    pub fn print(&self) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(&self.to_value())?;
        println!("{text}");
        Ok(())
    }
}

impl RenderSink for JsonSink {
    fn render_current(&mut self, location: &Location, conditions: &CurrentConditions) {
        self.location = Some(location.clone());
        self.current = Some(conditions.clone());
    }

    fn render_forecast(&mut self, forecast: &[ForecastEntry]) {
        self.forecast = Some(forecast.to_vec());
    }
}
