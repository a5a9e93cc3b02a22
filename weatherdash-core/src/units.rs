use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};

use crate::error::FormatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Value of the `units` query parameter, also the persisted form.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }

    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    fn temperature_suffix(self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    fn speed_suffix(self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = FormatError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(FormatError::UnknownUnit(value.to_string())),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitSystem::try_from(s)
    }
}

/// Rounds to the nearest whole degree and appends `°C` or `°F`.
pub fn format_temperature(value: f64, unit: UnitSystem) -> String {
    // `as i64` folds -0.0 into 0 so "-0°C" never shows up.
    let rounded = value.round() as i64;
    format!("{rounded}{}", unit.temperature_suffix())
}

/// Appends `m/s` or `mph`; the value is printed as given.
pub fn format_wind_speed(value: f64, unit: UnitSystem) -> String {
    format!("{value}{}", unit.speed_suffix())
}

pub fn format_humidity(percent: u8) -> String {
    format!("{percent}%")
}

pub fn format_pressure(hpa: i64) -> String {
    format!("{hpa}hPa")
}

/// Visibility arrives in meters and is shown in kilometers.
pub fn format_visibility(meters: i64) -> String {
    let km = meters as f64 / 1000.0;
    format!("{km}km")
}

/// "light RAIN" -> "Light Rain".
pub fn capitalize_description(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            let Some(first) = chars.next() else {
                return String::new();
            };
            // Multi-char uppercase forms (ß -> SS) would not survive a second pass.
            let mut upper = first.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(single), None) => std::iter::once(single).chain(chars).collect(),
                _ => word.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
