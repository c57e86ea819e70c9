use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{self, Icon, Theme, WeatherBucket};

/// Language used for weather descriptions and user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    pub const fn all() -> &'static [Language] {
        &[Language::Zh, Language::En]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Language {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "zh" => Ok(Language::Zh),
            "en" => Ok(Language::En),
            _ => Err(anyhow::anyhow!("Unknown language '{value}'")),
        }
    }
}

/// Normalized current conditions for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub location_name: String,
    pub temperature_c: f64,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_kmh: f64,
    pub feels_like_c: f64,
    pub precipitation_mm: f64,
    pub weather_code: i32,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherRecord {
    pub fn bucket(&self) -> WeatherBucket {
        classify::bucket(self.weather_code)
    }

    pub fn icon(&self) -> Icon {
        classify::icon_for(self.weather_code)
    }

    pub fn theme(&self) -> Theme {
        classify::background_for(self.weather_code)
    }
}
