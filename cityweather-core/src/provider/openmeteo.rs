use anyhow::{Context, Result, anyhow, ensure};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    catalog::Location,
    classify,
    model::{Language, WeatherRecord},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

const CURRENT_FIELDS: &str = concat!(
    "temperature_2m,relative_humidity_2m,apparent_temperature,",
    "precipitation,weather_code,wind_speed_10m",
);

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    language: Language,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn with_base_url(base_url: impl Into<String>, language: Language) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            language,
            http: Client::new(),
        }
    }

    pub fn forecast_url(&self) -> String {
        format!("{}/v1/forecast", self.base_url)
    }

    #[instrument(skip(self, location), fields(city = %location.name))]
    async fn fetch_current(&self, location: &Location) -> Result<WeatherRecord> {
        let url = self.forecast_url();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo (current conditions)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Open-Meteo current response body")?;

        debug!(%status, bytes = body.len(), "Open-Meteo responded");

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OmForecastResponse = serde_json::from_str(&body)
            .context("Failed to parse Open-Meteo current JSON")?;

        into_record(location, parsed.current, self.language, Utc::now())
    }
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current: OmCurrent,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: u8,
    apparent_temperature: f64,
    precipitation: f64,
    weather_code: i32,
    wind_speed_10m: f64,
}

/// Map provider fields onto a record. All-or-nothing: any out-of-range value
/// rejects the whole payload.
fn into_record(
    location: &Location,
    current: OmCurrent,
    language: Language,
    fetched_at: DateTime<Utc>,
) -> Result<WeatherRecord> {
    ensure!(
        current.relative_humidity_2m <= 100,
        "Open-Meteo returned relative humidity {} outside 0..=100",
        current.relative_humidity_2m,
    );
    ensure!(
        current.temperature_2m.is_finite() && current.apparent_temperature.is_finite(),
        "Open-Meteo returned a non-finite temperature",
    );
    ensure!(
        current.wind_speed_10m.is_finite() && current.wind_speed_10m >= 0.0,
        "Open-Meteo returned invalid wind speed {}",
        current.wind_speed_10m,
    );
    ensure!(
        current.precipitation.is_finite() && current.precipitation >= 0.0,
        "Open-Meteo returned invalid precipitation {}",
        current.precipitation,
    );

    let description = classify::describe_in(current.weather_code, language);
    Ok(WeatherRecord {
        location_name: location.name.clone(),
        temperature_c: current.temperature_2m,
        description: description.to_string(),
        humidity_pct: current.relative_humidity_2m,
        wind_speed_kmh: current.wind_speed_10m,
        feels_like_c: current.apparent_temperature,
        precipitation_mm: current.precipitation,
        weather_code: current.weather_code,
        fetched_at,
    })
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn current(&self, location: &Location) -> Result<WeatherRecord> {
        self.fetch_current(location).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
