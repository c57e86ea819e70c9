//! Terminal rendering of weather records and catalog entries.

use chrono::Local;
use cityweather_core::{Icon, Language, Location, Theme, ViewState, WeatherRecord};
use serde::Serialize;

struct Labels {
    feels_like: &'static str,
    precipitation: &'static str,
    humidity: &'static str,
    wind: &'static str,
    source: &'static str,
    updated: &'static str,
    loading: &'static str,
}

fn labels(language: Language) -> Labels {
    match language {
        Language::Zh => Labels {
            feels_like: "体感温度",
            precipitation: "降水量",
            humidity: "湿度",
            wind: "风速",
            source: "数据来源: Open-Meteo API",
            updated: "更新时间",
            loading: "正在获取天气数据…",
        },
        Language::En => Labels {
            feels_like: "Feels like",
            precipitation: "Precipitation",
            humidity: "Humidity",
            wind: "Wind",
            source: "Data source: Open-Meteo API",
            updated: "Updated",
            loading: "Fetching weather…",
        },
    }
}

/// Record plus its derived icon and theme keys, for `--json` output.
#[derive(Debug, Serialize)]
pub struct JsonRecord<'a> {
    #[serde(flatten)]
    pub record: &'a WeatherRecord,
    pub icon: Icon,
    pub theme: Theme,
}

impl<'a> From<&'a WeatherRecord> for JsonRecord<'a> {
    fn from(record: &'a WeatherRecord) -> Self {
        Self {
            record,
            icon: record.icon(),
            theme: record.theme(),
        }
    }
}

pub fn record(record: &WeatherRecord, language: Language) -> String {
    let l = labels(language);
    let local = record.fetched_at.with_timezone(&Local);
    let fetched_at = local.format("%Y-%m-%d %H:%M:%S");

    format!(
        "{name}  {glyph}\n\
         {temp:.0}°  {description}\n\
         {feels_like}: {feels:.0}°C    {precipitation}: {precip} mm\n\
         {humidity}: {hum}%    {wind}: {wind_speed} km/h\n\
         {source} · {updated}: {fetched_at}",
        name = record.location_name,
        glyph = record.icon().glyph(),
        temp = record.temperature_c.round(),
        description = record.description,
        feels_like = l.feels_like,
        feels = record.feels_like_c.round(),
        precipitation = l.precipitation,
        precip = record.precipitation_mm,
        humidity = l.humidity,
        hum = record.humidity_pct,
        wind = l.wind,
        wind_speed = record.wind_speed_kmh,
        source = l.source,
        updated = l.updated,
    )
}

/// Line shown while a lookup is in flight.
pub fn loading(language: Language) -> &'static str {
    labels(language).loading
}

/// Loading line and error banner first, then whatever record is still current.
pub fn view(view: &ViewState, language: Language) -> String {
    let mut out = Vec::new();

    if view.loading {
        out.push(loading(language).to_string());
    }
    if let Some(error) = &view.error {
        out.push(format!("⚠ {error}"));
    }
    if let Some(current) = &view.current {
        out.push(record(current, language));
    }

    out.join("\n\n")
}

pub fn catalog_line(location: &Location) -> String {
    let (lat, lon) = (location.latitude, location.longitude);
    format!("{}\t{lat:.4}, {lon:.4}", location.name)
}
