//! WMO weather code classification.
//!
//! Codes follow the WMO 4677 subset published by Open-Meteo. Every function
//! here is total: codes outside the known ranges map to a fallback value.

use serde::Serialize;

use crate::model::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherBucket {
    Clear,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Showers,
    SnowShowers,
    Thunderstorm,
    Unknown,
}

pub fn bucket(code: i32) -> WeatherBucket {
    match code {
        0 => WeatherBucket::Clear,
        1 => WeatherBucket::MainlyClear,
        2 => WeatherBucket::PartlyCloudy,
        3 => WeatherBucket::Overcast,
        45..=48 => WeatherBucket::Fog,
        51..=57 => WeatherBucket::Drizzle,
        61..=67 => WeatherBucket::Rain,
        71..=77 => WeatherBucket::Snow,
        80..=82 => WeatherBucket::Showers,
        85..=86 => WeatherBucket::SnowShowers,
        95.. => WeatherBucket::Thunderstorm,
        _ => WeatherBucket::Unknown,
    }
}

/// Human-readable description in Chinese.
pub fn describe(code: i32) -> &'static str {
    describe_in(code, Language::Zh)
}

pub fn describe_in(code: i32, language: Language) -> &'static str {
    match language {
        Language::Zh => describe_zh(code),
        Language::En => describe_en(code),
    }
}

fn describe_zh(code: i32) -> &'static str {
    match code {
        0 => "晴朗",
        1 => "大部晴朗",
        2 => "局部多云",
        3 => "多云",
        45 => "雾",
        48 => "沉积雾",
        51 => "小毛毛雨",
        53 => "中毛毛雨",
        55 => "大毛毛雨",
        56 => "小冻雨",
        57 => "大冻雨",
        61 => "小雨",
        63 => "中雨",
        65 => "大雨",
        66 => "小冻雨",
        67 => "大冻雨",
        71 => "小雪",
        73 => "中雪",
        75 => "大雪",
        77 => "雪粒",
        80 => "小阵雨",
        81 => "中阵雨",
        82 => "大阵雨",
        85 => "小阵雪",
        86 => "大阵雪",
        95 => "雷暴",
        96 => "雷暴伴有小冰雹",
        99 => "雷暴伴有大冰雹",
        _ => "未知天气",
    }
}

fn describe_en(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Sunny,
    MostlySunny,
    PartlyCloudy,
    Cloudy,
    Fog,
    Rain,
    Snow,
    Showers,
    SnowShowers,
    Thunderstorm,
    Thermometer,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Sunny => "sunny",
            Icon::MostlySunny => "mostly_sunny",
            Icon::PartlyCloudy => "partly_cloudy",
            Icon::Cloudy => "cloudy",
            Icon::Fog => "fog",
            Icon::Rain => "rain",
            Icon::Snow => "snow",
            Icon::Showers => "showers",
            Icon::SnowShowers => "snow_showers",
            Icon::Thunderstorm => "thunderstorm",
            Icon::Thermometer => "thermometer",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Sunny => "☀️",
            Icon::MostlySunny => "🌤️",
            Icon::PartlyCloudy => "⛅",
            Icon::Cloudy => "☁️",
            Icon::Fog => "🌫️",
            Icon::Rain => "🌧️",
            Icon::Snow => "❄️",
            Icon::Showers => "🌦️",
            Icon::SnowShowers => "🌨️",
            Icon::Thunderstorm => "⛈️",
            Icon::Thermometer => "🌡️",
        }
    }
}

pub fn icon_for(code: i32) -> Icon {
    match code {
        0 => Icon::Sunny,
        1 => Icon::MostlySunny,
        2 => Icon::PartlyCloudy,
        3 => Icon::Cloudy,
        45..=48 => Icon::Fog,
        51..=57 | 61..=67 => Icon::Rain,
        71..=77 => Icon::Snow,
        80..=82 => Icon::Showers,
        85..=86 => Icon::SnowShowers,
        95.. => Icon::Thunderstorm,
        _ => Icon::Thermometer,
    }
}

/// Background theme for the display card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Sunny,
    PartlyCloudy,
    Overcast,
    Fog,
    Rain,
    Snow,
    Storm,
    Default,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Sunny => "sunny",
            Theme::PartlyCloudy => "partly_cloudy",
            Theme::Overcast => "overcast",
            Theme::Fog => "fog",
            Theme::Rain => "rain",
            Theme::Snow => "snow",
            Theme::Storm => "storm",
            Theme::Default => "default",
        }
    }
}

// Rain and snow span the gaps between their sub-ranges (58..=60 is rain),
// unlike the icon table.
pub fn background_for(code: i32) -> Theme {
    match code {
        0 => Theme::Sunny,
        1..=2 => Theme::PartlyCloudy,
        3 => Theme::Overcast,
        45..=48 => Theme::Fog,
        51..=67 | 80..=82 => Theme::Rain,
        71..=77 | 85..=86 => Theme::Snow,
        95.. => Theme::Storm,
        _ => Theme::Default,
    }
}
