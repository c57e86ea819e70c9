use thiserror::Error;

use crate::model::Language;

/// Failure of a user-initiated lookup. Neither variant is fatal.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("city not found: {city}")]
    NotFound { city: String },

    #[error("failed to fetch weather")]
    FetchError {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl LookupError {
    pub fn fetch(err: anyhow::Error) -> Self {
        let source = err.into();
        LookupError::FetchError { source }
    }

    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            LookupError::NotFound { .. } => "not_found",
            LookupError::FetchError { .. } => "fetch_error",
        }
    }

    pub fn user_message(&self, language: Language) -> String {
        match (self, language) {
            (LookupError::NotFound { city }, Language::Zh) => format!("未找到城市: {city}"),
            (LookupError::NotFound { city }, Language::En) => format!("City not found: {city}"),
            (LookupError::FetchError { .. }, Language::Zh) => {
                "获取天气数据失败，请稍后再试".to_string()
            }
            (LookupError::FetchError { .. }, Language::En) => {
                "Failed to fetch weather data, please try again later".to_string()
            }
        }
    }
}
