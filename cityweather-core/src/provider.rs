use crate::{Config, Location, WeatherRecord, provider::openmeteo::OpenMeteoProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openmeteo;

/// Source of current conditions for a location.
///
/// One call issues exactly one upstream request. Implementations never return
/// a partially filled record.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, location: &Location) -> anyhow::Result<WeatherRecord>;
}

/// Construct the provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let base_url = config.base_url.trim();
    if base_url.is_empty() {
        return Err(anyhow::anyhow!(
            "No base URL configured for the weather provider.\n\
             Hint: run `cityweather configure` or remove `base_url` from the config file."
        ));
    }

    let provider = OpenMeteoProvider::with_base_url(base_url, config.language);
    Ok(Box::new(provider))
}
