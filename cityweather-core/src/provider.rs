use crate::{
    Config, QueryError, WeatherSnapshot, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// A source of current weather conditions.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions for `city`. Exactly one outbound request.
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, QueryError>;
}

/// Construct the provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    provider_from_config_with(config, |name| std::env::var(name).ok())
}

/// Like [`provider_from_config`], with an explicit environment lookup.
pub fn provider_from_config_with<F>(
    config: &Config,
    env: F,
) -> anyhow::Result<Arc<dyn WeatherProvider>>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = config.resolve_with(env)?;
    Ok(Arc::new(OpenWeatherProvider::new(&settings)?))
}
