use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{
    Config, WeatherForecast, network::NetworkResult, provider::open_meteo::OpenMeteoRepository,
};

pub mod open_meteo;

/// Source of domain forecasts. Every failure is returned as data, never as an error.
#[async_trait]
pub trait WeatherRepository: Send + Sync + Debug {
    async fn get_weather_data(&self, latitude: f64, longitude: f64)
    -> NetworkResult<WeatherForecast>;
}

/// Construct the forecast repository described by `config`.
pub fn repository_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherRepository>> {
    let base_url = config.base_url.trim_end_matches('/');
    if base_url.is_empty() {
        return Err(anyhow::anyhow!(
            "No forecast API base URL configured.\n\
             Hint: remove `base_url` from the config file to use the Open-Meteo default."
        ));
    }

    Ok(Arc::new(OpenMeteoRepository::new(base_url)))
}
