use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info, instrument};

use crate::{
    model::WeatherForecast,
    network::{NetworkResult, safe_request},
};

use super::WeatherRepository;

pub mod mapper;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1";
pub const PARSE_FAILURE: &str = "Failed to parse weather data";

const CURRENT_FIELDS: &str = "temperature_2m,weather_code";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code,precipitation_probability";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset";

#[derive(Debug, Clone)]
pub struct OpenMeteoRepository {
    base_url: String,
    http: Client,
}

impl OpenMeteoRepository {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.base_url.trim_end_matches('/'))
    }
}

impl Default for OpenMeteoRepository {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl WeatherRepository for OpenMeteoRepository {
    #[instrument(skip_all, fields(lat = %latitude, lon = %longitude))]
    async fn get_weather_data(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> NetworkResult<WeatherForecast> {
        let request = self.http.get(self.forecast_url()).query(&[
            ("latitude", latitude.to_string().as_str()),
            ("longitude", longitude.to_string().as_str()),
            ("current", CURRENT_FIELDS),
            ("hourly", HOURLY_FIELDS),
            ("daily", DAILY_FIELDS),
            ("timezone", "auto"),
        ]);

        safe_request::<OpenMeteoResponse>(request)
            .await
            .and_then(|raw| into_forecast(&raw))
    }
}

fn into_forecast(raw: &OpenMeteoResponse) -> NetworkResult<WeatherForecast> {
    match mapper::to_domain(raw) {
        Ok(Some(forecast)) => {
            info!(
                hours = forecast.hourly_forecast.len(),
                days = forecast.weekly_forecast.len(),
                "forecast fetched"
            );
            NetworkResult::success(forecast)
        }
        Ok(None) => NetworkResult::failure(None, PARSE_FAILURE),
        Err(err) => {
            error!(error = %err, "forecast response violates the data contract");
            NetworkResult::failure(None, format!("{PARSE_FAILURE}: {err}"))
        }
    }
}

/// Raw `/v1/forecast` response. Only the sections are optional in practice; the
/// metadata is tolerated as missing because nothing downstream reads it.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenMeteoResponse {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "generationtime_ms")]
    pub generation_time_ms: Option<f64>,
    pub utc_offset_seconds: Option<i32>,
    pub timezone: Option<String>,
    pub timezone_abbreviation: Option<String>,
    pub elevation: Option<f64>,
    #[serde(rename = "current")]
    pub current_data: Option<CurrentData>,
    #[serde(rename = "hourly")]
    pub hourly_data: Option<HourlyData>,
    #[serde(rename = "daily")]
    pub daily_data: Option<DailyData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentData {
    pub time: String,
    pub interval: i32,
    #[serde(rename = "temperature_2m")]
    pub temperature: f64,
    pub weather_code: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HourlyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m")]
    pub temperature: Vec<f64>,
    pub weather_code: Vec<i32>,
    pub precipitation_probability: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyData {
    pub time: Vec<String>,
    pub weather_code: Vec<i32>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Vec<f64>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Vec<f64>,
    pub sunrise: Vec<String>,
    pub sunset: Vec<String>,
}
