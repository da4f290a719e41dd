use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub mod weather;

pub use weather::Weather;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Temperature in °C.
    pub temperature: f64,
    pub weather: Weather,
}

/// One hour of forecast. `time` is local to the forecast location and carries no offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyWeather {
    pub time: NaiveDateTime,
    pub temperature: f64,
    /// Percent, 0-100.
    pub precipitation_probability: u8,
    pub weather: Weather,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub weather: Weather,
    pub sunrise: NaiveDateTime,
    pub sunset: NaiveDateTime,
}

/// Domain forecast. Hourly and daily entries are in chronological order, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub current_weather: CurrentWeather,
    pub hourly_forecast: Vec<HourlyWeather>,
    pub weekly_forecast: Vec<DailyWeather>,
}

impl WeatherForecast {
    /// The first daily entry, which Open-Meteo returns for the current local day.
    pub fn today(&self) -> Option<&DailyWeather> {
        self.weekly_forecast.first()
    }
}
