//! Open-Meteo DTO to domain model conversion.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::model::{CurrentWeather, DailyWeather, HourlyWeather, Weather, WeatherForecast};

use super::{CurrentData, DailyData, HourlyData, OpenMeteoResponse};

/// The response was structurally present but broke the data contract.
#[derive(Debug, Error, PartialEq)]
pub enum MappingError {
    #[error("invalid {field} timestamp '{value}'")]
    Timestamp { field: &'static str, value: String },

    #[error("{section}.{field} has {actual} entries, expected at least {expected}")]
    MisalignedSeries {
        section: &'static str,
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Map a raw response to a [`WeatherForecast`].
///
/// Returns `Ok(None)` if `current`, `hourly` or `daily` is missing; no partial
/// forecast is built. Records are produced for every index of each section's
/// `time` array.
pub fn to_domain(raw: &OpenMeteoResponse) -> Result<Option<WeatherForecast>, MappingError> {
    let (Some(current), Some(hourly), Some(daily)) =
        (&raw.current_data, &raw.hourly_data, &raw.daily_data)
    else {
        return Ok(None);
    };

    Ok(Some(WeatherForecast {
        current_weather: current_weather(current),
        hourly_forecast: hourly_forecast(hourly)?,
        weekly_forecast: weekly_forecast(daily)?,
    }))
}

fn current_weather(current: &CurrentData) -> CurrentWeather {
    CurrentWeather {
        temperature: current.temperature,
        weather: Weather::from_wmo_code(current.weather_code),
    }
}

fn hourly_forecast(hourly: &HourlyData) -> Result<Vec<HourlyWeather>, MappingError> {
    let len = hourly.time.len();
    ensure_len("hourly", "temperature_2m", len, hourly.temperature.len())?;
    ensure_len("hourly", "weather_code", len, hourly.weather_code.len())?;
    ensure_len(
        "hourly",
        "precipitation_probability",
        len,
        hourly.precipitation_probability.len(),
    )?;

    (0..len)
        .map(|i| {
            Ok(HourlyWeather {
                time: parse_date_time("hourly.time", &hourly.time[i])?,
                temperature: hourly.temperature[i],
                precipitation_probability: hourly.precipitation_probability[i],
                weather: Weather::from_wmo_code(hourly.weather_code[i]),
            })
        })
        .collect()
}

fn weekly_forecast(daily: &DailyData) -> Result<Vec<DailyWeather>, MappingError> {
    let len = daily.time.len();
    ensure_len("daily", "weather_code", len, daily.weather_code.len())?;
    ensure_len(
        "daily",
        "temperature_2m_max",
        len,
        daily.temperature_max.len(),
    )?;
    ensure_len(
        "daily",
        "temperature_2m_min",
        len,
        daily.temperature_min.len(),
    )?;
    ensure_len("daily", "sunrise", len, daily.sunrise.len())?;
    ensure_len("daily", "sunset", len, daily.sunset.len())?;

    (0..len)
        .map(|i| {
            Ok(DailyWeather {
                date: parse_date("daily.time", &daily.time[i])?,
                max_temperature: daily.temperature_max[i],
                min_temperature: daily.temperature_min[i],
                weather: Weather::from_wmo_code(daily.weather_code[i]),
                sunrise: parse_date_time("daily.sunrise", &daily.sunrise[i])?,
                sunset: parse_date_time("daily.sunset", &daily.sunset[i])?,
            })
        })
        .collect()
}

// Extra trailing entries are ignored; only missing ones are an error.
fn ensure_len(
    section: &'static str,
    field: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), MappingError> {
    if actual < expected {
        return Err(MappingError::MisalignedSeries {
            section,
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Local date-time without offset, e.g. `2025-06-01T13:00`. Seconds are accepted.
fn parse_date_time(field: &'static str, value: &str) -> Result<NaiveDateTime, MappingError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| MappingError::Timestamp {
            field,
            value: value.to_string(),
        })
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, MappingError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| MappingError::Timestamp {
            field,
            value: value.to_string(),
        })
}
