//! Core library for the `meteo` CLI.
//!
//! This crate defines:
//! - The forecast domain model and WMO weather-code classification
//! - One-shot HTTP execution classified into [`NetworkResult`]
//! - The Open-Meteo repository and its DTO mapping
//! - [`WeatherController`], an observable UI state container
//! - Configuration handling
//!
//! It is used by `meteo-cli`, but any other presentation layer can subscribe
//! to a [`WeatherController`] the same way.

pub mod config;
pub mod controller;
pub mod model;
pub mod network;
pub mod provider;

pub use config::{Config, Location};
pub use controller::{WeatherController, WeatherUiState};
pub use model::{CurrentWeather, DailyWeather, HourlyWeather, Weather, WeatherForecast};
pub use network::NetworkResult;
pub use provider::{WeatherRepository, open_meteo::OpenMeteoRepository, repository_from_config};
