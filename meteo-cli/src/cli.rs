use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use tracing::debug;

use meteo_core::{Config, Location, WeatherController, WeatherUiState, repository_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Open-Meteo forecast CLI")]
pub struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the default location.
    Configure,

    /// Print the path of the config file.
    ConfigPath,

    /// Show the forecast for the default location or the given coordinates.
    Show {
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Number of hourly entries to print.
        #[arg(long, default_value_t = 12)]
        hours: usize,

        /// Print the forecast as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
            Command::Show {
                lat,
                lon,
                hours,
                json,
            } => {
                let config = Config::load()?;
                let location = match (lat, lon) {
                    (Some(latitude), Some(longitude)) => {
                        let name = format!("{latitude}, {longitude}");
                        let location = Location {
                            name,
                            latitude,
                            longitude,
                        };
                        location.validate()?;
                        location
                    }
                    _ => config.default_location.clone(),
                };
                show(&config, &location, hours, json).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let current = config.default_location.clone();

    let name = Text::new("Location name:")
        .with_default(&current.name)
        .prompt()
        .context("Failed to read location name")?;

    let latitude = CustomType::<f64>::new("Latitude:")
        .with_default(current.latitude)
        .with_error_message("Please enter a decimal latitude, e.g. 35.6892")
        .prompt()
        .context("Failed to read latitude")?;

    let longitude = CustomType::<f64>::new("Longitude:")
        .with_default(current.longitude)
        .with_error_message("Please enter a decimal longitude, e.g. 139.6917")
        .prompt()
        .context("Failed to read longitude")?;

    config.set_default_location(Location {
        name,
        latitude,
        longitude,
    })?;
    config.save()?;

    println!(
        "Saved default location to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

/// Composition root: repository and controller are built here and the state
/// stream is rendered until the initial fetch settles.
async fn show(
    config: &Config,
    location: &Location,
    hours: usize,
    json: bool,
) -> anyhow::Result<()> {
    debug!(?location, base_url = %config.base_url, "showing forecast");
    let repository = repository_from_config(config)?;
    let controller =
        WeatherController::with_initial_location(repository, location.latitude, location.longitude);
    let mut states = controller.subscribe();

    let state: WeatherUiState = loop {
        let state = states.borrow_and_update().clone();
        if state.is_settled() {
            break state;
        }
        if state.is_loading && !json {
            render::loading(location);
        }
        states
            .changed()
            .await
            .context("Forecast state stream closed unexpectedly")?;
    };

    match (state.forecast, state.error) {
        (_, Some(error)) => Err(anyhow!(
            "Failed to fetch forecast for {}: {error}",
            location.name
        )),
        (Some(forecast), None) if json => {
            println!("{}", serde_json::to_string_pretty(&forecast)?);
            Ok(())
        }
        (Some(forecast), None) => {
            render::forecast(location, &forecast, hours);
            Ok(())
        }
        (None, None) => Err(anyhow!("Forecast fetch finished without data")),
    }
}
