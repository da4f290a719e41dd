use chrono::NaiveDateTime;
use meteo_core::{Location, WeatherForecast};

pub fn loading(location: &Location) {
    eprintln!("Fetching forecast for {}...", location.name);
}

pub fn forecast(location: &Location, forecast: &WeatherForecast, hours: usize) {
    let current = &forecast.current_weather;
    println!(
        "{} ({:.4}, {:.4})",
        location.name, location.latitude, location.longitude
    );
    println!("  Now: {:.1}°C, {}", current.temperature, current.weather);

    if let Some(today) = forecast.today() {
        println!(
            "  Sunrise {}  Sunset {}",
            clock(&today.sunrise),
            clock(&today.sunset)
        );
    }

    if hours > 0 && !forecast.hourly_forecast.is_empty() {
        println!();
        println!("Hourly");
        for hour in forecast.hourly_forecast.iter().take(hours) {
            println!(
                "  {} {:>6.1}°C {:>4}%  {}",
                hour.time.format("%a %H:%M"),
                hour.temperature,
                hour.precipitation_probability,
                hour.weather
            );
        }
    }

    if !forecast.weekly_forecast.is_empty() {
        println!();
        println!("Daily");
        for day in &forecast.weekly_forecast {
            println!(
                "  {} {:>6.1}°C / {:>5.1}°C  {}",
                day.date.format("%a %d %b"),
                day.max_temperature,
                day.min_temperature,
                day.weather
            );
        }
    }
}

fn clock(time: &NaiveDateTime) -> String {
    time.format("%H:%M").to_string()
}
