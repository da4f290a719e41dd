use serde::{Deserialize, Serialize};

/// Semantic weather category derived from a WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    ClearSky,
    PartlyCloudy,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Showers,
    Thunderstorm,
    Unknown,
}

impl Weather {
    /// Classify a WMO weather code. Codes outside the table map to [`Weather::Unknown`].
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Weather::ClearSky,
            1..=3 => Weather::PartlyCloudy,
            45 | 48 => Weather::Fog,
            51 | 53 | 55 => Weather::Drizzle,
            61 | 63 | 65 => Weather::Rain,
            71 | 73 | 75 => Weather::Snow,
            80..=82 => Weather::Showers,
            95 | 96 | 99 => Weather::Thunderstorm,
            _ => Weather::Unknown,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Weather::ClearSky => "Clear sky",
            Weather::PartlyCloudy => "Partly cloudy",
            Weather::Fog => "Fog",
            Weather::Drizzle => "Drizzle",
            Weather::Rain => "Rain",
            Weather::Snow => "Snow",
            Weather::Showers => "Showers",
            Weather::Thunderstorm => "Thunderstorm",
            Weather::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Weather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}
