use serde::{Deserialize, Serialize};

/// Current conditions at the configured location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Location name as reported by the provider.
    pub location: String,
    pub temp_c: f64,
    pub feels_like_c: f64,
    /// Free-text condition, in the provider's configured language.
    pub condition: String,
    /// Wind speed in the provider's unit (km/h for WeatherAPI).
    pub wind_kph: f64,
    /// Compass direction, e.g. "NW".
    pub wind_dir: String,
}
