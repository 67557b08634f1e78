//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "Butler".to_string()
}

pub fn default_data_dir() -> String {
    "~/.butler".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_timezone() -> String {
    "Europe/Moscow".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_weather_base_url() -> String {
    "https://api.weatherapi.com/v1/forecast.json".to_string()
}

/// Nizhny Novgorod.
pub fn default_weather_location() -> String {
    "56.313398,44.051441".to_string()
}

pub fn default_weather_lang() -> String {
    "en".to_string()
}

pub fn default_db_path() -> String {
    "~/.butler/data/butler.db".to_string()
}

pub fn default_poll_interval() -> u64 {
    60
}
