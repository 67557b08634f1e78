//! # butler-weather
//!
//! Weather data for Butler: the WeatherAPI.com provider, clothing advice,
//! and the user-facing weather message.

pub mod clothing;
pub mod format;
pub mod weatherapi;

pub use format::{weather_message, FETCH_FAILED};
pub use weatherapi::WeatherApiProvider;
