//! WeatherAPI.com provider.
//!
//! Calls the forecast endpoint for a fixed location and keeps only current conditions.
//! Docs: <https://www.weatherapi.com/docs/>

use async_trait::async_trait;
use butler_core::{
    config::WeatherConfig, error::ButlerError, traits::WeatherProvider, weather::WeatherReport,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// WeatherAPI.com provider.
pub struct WeatherApiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    location: String,
    lang: String,
}

impl WeatherApiProvider {
    /// Create from config values.
    pub fn from_config(config: &WeatherConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            location: config.location.clone(),
            lang: config.lang.clone(),
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct ForecastResponse {
    pub location: ApiLocation,
    pub current: ApiCurrent,
}

#[derive(Deserialize)]
pub(crate) struct ApiLocation {
    pub name: String,
}

#[derive(Deserialize)]
pub(crate) struct ApiCurrent {
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub condition: ApiCondition,
    pub wind_kph: f64,
    pub wind_dir: String,
}

#[derive(Deserialize)]
pub(crate) struct ApiCondition {
    pub text: String,
}

impl From<ForecastResponse> for WeatherReport {
    fn from(resp: ForecastResponse) -> Self {
        Self {
            location: resp.location.name,
            temp_c: resp.current.temp_c,
            feels_like_c: resp.current.feelslike_c,
            condition: resp.current.condition.text,
            wind_kph: resp.current.wind_kph,
            wind_dir: resp.current.wind_dir,
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    fn name(&self) -> &str {
        "weatherapi"
    }

    async fn current(&self) -> Result<WeatherReport, ButlerError> {
        if self.api_key.is_empty() {
            return Err(ButlerError::Weather("weatherapi: no API key configured".into()));
        }

        debug!("weatherapi: GET {} q={}", self.base_url, self.location);

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", self.location.as_str()),
                ("lang", self.lang.as_str()),
                ("days", "1"),
            ])
            .send()
            .await
            .map_err(|e| ButlerError::Weather(format!("weatherapi request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ButlerError::Weather(format!(
                "weatherapi returned {status}: {text}"
            )));
        }

        let parsed: ForecastResponse = resp.json().await.map_err(|e| {
            ButlerError::Weather(format!("weatherapi: failed to parse response: {e}"))
        })?;

        Ok(parsed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name() {
        let p = WeatherApiProvider::from_config(&WeatherConfig::default());
        assert_eq!(p.name(), "weatherapi");
        assert_eq!(p.location, "56.313398,44.051441");
    }

    #[test]
    fn test_response_into_report() {
        let json = r#"{
            "location": {"name": "Nizhny Novgorod", "country": "Russia"},
            "current": {
                "temp_c": -3.0,
                "feelslike_c": -8.2,
                "condition": {"text": "Light snow", "code": 1213},
                "wind_kph": 18.0,
                "wind_dir": "NNW",
                "humidity": 86
            },
            "forecast": {"forecastday": []}
        }"#;
        let parsed: ForecastResponse = serde_json::from_str(json).unwrap();
        let report = WeatherReport::from(parsed);
        assert_eq!(report.location, "Nizhny Novgorod");
        assert_eq!(report.feels_like_c, -8.2);
        assert_eq!(report.condition, "Light snow");
        assert_eq!(report.wind_dir, "NNW");
    }

    #[test]
    fn test_response_missing_current_is_error() {
        let json = r#"{"location": {"name": "X"}}"#;
        assert!(serde_json::from_str::<ForecastResponse>(json).is_err());
    }

    #[tokio::test]
    async fn test_missing_key_is_weather_error() {
        let p = WeatherApiProvider::from_config(&WeatherConfig::default());
        assert!(matches!(p.current().await, Err(ButlerError::Weather(_))));
    }
}
