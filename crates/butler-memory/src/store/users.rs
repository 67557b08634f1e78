//! User upsert and weather notification settings.

use super::Store;
use crate::models::{WeatherRecipient, WeatherSettings};
use butler_core::error::ButlerError;

impl Store {
    /// Insert the user if unknown; refresh names if known.
    ///
    /// Never touches weather settings, and keeps a stored name when the new one is absent.
    pub async fn upsert_user(
        &self,
        user_id: &str,
        display_name: Option<&str>,
        username: Option<&str>,
    ) -> Result<(), ButlerError> {
        sqlx::query(
            "INSERT INTO users (user_id, display_name, username) VALUES (?, ?, ?) \
             ON CONFLICT(user_id) DO UPDATE SET \
                 display_name = COALESCE(excluded.display_name, users.display_name), \
                 username = COALESCE(excluded.username, users.username)",
        )
        .bind(user_id)
        .bind(display_name)
        .bind(username)
        .execute(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("upsert user failed: {e}")))?;
        Ok(())
    }

    /// Weather settings for a user; defaults for unknown users.
    pub async fn get_weather_settings(&self, user_id: &str) -> Result<WeatherSettings, ButlerError> {
        let row: Option<(bool, String)> = sqlx::query_as(
            "SELECT weather_notifications, weather_time FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("get weather settings failed: {e}")))?;

        Ok(row
            .map(|(enabled, time)| WeatherSettings { enabled, time })
            .unwrap_or_default())
    }

    /// Set the preferred weather time (`HH:MM`). Returns `false` for unknown users.
    pub async fn set_weather_time(&self, user_id: &str, time: &str) -> Result<bool, ButlerError> {
        let result = sqlx::query("UPDATE users SET weather_time = ? WHERE user_id = ?")
            .bind(time)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| ButlerError::Storage(format!("set weather time failed: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip the weather flag and return the new value.
    ///
    /// An unknown user counts as previously enabled, so the first toggle turns it off
    /// (and creates the row).
    pub async fn toggle_weather_notifications(&self, user_id: &str) -> Result<bool, ButlerError> {
        let (enabled,): (bool,) = sqlx::query_as(
            "INSERT INTO users (user_id, weather_notifications) VALUES (?, 0) \
             ON CONFLICT(user_id) DO UPDATE SET \
                 weather_notifications = NOT users.weather_notifications \
             RETURNING weather_notifications",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("toggle weather failed: {e}")))?;
        Ok(enabled)
    }

    /// Users with weather enabled whose preferred time is exactly `time` (`HH:MM`).
    pub async fn users_for_weather_time(
        &self,
        time: &str,
    ) -> Result<Vec<WeatherRecipient>, ButlerError> {
        let rows: Vec<(String, Option<String>)> = sqlx::query_as(
            "SELECT user_id, display_name FROM users \
             WHERE weather_notifications = 1 AND weather_time = ? \
             ORDER BY user_id",
        )
        .bind(time)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ButlerError::Storage(format!("weather recipients failed: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(user_id, display_name)| WeatherRecipient {
                user_id,
                display_name,
            })
            .collect())
    }
}
