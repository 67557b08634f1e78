//! User-facing weather message.

use crate::clothing;
use butler_core::weather::WeatherReport;

/// Shown when the provider could not be reached or returned garbage.
pub const FETCH_FAILED: &str = "❌ Could not fetch weather data";

/// Render current conditions plus clothing advice (Markdown).
pub fn weather_message(report: &WeatherReport) -> String {
    let advice: Vec<String> = clothing::recommend(report)
        .into_iter()
        .map(|item| format!("• {item}"))
        .collect();

    format!(
        "🌤️ *Weather in {location}*\n\n\
         🌡️ *Temperature:* {temp}°C (feels like {feels}°C)\n\
         ☁️ *Conditions:* {condition}\n\
         💨 *Wind:* {wind} km/h, {dir}\n\n\
         👔 *What to wear:*\n{advice}\n",
        location = report.location,
        temp = report.temp_c,
        feels = report.feels_like_c,
        condition = report.condition,
        wind = report.wind_kph,
        dir = report.wind_dir,
        advice = advice.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_message_contents() {
        let report = WeatherReport {
            location: "Nizhny Novgorod".into(),
            temp_c: 12.5,
            feels_like_c: 11.0,
            condition: "Light drizzle".into(),
            wind_kph: 14.4,
            wind_dir: "SW".into(),
        };
        let msg = weather_message(&report);
        assert!(msg.contains("*Weather in Nizhny Novgorod*"));
        assert!(msg.contains("12.5°C (feels like 11°C)"));
        assert!(msg.contains("14.4 km/h, SW"));
        assert!(msg.contains("• 🧥 warm hoodie or sweater"));
        assert!(msg.contains("• 🌪️ light wind protection"));
        assert!(msg.contains("• ☂️ umbrella or raincoat"));
    }
}
