//! Clothing advice derived from current conditions.

use butler_core::weather::WeatherReport;

/// Feels-like thresholds (°C), warmest first, with the advice for each band.
const TEMPERATURE_BANDS: &[(f64, &str)] = &[
    (25.0, "👕 T-shirt"),
    (18.0, "👕 T-shirt and a light shirt"),
    (15.0, "👔 light sweater"),
    (10.0, "🧥 warm hoodie or sweater"),
    (5.0, "🧥 spring jacket"),
    (-5.0, "🧥 transitional jacket"),
];

const BELOW_ALL_BANDS: &str = "🧥 winter jacket";

const STRONG_WIND_KPH: f64 = 20.0;
const LIGHT_WIND_KPH: f64 = 10.0;

const RAIN_KEYWORDS: &[&str] = &[
    "rain", "shower", "drizzle", "дождь", "ливень", "морось", "дождливо",
];
const SNOW_KEYWORDS: &[&str] = &[
    "snow", "blizzard", "sleet", "снег", "метель", "вьюга", "снежно",
];

/// Clothing items for the given conditions, base layer first.
pub fn recommend(report: &WeatherReport) -> Vec<&'static str> {
    let mut items = Vec::with_capacity(3);

    let base = TEMPERATURE_BANDS
        .iter()
        .find(|(min, _)| report.feels_like_c >= *min)
        .map(|(_, item)| *item)
        .unwrap_or(BELOW_ALL_BANDS);
    items.push(base);

    if report.wind_kph > STRONG_WIND_KPH {
        items.push("🌪️ something windproof (strong wind)");
    } else if report.wind_kph > LIGHT_WIND_KPH {
        items.push("🌪️ light wind protection");
    }

    let condition = report.condition.to_lowercase();
    if RAIN_KEYWORDS.iter().any(|k| condition.contains(k)) {
        items.push("☂️ umbrella or raincoat");
    } else if SNOW_KEYWORDS.iter().any(|k| condition.contains(k)) {
        items.push("❄️ warm winter clothes with a hood");
    }

    items
}
