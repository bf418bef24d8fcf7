//! Weather adapter for WeatherAPI.com.
//!
//! Converts the provider's `current.json` response into a normalized
//! display payload. Every failure mode comes back as a user-facing
//! message; nothing raw crosses the adapter boundary.

use anyhow::Result;
use log::{debug, error};
use serde::Deserialize;

use crate::interaction::{DisplayPayload, PayloadField, Reply};

const CURRENT_WEATHER_URL: &str = "http://api.weatherapi.com/v1/current.json";

/// Embed accent for daytime conditions (gold).
const DAY_COLOR: u32 = 0xFFD700;
/// Embed accent for nighttime conditions (steel blue).
const NIGHT_COLOR: u32 = 0x4682B4;

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    location: Location,
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Location {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
    is_day: i64,
    condition: Condition,
    humidity: i64,
    wind_kph: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
    icon: String,
}

#[derive(Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    api_key: String,
}

impl WeatherClient {
    pub fn new(api_key: String) -> Self {
        WeatherClient {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    /// Fetches current conditions for `city`.
    pub async fn fetch_current(&self, city: &str) -> Reply {
        match self.request(city).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Weather lookup for '{}' failed: {:#}", city, e);
                Reply::text(
                    "An error occurred while fetching the weather data. Please try again later.",
                )
            }
        }
    }

    async fn request(&self, city: &str) -> Result<Reply> {
        debug!("Requesting current weather for '{}'", city);
        let response = self
            .client
            .get(CURRENT_WEATHER_URL)
            .query(&[("key", self.api_key.as_str()), ("q", city), ("aqi", "no")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Ok(Reply::Text(error_message(city, status.as_u16(), &body)));
        }

        let weather: WeatherResponse = serde_json::from_str(&body)?;
        Ok(Reply::Embed(render(&weather)))
    }
}

/// Builds the user-facing message for a non-success provider response,
/// preferring the provider-supplied error text when present.
fn error_message(city: &str, status: u16, body: &str) -> String {
    let provider_text = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/current/condition/text")
                .and_then(|text| text.as_str())
                .map(str::to_string)
        });
    let reason = provider_text.unwrap_or_else(|| format!("Error: {} - Unknown error", status));
    format!("Failed to get weather data for \"{}\": {}", city, reason)
}

/// Maps a successful provider response into the normalized display payload.
fn render(weather: &WeatherResponse) -> DisplayPayload {
    let current = &weather.current;
    let color = if current.is_day == 1 {
        DAY_COLOR
    } else {
        NIGHT_COLOR
    };

    DisplayPayload {
        title: format!("Current Weather in {}", weather.location.name),
        description: Some(format!("**{}**", current.condition.text)),
        // WeatherAPI returns protocol-relative icon URLs
        thumbnail: Some(format!("https:{}", current.condition.icon)),
        color,
        fields: vec![
            PayloadField::inline("Temperature", format!("{}°C", current.temp_c)),
            PayloadField::inline("Humidity", format!("{}%", current.humidity)),
            PayloadField::inline("Wind", format!("{} kph", current.wind_kph)),
        ],
        footer: Some("Powered by WeatherAPI.com".to_string()),
        timestamped: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(is_day: i64) -> WeatherResponse {
        serde_json::from_str(&format!(
            r#"{{
                "location": {{"name": "Lipa"}},
                "current": {{
                    "temp_c": 28.5,
                    "is_day": {},
                    "condition": {{
                        "text": "Partly cloudy",
                        "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png"
                    }},
                    "humidity": 74,
                    "wind_kph": 11.2
                }}
            }}"#,
            is_day
        ))
        .unwrap()
    }

    #[test]
    fn daytime_uses_day_color() {
        let payload = render(&sample(1));
        assert_eq!(payload.color, DAY_COLOR);
    }

    #[test]
    fn nighttime_uses_night_color() {
        let payload = render(&sample(0));
        assert_eq!(payload.color, NIGHT_COLOR);
    }

    #[test]
    fn payload_carries_normalized_fields() {
        let payload = render(&sample(1));
        assert_eq!(payload.title, "Current Weather in Lipa");
        assert_eq!(payload.description.as_deref(), Some("**Partly cloudy**"));
        assert_eq!(
            payload.thumbnail.as_deref(),
            Some("https://cdn.weatherapi.com/weather/64x64/day/116.png")
        );
        assert_eq!(payload.fields.len(), 3);
        assert_eq!(payload.fields[0].value, "28.5°C");
        assert_eq!(payload.fields[1].value, "74%");
        assert_eq!(payload.fields[2].value, "11.2 kph");
    }

    #[test]
    fn provider_error_text_is_extracted() {
        let body = r#"{"current": {"condition": {"text": "No matching location"}}}"#;
        let message = error_message("Atlantis", 400, body);
        assert!(message.contains("No matching location"));
        assert!(message.contains("Atlantis"));
    }

    #[test]
    fn unparseable_error_body_falls_back_to_status() {
        let message = error_message("Lipa", 500, "not json");
        assert_eq!(
            message,
            "Failed to get weather data for \"Lipa\": Error: 500 - Unknown error"
        );
    }
}
