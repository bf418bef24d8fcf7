use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Process configuration, read once from the environment at startup.
///
/// Only the bot token is required. Missing provider secrets degrade the
/// affected command to a "not configured" notice instead of failing
/// startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discord_token: String,
    pub application_id: Option<u64>,
    /// Deployment scope: publish commands to this guild only when set,
    /// globally otherwise.
    pub guild_id: Option<u64>,
    pub weather_api_key: Option<String>,
    pub news_api_key: Option<String>,
    pub weather_channel: String,
    pub news_channel: String,
    pub default_location: String,
    pub bot_status: String,
    pub activity_type: String,
    pub activity_name: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            discord_token: env::var("DISCORD_BOT_TOKEN")
                .map_err(|_| anyhow::anyhow!("DISCORD_BOT_TOKEN environment variable not set"))?,
            application_id: parse_id("CLIENT_ID")?,
            guild_id: parse_id("GUILD_ID")?,
            weather_api_key: env::var("WEATHER_API_KEY").ok().filter(|key| !key.is_empty()),
            news_api_key: env::var("NEWS_API_KEY").ok().filter(|key| !key.is_empty()),
            // Discord channel names are lowercase; normalize once here so
            // gating compares like for like.
            weather_channel: env::var("WEATHER_CHANNEL_NAME")
                .unwrap_or_else(|_| "weather".to_string())
                .to_lowercase(),
            news_channel: env::var("NEWS_CHANNEL_NAME")
                .unwrap_or_else(|_| "news".to_string())
                .to_lowercase(),
            default_location: env::var("DEFAULT_LOCATION").unwrap_or_else(|_| "Lipa".to_string()),
            bot_status: env::var("BOT_STATUS").unwrap_or_else(|_| "online".to_string()),
            activity_type: env::var("ACTIVITY_TYPE").unwrap_or_else(|_| "PLAYING".to_string()),
            activity_name: env::var("ACTIVITY_NAME").unwrap_or_else(|_| "discord".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn parse_id(key: &str) -> Result<Option<u64>> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} must be a numeric Discord id", key)),
        Err(_) => Ok(None),
    }
}
