//! `/weather` — current conditions for a city, gated to the configured
//! weather channel.

use anyhow::Result;
use serenity::async_trait;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

use crate::config::Config;
use crate::interaction::{Invocation, Reply};
use crate::registry::SlashCommand;
use crate::weather::WeatherClient;

pub struct WeatherCommand {
    client: Option<WeatherClient>,
    gated_channel: String,
    default_location: String,
}

impl WeatherCommand {
    pub fn new(config: &Config) -> Self {
        WeatherCommand {
            client: config.weather_api_key.clone().map(WeatherClient::new),
            gated_channel: config.weather_channel.clone(),
            default_location: config.default_location.clone(),
        }
    }
}

#[async_trait]
impl SlashCommand for WeatherCommand {
    fn name(&self) -> &str {
        "weather"
    }

    fn descriptor(&self) -> CreateApplicationCommand {
        CreateApplicationCommand::default()
            .name("weather")
            .description("Gets the current weather for a specified city or the default city")
            .create_option(|option| {
                option
                    .name("city")
                    .description("The city to get weather for (e.g. \"Lipa\", \"Tokyo\", \"New York\")")
                    .kind(CommandOptionType::String)
                    .required(false)
            })
            .to_owned()
    }

    async fn run(&self, invocation: &Invocation<'_>) -> Result<()> {
        // Channel gating comes before anything else; the redirect must be
        // the only response, and the adapter must not be touched.
        if let Some(channel) = &invocation.channel_name {
            if channel != &self.gated_channel {
                let redirect = format!(
                    "Please use the `/weather` command in the {} channel.",
                    invocation.mention_channel(&self.gated_channel)
                );
                invocation.sink.reply(Reply::Text(redirect), true).await?;
                return Ok(());
            }
        }

        let client = match &self.client {
            Some(client) => client,
            None => {
                invocation
                    .sink
                    .reply(
                        Reply::text(
                            "The bot is not configured with a WeatherAPI key. \
                             Please contact an administrator.",
                        ),
                        false,
                    )
                    .await?;
                return Ok(());
            }
        };

        // The provider call can take a while; acknowledge now, edit later.
        invocation.sink.defer().await?;

        let city = invocation
            .option("city")
            .unwrap_or(self.default_location.as_str());
        let outcome = client.fetch_current(city).await;
        invocation.sink.edit(outcome).await?;
        Ok(())
    }
}
