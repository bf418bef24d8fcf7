use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;

use herald::commands;
use herald::config::Config;
use herald::dispatcher::Dispatcher;
use herald::interaction::{GuildInfo, InteractionSink, Invocation};
use herald::presence;
use herald::registration;
use herald::registry::CommandRegistry;

struct Handler {
    dispatcher: Arc<Dispatcher>,
    config: Arc<Config>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected and ready!", ready.user.name);
        info!("Connected to {} guilds", ready.guilds.len());

        let status = presence::parse_status(&self.config.bot_status);
        let activity =
            presence::parse_activity(&self.config.activity_type, &self.config.activity_name);
        ctx.set_presence(Some(activity), status).await;
        info!(
            "Presence set to {} / {} {}",
            self.config.bot_status, self.config.activity_type, self.config.activity_name
        );

        // A failed publish is not fatal: commands published by a prior run
        // stay active on the platform, and dispatch works either way.
        let scope = self.config.guild_id.map(GuildId);
        if let Err(e) = registration::publish(&ctx, self.dispatcher.registry(), scope).await {
            error!("Failed to publish slash commands: {:#}", e);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        // Only command invocations are dispatched; everything else on the
        // interaction stream is ignored silently.
        let command = match interaction {
            Interaction::ApplicationCommand(command) => command,
            _ => return,
        };

        let guild = command
            .guild_id
            .and_then(|id| ctx.cache.guild(id))
            .map(|guild| GuildInfo {
                name: guild.name,
                member_count: guild.member_count,
            });

        // Resolve the invoking channel's name and the ids of the gated
        // channels from the guild's channel list.
        let mut channel_name = None;
        let mut channel_directory = HashMap::new();
        if let Some(guild_id) = command.guild_id {
            match guild_id.channels(&ctx.http).await {
                Ok(channels) => {
                    for channel in channels.values() {
                        if channel.id == command.channel_id {
                            channel_name = Some(channel.name.clone());
                        }
                        if channel.name == self.config.weather_channel
                            || channel.name == self.config.news_channel
                        {
                            channel_directory.insert(channel.name.clone(), channel.id.0);
                        }
                    }
                }
                Err(e) => {
                    warn!("Could not list channels for guild {}: {}", guild_id, e);
                }
            }
        }

        let options: Vec<(String, String)> = command
            .data
            .options
            .iter()
            .filter_map(|option| {
                let value = option.value.as_ref()?.as_str()?.to_string();
                Some((option.name.clone(), value))
            })
            .collect();

        let sink = InteractionSink::new(&ctx, &command);
        let invocation = Invocation {
            user: command.user.name.clone(),
            channel_name,
            guild,
            channel_directory,
            options,
            sink: &sink,
        };

        self.dispatcher.dispatch(&command.data.name, &invocation).await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Herald Discord bot...");

    if config.weather_api_key.is_none() {
        warn!("WEATHER_API_KEY is not set; /weather will answer with a configuration notice");
    }
    if config.news_api_key.is_none() {
        warn!("NEWS_API_KEY is not set; /news will answer with a configuration notice");
    }

    let registry = CommandRegistry::load(commands::all(&config));
    info!("Loaded {} command definitions", registry.len());
    let dispatcher = Arc::new(Dispatcher::new(registry));

    let config = Arc::new(config);
    let handler = Handler {
        dispatcher,
        config: config.clone(),
    };

    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS;

    let mut builder = Client::builder(&config.discord_token, intents).event_handler(handler);
    if let Some(application_id) = config.application_id {
        builder = builder.application_id(application_id);
    }

    let mut client = builder.await.map_err(|e| {
        error!("Failed to create Discord client: {}", e);
        anyhow::anyhow!("Client creation failed: {}", e)
    })?;

    info!("Connecting to Discord gateway...");
    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {:?}", why);
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
