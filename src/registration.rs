//! Publishes command descriptors to Discord.
//!
//! Registration uses replace-all semantics: the platform drops any
//! previously published command that is not part of the submitted set, so
//! one call keeps the deployed surface in sync with the registry.

use anyhow::Result;
use log::info;
use serenity::model::application::command::Command;
use serenity::model::id::GuildId;
use serenity::prelude::Context;

use crate::registry::CommandRegistry;

/// Publishes every registered descriptor to the configured deployment
/// scope: a single guild when one is set, globally otherwise.
pub async fn publish(
    ctx: &Context,
    registry: &CommandRegistry,
    guild_id: Option<GuildId>,
) -> Result<()> {
    match guild_id {
        Some(guild_id) => publish_guild(ctx, registry, guild_id).await,
        None => publish_global(ctx, registry).await,
    }
}

/// Publishes every registered descriptor globally. Global commands can
/// take up to an hour to propagate.
pub async fn publish_global(ctx: &Context, registry: &CommandRegistry) -> Result<()> {
    let descriptors = registry.descriptors();
    let count = descriptors.len();

    Command::set_global_application_commands(&ctx.http, |commands| {
        for descriptor in descriptors {
            commands.add_application_command(descriptor);
        }
        commands
    })
    .await?;

    info!("Published {} slash commands globally", count);
    Ok(())
}

/// Publishes every registered descriptor to a single guild, which
/// propagates immediately.
pub async fn publish_guild(
    ctx: &Context,
    registry: &CommandRegistry,
    guild_id: GuildId,
) -> Result<()> {
    let descriptors = registry.descriptors();
    let count = descriptors.len();

    guild_id
        .set_application_commands(&ctx.http, |commands| {
            for descriptor in descriptors {
                commands.add_application_command(descriptor);
            }
            commands
        })
        .await?;

    info!("Published {} slash commands to guild {}", count, guild_id);
    Ok(())
}
