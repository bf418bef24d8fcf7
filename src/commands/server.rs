//! `/server` — basic information about the invoking guild.

use anyhow::Result;
use serenity::async_trait;
use serenity::builder::CreateApplicationCommand;

use crate::interaction::{Invocation, Reply};
use crate::registry::SlashCommand;

pub struct ServerCommand;

#[async_trait]
impl SlashCommand for ServerCommand {
    fn name(&self) -> &str {
        "server"
    }

    fn descriptor(&self) -> CreateApplicationCommand {
        CreateApplicationCommand::default()
            .name("server")
            .description("Provides basic information about the server")
            .to_owned()
    }

    async fn run(&self, invocation: &Invocation<'_>) -> Result<()> {
        match &invocation.guild {
            Some(guild) => {
                invocation
                    .sink
                    .reply(
                        Reply::Text(format!(
                            "This server is {} and has {} members.",
                            guild.name, guild.member_count
                        )),
                        false,
                    )
                    .await?;
            }
            None => {
                invocation
                    .sink
                    .reply(
                        Reply::text("This command can only be used in a server."),
                        true,
                    )
                    .await?;
            }
        }
        Ok(())
    }
}
