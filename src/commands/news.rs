//! `/news` — latest top technology headlines, gated to the configured
//! news channel.

use anyhow::Result;
use serenity::async_trait;
use serenity::builder::CreateApplicationCommand;

use crate::config::Config;
use crate::interaction::{Invocation, Reply};
use crate::news::NewsClient;
use crate::registry::SlashCommand;

pub struct NewsCommand {
    client: Option<NewsClient>,
    gated_channel: String,
}

impl NewsCommand {
    pub fn new(config: &Config) -> Self {
        NewsCommand {
            client: config.news_api_key.clone().map(NewsClient::new),
            gated_channel: config.news_channel.clone(),
        }
    }
}

#[async_trait]
impl SlashCommand for NewsCommand {
    fn name(&self) -> &str {
        "news"
    }

    fn descriptor(&self) -> CreateApplicationCommand {
        CreateApplicationCommand::default()
            .name("news")
            .description("Fetches the latest top technology news headlines")
            .to_owned()
    }

    async fn run(&self, invocation: &Invocation<'_>) -> Result<()> {
        if let Some(channel) = &invocation.channel_name {
            if channel != &self.gated_channel {
                let redirect = format!(
                    "Please use the `/news` command in the {} channel.",
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
                            "The bot is not configured with a NewsAPI key. \
                             Please contact an administrator.",
                        ),
                        false,
                    )
                    .await?;
                return Ok(());
            }
        };

        invocation.sink.defer().await?;
        let outcome = client.fetch_top().await;
        invocation.sink.edit(outcome).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::testing::{invocation, RecordingSink, SentKind};

    fn command(api_key: Option<&str>) -> NewsCommand {
        NewsCommand {
            client: api_key.map(|key| NewsClient::new(key.to_string())),
            gated_channel: "news".to_string(),
        }
    }

    #[tokio::test]
    async fn wrong_channel_gets_an_ephemeral_redirect() {
        let sink = RecordingSink::new();
        let mut invocation = invocation(&sink);
        invocation.channel_name = Some("general".to_string());

        command(Some("key")).run(&invocation).await.unwrap();

        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, SentKind::Reply);
        assert!(sent[0].ephemeral);
        assert_eq!(
            sent[0].reply,
            Some(Reply::text(
                "Please use the `/news` command in the #news channel."
            ))
        );
    }

    #[tokio::test]
    async fn missing_api_key_yields_configuration_notice() {
        let sink = RecordingSink::new();
        let mut invocation = invocation(&sink);
        invocation.channel_name = Some("news".to_string());

        command(None).run(&invocation).await.unwrap();

        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        match &sent[0].reply {
            Some(Reply::Text(text)) => {
                assert!(text.contains("not configured with a NewsAPI key"));
            }
            other => panic!("expected a text reply, got {:?}", other),
        }
    }
}
