//! `/ping` — replies with pong and the observed round-trip latency.

use std::time::Instant;

use anyhow::Result;
use serenity::async_trait;
use serenity::builder::CreateApplicationCommand;

use crate::interaction::{Invocation, Reply};
use crate::registry::SlashCommand;

pub struct PingCommand;

#[async_trait]
impl SlashCommand for PingCommand {
    fn name(&self) -> &str {
        "ping"
    }

    fn descriptor(&self) -> CreateApplicationCommand {
        CreateApplicationCommand::default()
            .name("ping")
            .description("Replies with Pong and latency information")
            .to_owned()
    }

    async fn run(&self, invocation: &Invocation<'_>) -> Result<()> {
        let started = Instant::now();
        invocation.sink.reply(Reply::text("Pinging..."), false).await?;
        let latency = started.elapsed().as_millis();
        invocation
            .sink
            .edit(Reply::Text(format!("Pong! | Latency: {}ms", latency)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::testing::{invocation, RecordingSink, SentKind};

    #[tokio::test]
    async fn replies_then_edits_in_the_latency() {
        let sink = RecordingSink::new();

        PingCommand.run(&invocation(&sink)).await.unwrap();

        let sent = sink.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].kind, SentKind::Reply);
        assert_eq!(sent[0].reply, Some(Reply::text("Pinging...")));
        assert_eq!(sent[1].kind, SentKind::Edit);
        match &sent[1].reply {
            Some(Reply::Text(text)) => {
                assert!(text.starts_with("Pong! | Latency: "));
                assert!(text.ends_with("ms"));
            }
            other => panic!("expected an edited text reply, got {:?}", other),
        }
    }
}
