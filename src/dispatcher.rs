//! Routes interaction events to command handlers and contains their
//! failures so one bad command cannot take the process down.

use log::{error, info, warn};

use crate::interaction::{Invocation, Reply};
use crate::registry::CommandRegistry;

/// Generic notice shown to the user when a handler fails.
const FAILURE_NOTICE: &str = "There was an error while executing this command.";

pub struct Dispatcher {
    registry: CommandRegistry,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Dispatcher { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Dispatches one command invocation.
    ///
    /// Unknown names are logged and ignored; there is no user-facing reply
    /// for them. A handler failure is reported to the invoking user and
    /// logged, and never propagates to the caller. The failure notice goes
    /// out as a reply when nothing was acknowledged yet, and as a follow-up
    /// once the handler has already replied or deferred.
    pub async fn dispatch(&self, name: &str, invocation: &Invocation<'_>) {
        let command = match self.registry.resolve(name) {
            Some(command) => command,
            None => {
                warn!("No command matching '{}' was found", name);
                return;
            }
        };

        info!("Dispatching /{} for user {}", name, invocation.user);

        if let Err(e) = command.run(invocation).await {
            error!("Command '{}' failed: {:#}", name, e);
            let notice = Reply::text(FAILURE_NOTICE);
            // The initial reply may only be sent once per invocation.
            let report = if invocation.sink.acknowledged() {
                invocation.sink.follow_up(notice, true).await
            } else {
                invocation.sink.reply(notice, true).await
            };
            if let Err(why) = report {
                error!("Failed to report command failure to the user: {}", why);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use serenity::async_trait;
    use serenity::builder::CreateApplicationCommand;

    use super::*;
    use crate::interaction::testing::{invocation, RecordingSink, SentKind};
    use crate::registry::SlashCommand;

    enum Behavior {
        Reply,
        FailBeforeReply,
        FailAfterReply,
        FailAfterDefer,
    }

    struct ScriptedCommand {
        name: &'static str,
        behavior: Behavior,
    }

    #[async_trait]
    impl SlashCommand for ScriptedCommand {
        fn name(&self) -> &str {
            self.name
        }

        fn descriptor(&self) -> CreateApplicationCommand {
            CreateApplicationCommand::default()
                .name(self.name)
                .description("scripted")
                .to_owned()
        }

        async fn run(&self, invocation: &Invocation<'_>) -> Result<()> {
            match self.behavior {
                Behavior::Reply => {
                    invocation.sink.reply(Reply::text("done"), false).await?;
                    Ok(())
                }
                Behavior::FailBeforeReply => Err(anyhow::anyhow!("boom")),
                Behavior::FailAfterReply => {
                    invocation.sink.reply(Reply::text("partial"), false).await?;
                    Err(anyhow::anyhow!("boom after reply"))
                }
                Behavior::FailAfterDefer => {
                    invocation.sink.defer().await?;
                    Err(anyhow::anyhow!("boom after defer"))
                }
            }
        }
    }

    fn dispatcher(behavior: Behavior) -> Dispatcher {
        let registry = CommandRegistry::load(vec![Arc::new(ScriptedCommand {
            name: "scripted",
            behavior,
        }) as Arc<dyn SlashCommand>]);
        Dispatcher::new(registry)
    }

    #[tokio::test]
    async fn unknown_command_produces_no_reply() {
        let dispatcher = dispatcher(Behavior::Reply);
        let sink = RecordingSink::new();

        dispatcher.dispatch("unknown", &invocation(&sink)).await;

        assert!(sink.sent().is_empty());
    }

    #[tokio::test]
    async fn successful_handler_sends_its_own_reply_only() {
        let dispatcher = dispatcher(Behavior::Reply);
        let sink = RecordingSink::new();

        dispatcher.dispatch("scripted", &invocation(&sink)).await;

        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, SentKind::Reply);
        assert_eq!(sent[0].reply, Some(Reply::text("done")));
    }

    #[tokio::test]
    async fn failure_before_reply_produces_exactly_one_failure_reply() {
        let dispatcher = dispatcher(Behavior::FailBeforeReply);
        let sink = RecordingSink::new();

        dispatcher.dispatch("scripted", &invocation(&sink)).await;

        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, SentKind::Reply);
        assert_eq!(sent[0].reply, Some(Reply::text(FAILURE_NOTICE)));
        assert!(sent[0].ephemeral);
    }

    #[tokio::test]
    async fn failure_after_reply_is_reported_as_follow_up() {
        let dispatcher = dispatcher(Behavior::FailAfterReply);
        let sink = RecordingSink::new();

        dispatcher.dispatch("scripted", &invocation(&sink)).await;

        let sent = sink.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].kind, SentKind::Reply);
        assert_eq!(sent[1].kind, SentKind::FollowUp);
        assert_eq!(sent[1].reply, Some(Reply::text(FAILURE_NOTICE)));
    }

    #[tokio::test]
    async fn failure_after_defer_is_reported_as_follow_up() {
        let dispatcher = dispatcher(Behavior::FailAfterDefer);
        let sink = RecordingSink::new();

        dispatcher.dispatch("scripted", &invocation(&sink)).await;

        let sent = sink.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].kind, SentKind::Defer);
        assert_eq!(sent[1].kind, SentKind::FollowUp);
    }
}
