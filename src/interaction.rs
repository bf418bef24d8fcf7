//! Per-invocation context and reply primitives.
//!
//! An [`Invocation`] is created for one incoming command event and discarded
//! when the handler finishes. Handlers talk back to Discord only through the
//! [`ReplySink`], which keeps them independent of the live gateway and lets
//! tests record what was sent.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use serenity::async_trait;
use serenity::builder::CreateEmbed;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::Timestamp;
use serenity::prelude::Context;

/// One field of a display payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl PayloadField {
    pub fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        PayloadField {
            name: name.into(),
            value: value.into(),
            inline: true,
        }
    }

    pub fn block(name: impl Into<String>, value: impl Into<String>) -> Self {
        PayloadField {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }
}

/// Normalized display payload produced by an external-service adapter,
/// independent of Discord's embed builder.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPayload {
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub color: u32,
    pub fields: Vec<PayloadField>,
    pub footer: Option<String>,
    pub timestamped: bool,
}

/// What a handler sends back: a rendered embed or plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Embed(DisplayPayload),
    Text(String),
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Reply::Text(content.into())
    }
}

/// Outbound half of an invocation: the platform's acknowledge, defer, edit
/// and follow-up primitives. The initial reply (or a deferral) may be sent
/// at most once; implementations report that through [`acknowledged`] so the
/// dispatcher can pick the right primitive when reporting a failure.
///
/// [`acknowledged`]: ReplySink::acknowledged
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Sends the initial response.
    async fn reply(&self, reply: Reply, ephemeral: bool) -> Result<()>;

    /// Acknowledges the invocation without content, allowing a later edit.
    async fn defer(&self) -> Result<()>;

    /// Edits the deferred or already-sent initial response.
    async fn edit(&self, reply: Reply) -> Result<()>;

    /// Sends an additional message after the initial response.
    async fn follow_up(&self, reply: Reply, ephemeral: bool) -> Result<()>;

    /// True once a reply or deferral has gone out.
    fn acknowledged(&self) -> bool;
}

/// Guild the command was invoked in.
#[derive(Debug, Clone, PartialEq)]
pub struct GuildInfo {
    pub name: String,
    pub member_count: u64,
}

/// Transient per-event value handed to a command handler.
pub struct Invocation<'a> {
    /// Display name of the invoking user.
    pub user: String,
    /// Name of the channel the command was invoked in, when resolvable.
    pub channel_name: Option<String>,
    /// Guild metadata; `None` in direct messages.
    pub guild: Option<GuildInfo>,
    /// Channel ids for the configured gated channels, keyed by name.
    pub channel_directory: HashMap<String, u64>,
    /// Supplied option values, in declaration order.
    pub options: Vec<(String, String)>,
    pub sink: &'a dyn ReplySink,
}

impl<'a> Invocation<'a> {
    /// Looks up a supplied string option by name.
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(option, _)| option == name)
            .map(|(_, value)| value.as_str())
    }

    /// Mention for a gated channel, falling back to the plain `#name` form
    /// when the channel is not present in the guild.
    pub fn mention_channel(&self, name: &str) -> String {
        match self.channel_directory.get(name) {
            Some(id) => format!("<#{}>", id),
            None => format!("#{}", name),
        }
    }
}

fn build_embed(payload: &DisplayPayload) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title(&payload.title).color(payload.color);
    if let Some(description) = &payload.description {
        embed.description(description);
    }
    if let Some(thumbnail) = &payload.thumbnail {
        embed.thumbnail(thumbnail);
    }
    for field in &payload.fields {
        embed.field(&field.name, &field.value, field.inline);
    }
    if let Some(footer) = &payload.footer {
        embed.footer(|f| f.text(footer));
    }
    if payload.timestamped {
        embed.timestamp(Timestamp::now());
    }
    embed
}

/// [`ReplySink`] backed by a live application-command interaction.
pub struct InteractionSink<'a> {
    ctx: &'a Context,
    command: &'a ApplicationCommandInteraction,
    acknowledged: AtomicBool,
}

impl<'a> InteractionSink<'a> {
    pub fn new(ctx: &'a Context, command: &'a ApplicationCommandInteraction) -> Self {
        InteractionSink {
            ctx,
            command,
            acknowledged: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ReplySink for InteractionSink<'_> {
    async fn reply(&self, reply: Reply, ephemeral: bool) -> Result<()> {
        self.command
            .create_interaction_response(&self.ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        match &reply {
                            Reply::Text(text) => {
                                message.content(text);
                            }
                            Reply::Embed(payload) => {
                                message.embed(|e| {
                                    *e = build_embed(payload);
                                    e
                                });
                            }
                        }
                        message.ephemeral(ephemeral)
                    })
            })
            .await?;
        self.acknowledged.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn defer(&self) -> Result<()> {
        self.command
            .create_interaction_response(&self.ctx.http, |response| {
                response.kind(InteractionResponseType::DeferredChannelMessageWithSource)
            })
            .await?;
        self.acknowledged.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn edit(&self, reply: Reply) -> Result<()> {
        self.command
            .edit_original_interaction_response(&self.ctx.http, |response| {
                match &reply {
                    Reply::Text(text) => {
                        response.content(text);
                    }
                    Reply::Embed(payload) => {
                        response.embed(|e| {
                            *e = build_embed(payload);
                            e
                        });
                    }
                }
                response
            })
            .await?;
        Ok(())
    }

    async fn follow_up(&self, reply: Reply, ephemeral: bool) -> Result<()> {
        self.command
            .create_followup_message(&self.ctx.http, |message| {
                match &reply {
                    Reply::Text(text) => {
                        message.content(text);
                    }
                    Reply::Embed(payload) => {
                        message.embed(|e| {
                            *e = build_embed(payload);
                            e
                        });
                    }
                }
                message.ephemeral(ephemeral)
            })
            .await?;
        Ok(())
    }

    fn acknowledged(&self) -> bool {
        self.acknowledged.load(Ordering::SeqCst)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn invocation_with_directory<'a>(
        sink: &'a testing::RecordingSink,
        directory: HashMap<String, u64>,
    ) -> Invocation<'a> {
        let mut invocation = testing::invocation(sink);
        invocation.channel_directory = directory;
        invocation
    }

    #[test]
    fn option_lookup_finds_supplied_value() {
        let sink = testing::RecordingSink::new();
        let mut invocation = testing::invocation(&sink);
        invocation.options = vec![("city".to_string(), "Tokyo".to_string())];

        assert_eq!(invocation.option("city"), Some("Tokyo"));
        assert_eq!(invocation.option("missing"), None);
    }

    #[test]
    fn mention_channel_uses_id_when_known() {
        let sink = testing::RecordingSink::new();
        let mut directory = HashMap::new();
        directory.insert("weather".to_string(), 42u64);
        let invocation = invocation_with_directory(&sink, directory);

        assert_eq!(invocation.mention_channel("weather"), "<#42>");
    }

    #[test]
    fn mention_channel_falls_back_to_plain_name() {
        let sink = testing::RecordingSink::new();
        let invocation = invocation_with_directory(&sink, HashMap::new());

        assert_eq!(invocation.mention_channel("weather"), "#weather");
    }

    #[test]
    fn embed_carries_payload_fields() {
        let payload = DisplayPayload {
            title: "Current Weather in Lipa".to_string(),
            description: Some("**Sunny**".to_string()),
            thumbnail: Some("https://cdn.example/icon.png".to_string()),
            color: 0xFFD700,
            fields: vec![PayloadField::inline("Temperature", "31°C")],
            footer: Some("Powered by WeatherAPI.com".to_string()),
            timestamped: false,
        };

        let embed = build_embed(&payload);
        assert_eq!(
            embed.0.get("title").and_then(|v| v.as_str()),
            Some("Current Weather in Lipa")
        );
        assert_eq!(
            embed.0.get("color").and_then(|v| v.as_u64()),
            Some(0xFFD700)
        );
        let fields = embed.0.get("fields").and_then(|v| v.as_array()).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(
            fields[0].get("name").and_then(|v| v.as_str()),
            Some("Temperature")
        );
    }
}
