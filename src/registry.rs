//! Command registry: the name → definition mapping behind the dispatcher.
//!
//! Built once at startup from the compiled-in command list and read-only
//! afterwards. Loading is eager and total: a malformed or duplicate
//! definition is dropped with a diagnostic, and the registry stays usable
//! with whatever loaded cleanly.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use log::warn;
use serenity::async_trait;
use serenity::builder::CreateApplicationCommand;
use thiserror::Error;

use crate::interaction::Invocation;

/// One user-invokable slash command: a static descriptor plus the handler
/// that runs when the command is invoked.
#[async_trait]
pub trait SlashCommand: Send + Sync {
    /// Unique command name, as registered with Discord.
    fn name(&self) -> &str;

    /// Builds the descriptor published to Discord (name, description,
    /// parameter schema).
    fn descriptor(&self) -> CreateApplicationCommand;

    /// Runs the command against one invocation.
    async fn run(&self, invocation: &Invocation<'_>) -> Result<()>;
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("a command named '{0}' is already registered")]
    DuplicateName(String),
}

pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn SlashCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        CommandRegistry {
            commands: HashMap::new(),
        }
    }

    /// Loads a set of definitions, skipping malformed and duplicate entries.
    pub fn load(definitions: Vec<Arc<dyn SlashCommand>>) -> Self {
        let mut registry = Self::new();
        for definition in definitions {
            if definition.name().is_empty() {
                warn!("Skipping a command definition with an empty name");
                continue;
            }
            if let Err(e) = registry.register(definition) {
                warn!("Skipping command definition: {}", e);
            }
        }
        registry
    }

    /// Registers one definition. The first registrant of a name wins.
    pub fn register(&mut self, definition: Arc<dyn SlashCommand>) -> Result<(), RegistryError> {
        let name = definition.name().to_string();
        if self.commands.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.commands.insert(name, definition);
        Ok(())
    }

    /// Looks up a definition by name. `None` is a routine outcome for
    /// events the bot does not recognize; the caller decides how to report
    /// it.
    pub fn resolve(&self, name: &str) -> Option<&Arc<dyn SlashCommand>> {
        self.commands.get(name)
    }

    /// Descriptors for every registered command, for publication.
    pub fn descriptors(&self) -> Vec<CreateApplicationCommand> {
        self.commands
            .values()
            .map(|command| command.descriptor())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
