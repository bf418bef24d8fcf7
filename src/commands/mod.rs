//! Compiled-in slash command definitions.
//!
//! The command list is explicit: every definition is constructed here at
//! startup and handed to the registry, rather than discovered by scanning
//! a directory.

mod news;
mod ping;
mod server;
mod weather;

use std::sync::Arc;

use crate::config::Config;
use crate::registry::SlashCommand;

pub use news::NewsCommand;
pub use ping::PingCommand;
pub use server::ServerCommand;
pub use weather::WeatherCommand;

/// Builds the full command set for one bot instance.
pub fn all(config: &Config) -> Vec<Arc<dyn SlashCommand>> {
    vec![
        Arc::new(PingCommand),
        Arc::new(ServerCommand),
        Arc::new(WeatherCommand::new(config)),
        Arc::new(NewsCommand::new(config)),
    ]
}
