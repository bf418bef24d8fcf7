pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod interaction;
pub mod news;
pub mod presence;
pub mod registration;
pub mod registry;
pub mod weather;
