//! Built-in commands that ship with the bot. Each lives in its own file and
//! implements [`CommandHandler`](crate::services::CommandHandler) like any
//! externally registered command; nothing here is special-cased by the
//! dispatcher.

pub mod ping_command;

pub use ping_command::PingCommand;
