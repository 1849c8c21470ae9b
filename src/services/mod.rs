pub mod builtin_commands;
pub mod command_registry;
pub mod command_service;
pub mod user_service;

pub use command_registry::CommandRegistry;
pub use command_service::{CommandContext, CommandHandler, CommandService};
pub use user_service::UserService;
