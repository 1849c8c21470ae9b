pub mod command;
pub mod message;
pub mod user;

pub use command::CommandDescriptor;
pub use message::ChatMessage;
pub use user::User;
