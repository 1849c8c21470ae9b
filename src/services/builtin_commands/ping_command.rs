use std::sync::Arc;

use async_trait::async_trait;

use crate::Error;
use crate::models::{ChatMessage, CommandDescriptor};
use crate::platforms::ChatSink;
use crate::services::command_service::{CommandContext, CommandHandler};

/// `!ping` — liveness check, replies "pong" in the originating channel.
pub struct PingCommand {
    descriptor: CommandDescriptor,
    sink: Arc<dyn ChatSink>,
}

impl PingCommand {
    pub fn new(sink: Arc<dyn ChatSink>) -> Self {
        let mut descriptor = CommandDescriptor::new("ping");
        descriptor.description = Some("Replies with pong.".into());
        Self { descriptor, sink }
    }
}

#[async_trait]
impl CommandHandler for PingCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    async fn handle(
        &self,
        _ctx: &CommandContext,
        message: &ChatMessage,
        _args: &[String],
    ) -> Result<(), Error> {
        self.sink.send_message(&message.channel, "pong").await
    }
}
