use std::sync::Arc;

use crate::platforms::ServerContext;

/// Inbound message envelope handed over by the chat transport.
///
/// Opaque to the dispatch core beyond the author identity and the guild the
/// message originated in; everything else is passed through to handlers.
#[derive(Clone)]
pub struct ChatMessage {
    pub author_id: String,
    pub author_name: Option<String>,
    pub channel: String,
    pub text: String,
    pub guild: Arc<dyn ServerContext>,
}
