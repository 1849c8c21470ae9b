//! Narrow interfaces onto the chat platform. The gateway connection, event
//! decoding and outbound delivery all live with the transport; the dispatch
//! core only sees these traits.

use async_trait::async_trait;

use crate::Error;

/// One guild member as the platform exposes it.
#[derive(Debug, Clone)]
pub struct Member {
    pub user_id: String,
    pub username: String,
    pub is_bot: bool,
}

/// The guild/server a message originated in.
///
/// `members()` enumerates in the server's own order; that order is
/// meaningful, first-match wins when usernames collide.
pub trait ServerContext: Send + Sync {
    fn name(&self) -> &str;
    fn members(&self) -> Vec<Member>;
}

/// Outbound message delivery, implemented by the transport layer.
#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn send_message(&self, channel: &str, text: &str) -> Result<(), Error>;
}
