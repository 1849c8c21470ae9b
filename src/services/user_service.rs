use std::sync::Arc;

use crate::Error;
use crate::models::User;
use crate::platforms::{Member, ServerContext};
use crate::repositories::UserRepo;

/// Identity resolution helpers for handlers: the message author (via the
/// directory) and arbitrary guild members addressed by mention or name.
pub struct UserService {
    user_repo: Arc<dyn UserRepo>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepo>) -> Self {
        Self { user_repo }
    }

    pub async fn get_or_create_user(
        &self,
        platform_user_id: &str,
        username: Option<&str>,
    ) -> Result<User, Error> {
        self.user_repo.find_or_create(platform_user_id, username).await
    }

    /// Resolves free text (a `<@id>` style mention or a bare username/id) to
    /// a guild member.
    ///
    /// First match in the server's enumeration order wins; with duplicate
    /// usernames that is a known non-uniqueness policy, not a bug to fix
    /// here. Bot accounts never resolve.
    pub fn resolve_member(&self, server: &dyn ServerContext, raw: &str) -> Option<Member> {
        let needle = normalize_mention(raw);
        if needle.is_empty() {
            return None;
        }
        server.members().into_iter().find(|m| {
            !m.is_bot
                && (m.username.to_lowercase() == needle || m.user_id.to_lowercase() == needle)
        })
    }

    /// `resolve_member` plus a directory round trip, so handlers that target
    /// another member get a local record the same way the dispatcher does
    /// for the author.
    pub async fn resolve_user(
        &self,
        server: &dyn ServerContext,
        raw: &str,
    ) -> Result<Option<User>, Error> {
        match self.resolve_member(server, raw) {
            Some(member) => {
                let user = self
                    .user_repo
                    .find_or_create(&member.user_id, Some(&member.username))
                    .await?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}

/// Strips platform mention decoration (`<@!...>` and friends) and lowercases.
fn normalize_mention(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| matches!(c, '<' | '>' | '@' | '!'))
        .to_lowercase()
}
