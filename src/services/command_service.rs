use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::Error;
use crate::models::{ChatMessage, CommandDescriptor, User};
use crate::platforms::ServerContext;
use crate::repositories::UserRepo;
use crate::services::command_registry::CommandRegistry;

/// Per-invocation execution context handed to a handler.
///
/// `user` is owned by this one dispatch; `server` is a shared back-reference
/// to the originating guild and is never mutated here.
pub struct CommandContext {
    pub user: User,
    pub server: Arc<dyn ServerContext>,
}

/// One registered command. Implementations carry their descriptor and the
/// behavior; everything else (signature rendering, flag predicates) derives
/// from the descriptor.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    fn descriptor(&self) -> &CommandDescriptor;

    /// Performs the command's effect. Failures here are the handler's own;
    /// the dispatcher propagates them without retrying.
    async fn handle(
        &self,
        ctx: &CommandContext,
        message: &ChatMessage,
        args: &[String],
    ) -> Result<(), Error>;

    fn signature(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.descriptor().name)
    }

    /// Signature plus the usage hint, e.g. ``!ban `<user> [reason]` ``.
    fn syntax(&self, prefix: &str) -> String {
        let signature = self.signature(prefix);
        let usage = &self.descriptor().usage;
        if usage.is_empty() {
            signature
        } else {
            format!("{} `{}`", signature, usage)
        }
    }

    fn is_admin_command(&self) -> bool {
        self.descriptor().admin_only
    }

    fn is_hidden(&self) -> bool {
        self.descriptor().hidden
    }
}

/// Tracks when each command was last accepted, keyed by lowercase name.
#[derive(Debug, Default)]
struct CooldownTracker {
    last_use: HashMap<String, DateTime<Utc>>,
}

/// The dispatcher: matches inbound chat lines against the registry and runs
/// the matched handler under the authorization and cooldown policy.
///
/// Collaborators arrive through the constructor; there are no ambient
/// singletons to reach into.
pub struct CommandService {
    registry: Arc<CommandRegistry>,
    user_repo: Arc<dyn UserRepo>,
    cooldowns: Mutex<CooldownTracker>,
}

impl CommandService {
    pub fn new(registry: Arc<CommandRegistry>, user_repo: Arc<dyn UserRepo>) -> Self {
        debug!("initializing CommandService ({} commands)", registry.len());
        Self {
            registry,
            user_repo,
            cooldowns: Mutex::new(CooldownTracker::default()),
        }
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Entry point for the transport's message loop. Extracts the command
    /// token and arguments, then dispatches. Lines without the prefix and
    /// unknown tokens are not errors.
    pub async fn handle_chat_line(&self, message: &ChatMessage) -> Result<(), Error> {
        let text = message.text.trim();
        let rest = match text.strip_prefix(self.registry.prefix()) {
            Some(rest) => rest,
            None => return Ok(()),
        };

        let mut parts = rest.split_whitespace();
        let token = match parts.next() {
            Some(token) => token,
            None => return Ok(()),
        };
        let args: Vec<String> = parts.map(str::to_string).collect();

        let handler = match self.registry.get(token) {
            Some(handler) => handler,
            None => {
                debug!("no command found matching '{}'", token);
                return Ok(());
            }
        };

        self.maybe_handle(&handler, message, &args).await
    }

    /// The gate every command-matched message passes through: resolve the
    /// author, bind the guild, apply the admin and cooldown policy, run the
    /// handler.
    ///
    /// Unauthorized and within-cooldown messages are dropped silently, that
    /// is policy, not failure. A user-directory failure aborts the dispatch
    /// before the handler runs.
    pub async fn maybe_handle(
        &self,
        handler: &Arc<dyn CommandHandler>,
        message: &ChatMessage,
        args: &[String],
    ) -> Result<(), Error> {
        let user = self
            .user_repo
            .find_or_create(&message.author_id, message.author_name.as_deref())
            .await?;

        let ctx = CommandContext {
            user,
            server: Arc::clone(&message.guild),
        };

        let desc = handler.descriptor();
        if desc.admin_only && !ctx.user.is_admin {
            debug!(
                "dropping admin command '{}' from non-admin '{}'",
                desc.name, ctx.user.platform_user_id
            );
            return Ok(());
        }

        if desc.cooldown_seconds > 0 && !self.pass_cooldown(desc) {
            return Ok(());
        }

        handler.handle(&ctx, message, args).await
    }

    /// Check-and-stamp on the shared tracker. Accepting a message records
    /// its timestamp; a rejection leaves the previous stamp in place.
    fn pass_cooldown(&self, desc: &CommandDescriptor) -> bool {
        let key = desc.name.to_lowercase();
        let now = Utc::now();
        let mut tracker = self.cooldowns.lock().unwrap();
        if let Some(last) = tracker.last_use.get(&key) {
            let elapsed = now.signed_duration_since(*last).num_seconds();
            let remain = desc.cooldown_seconds as i64 - elapsed;
            if remain > 0 {
                debug!("command '{}' on cooldown, {}s remaining", desc.name, remain);
                return false;
            }
        }
        tracker.last_use.insert(key, now);
        true
    }

    /// Test helper
    pub fn test_force_last_use(&self, command_name: &str, secs_ago: i64) {
        let mut tracker = self.cooldowns.lock().unwrap();
        tracker.last_use.insert(
            command_name.to_lowercase(),
            Utc::now() - chrono::Duration::seconds(secs_ago),
        );
    }
}
