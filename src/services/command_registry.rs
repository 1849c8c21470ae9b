use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::Error;
use crate::services::command_service::CommandHandler;

/// Dispatch table built once at startup: command token (name or alias,
/// matched case-insensitively) to handler, plus the bot-wide prefix.
///
/// Read-only after registration, so lookups take no lock.
pub struct CommandRegistry {
    prefix: String,
    by_token: HashMap<String, Arc<dyn CommandHandler>>,
    // registration order, for listings
    handlers: Vec<Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            by_token: HashMap::new(),
            handlers: Vec::new(),
        }
    }

    /// Registers a handler under its name and every alias. Fails fast when
    /// the name is empty or any token is already taken.
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) -> Result<(), Error> {
        let desc = handler.descriptor();
        if desc.name.trim().is_empty() {
            return Err(Error::Command("command name must not be empty".into()));
        }

        let mut tokens: Vec<String> = Vec::with_capacity(1 + desc.aliases.len());
        tokens.push(desc.name.to_lowercase());
        tokens.extend(desc.aliases.iter().map(|a| a.to_lowercase()));

        for token in &tokens {
            if self.by_token.contains_key(token) || tokens.iter().filter(|t| *t == token).count() > 1
            {
                return Err(Error::Command(format!(
                    "duplicate command token '{}'",
                    token
                )));
            }
        }

        debug!("registering command '{}' ({} aliases)", desc.name, desc.aliases.len());
        for token in tokens {
            self.by_token.insert(token, Arc::clone(&handler));
        }
        self.handlers.push(handler);
        Ok(())
    }

    /// Case-insensitive lookup by name or alias.
    pub fn get(&self, token: &str) -> Option<Arc<dyn CommandHandler>> {
        self.by_token.get(&token.to_lowercase()).cloned()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Handlers in registration order, hidden commands excluded. This feeds
    /// help/listing views; hidden commands still dispatch via `get`.
    pub fn visible_commands(&self) -> Vec<Arc<dyn CommandHandler>> {
        self.handlers
            .iter()
            .filter(|h| !h.is_hidden())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::models::{ChatMessage, CommandDescriptor};
    use crate::services::command_service::CommandContext;

    struct Noop {
        descriptor: CommandDescriptor,
    }

    impl Noop {
        fn named(name: &str) -> Self {
            Self {
                descriptor: CommandDescriptor::new(name),
            }
        }
    }

    #[async_trait]
    impl CommandHandler for Noop {
        fn descriptor(&self) -> &CommandDescriptor {
            &self.descriptor
        }

        async fn handle(
            &self,
            _ctx: &CommandContext,
            _message: &ChatMessage,
            _args: &[String],
        ) -> Result<(), Error> {
            Ok(())
        }
    }

    #[test]
    fn duplicate_name_is_rejected_case_insensitively() {
        let mut registry = CommandRegistry::new("!");
        registry.register(Arc::new(Noop::named("ban"))).unwrap();

        let err = registry.register(Arc::new(Noop::named("BAN"))).unwrap_err();
        assert!(matches!(err, Error::Command(_)));
    }

    #[test]
    fn alias_colliding_with_existing_name_is_rejected() {
        let mut registry = CommandRegistry::new("!");
        registry.register(Arc::new(Noop::named("kick"))).unwrap();

        let mut desc = CommandDescriptor::new("boot");
        desc.aliases = vec!["Kick".into()];
        let err = registry
            .register(Arc::new(Noop { descriptor: desc }))
            .unwrap_err();
        assert!(matches!(err, Error::Command(_)));
    }

    #[test]
    fn alias_repeated_within_one_descriptor_is_rejected() {
        let mut registry = CommandRegistry::new("!");
        let mut desc = CommandDescriptor::new("mute");
        desc.aliases = vec!["silence".into(), "SILENCE".into()];
        assert!(registry.register(Arc::new(Noop { descriptor: desc })).is_err());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut registry = CommandRegistry::new("!");
        assert!(registry.register(Arc::new(Noop::named("  "))).is_err());
    }

    #[test]
    fn lookup_matches_name_and_alias_in_any_case() {
        let mut registry = CommandRegistry::new("!");
        let mut desc = CommandDescriptor::new("ban");
        desc.aliases = vec!["exile".into()];
        registry.register(Arc::new(Noop { descriptor: desc })).unwrap();

        assert!(registry.get("ban").is_some());
        assert!(registry.get("BaN").is_some());
        assert!(registry.get("EXILE").is_some());
        assert!(registry.get("kick").is_none());
    }

    #[test]
    fn listing_skips_hidden_but_lookup_does_not() {
        let mut registry = CommandRegistry::new("!");
        registry.register(Arc::new(Noop::named("ping"))).unwrap();

        let mut desc = CommandDescriptor::new("debug");
        desc.hidden = true;
        registry.register(Arc::new(Noop { descriptor: desc })).unwrap();

        let visible = registry.visible_commands();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].descriptor().name, "ping");
        assert!(registry.get("debug").is_some());
    }
}
