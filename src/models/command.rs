use serde::{Deserialize, Serialize};

/// Immutable metadata for one chat command (e.g. `!ban`).
///
/// Built once at registration time and never mutated afterwards; the
/// registry rejects any descriptor whose name or alias collides with an
/// already registered one (case-insensitive).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: Option<String>,
    /// Free-form argument hint appended to the signature, e.g. `<user> [reason]`.
    pub usage: String,
    /// 0 disables the cooldown gate entirely.
    pub cooldown_seconds: u32,
    pub cooldown_message: String,
    pub admin_only: bool,
    /// Hidden commands are excluded from listings but still dispatchable.
    pub hidden: bool,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: None,
            usage: String::new(),
            cooldown_seconds: 0,
            cooldown_message: String::new(),
            admin_only: false,
            hidden: false,
        }
    }
}
