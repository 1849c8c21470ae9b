use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Local user record, keyed by the platform user identifier.
///
/// Created lazily the first time a platform identity is seen; later lookups
/// are get-or-create and idempotent on `platform_user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: Uuid,
    /// Stored lowercase so "Kittyn" and "kittyn" map to one record.
    pub platform_user_id: String,
    pub global_username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub is_admin: bool,
}

impl User {
    pub fn new(platform_user_id: &str, username: Option<&str>) -> Self {
        let now = Utc::now();
        let global_username = username
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from);
        Self {
            user_id: Uuid::new_v4(),
            platform_user_id: platform_user_id.to_lowercase(),
            global_username,
            created_at: now,
            last_seen: now,
            is_admin: false,
        }
    }
}
