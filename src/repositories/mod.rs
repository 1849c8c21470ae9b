pub mod memory;

pub use memory::InMemoryUserRepository;

use async_trait::async_trait;

use crate::Error;
use crate::models::User;

/// The user directory: platform identity in, local record out.
///
/// `find_or_create` is the contract the dispatcher leans on: create if
/// absent, else return the existing record. Implementations must make that
/// a single atomic insert-or-fetch (a unique-constrained upsert, an entry
/// API, etc.), never a lookup followed by an insert, so that two
/// first-contact messages from the same user cannot race into duplicates.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Looks up or creates the record for `platform_user_id`, seeding a new
    /// record with `username` and touching `last_seen` on every call.
    async fn find_or_create(
        &self,
        platform_user_id: &str,
        username: Option<&str>,
    ) -> Result<User, Error>;

    async fn get_by_platform_id(&self, platform_user_id: &str) -> Result<Option<User>, Error>;

    /// Replaces the stored record for `user.platform_user_id`.
    async fn update(&self, user: &User) -> Result<(), Error>;

    async fn list_all(&self) -> Result<Vec<User>, Error>;
}
