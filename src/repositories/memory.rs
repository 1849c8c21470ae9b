use dashmap::DashMap;
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::Error;
use crate::models::User;
use crate::repositories::UserRepo;

/// DashMap-backed user directory, keyed by lowercase platform user id.
///
/// The default directory for small deployments and the reference
/// implementation of the atomic get-or-create contract: `entry()` holds the
/// shard lock across the insert-or-fetch, so concurrent first contact from
/// one user yields exactly one record.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepository {
    async fn find_or_create(
        &self,
        platform_user_id: &str,
        username: Option<&str>,
    ) -> Result<User, Error> {
        let key = platform_user_id.to_lowercase();
        let mut entry = self
            .users
            .entry(key.clone())
            .or_insert_with(|| {
                debug!("creating user record for '{}'", key);
                User::new(&key, username)
            });
        entry.last_seen = Utc::now();
        Ok(entry.clone())
    }

    async fn get_by_platform_id(&self, platform_user_id: &str) -> Result<Option<User>, Error> {
        let key = platform_user_id.to_lowercase();
        Ok(self.users.get(&key).map(|u| u.value().clone()))
    }

    async fn update(&self, user: &User) -> Result<(), Error> {
        let key = user.platform_user_id.to_lowercase();
        if !self.users.contains_key(&key) {
            return Err(Error::UserDirectory(format!(
                "no user record for '{}'",
                key
            )));
        }
        self.users.insert(key, user.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, Error> {
        Ok(self.users.iter().map(|e| e.value().clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn find_or_create_is_idempotent() -> Result<(), Error> {
        let repo = InMemoryUserRepository::new();

        let first = repo.find_or_create("12345", Some("alice")).await?;
        let second = repo.find_or_create("12345", Some("somebody-else")).await?;

        assert_eq!(first.user_id, second.user_id);
        assert_eq!(second.global_username.as_deref(), Some("alice"));
        assert_eq!(repo.list_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn identifier_lookup_is_case_insensitive() -> Result<(), Error> {
        let repo = InMemoryUserRepository::new();

        let first = repo.find_or_create("Kittyn", Some("Kittyn")).await?;
        let second = repo.find_or_create("kittyn", None).await?;

        assert_eq!(first.user_id, second.user_id);
        assert_eq!(first.platform_user_id, "kittyn");
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_first_contact_creates_one_record() -> Result<(), Error> {
        let repo = Arc::new(InMemoryUserRepository::new());

        let a = {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.find_or_create("99001", Some("newcomer")).await })
        };
        let b = {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.find_or_create("99001", Some("newcomer")).await })
        };

        let user_a = a.await.expect("task a panicked")?;
        let user_b = b.await.expect("task b panicked")?;

        assert_eq!(user_a.user_id, user_b.user_id);
        assert_eq!(repo.list_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_requires_existing_record() -> Result<(), Error> {
        let repo = InMemoryUserRepository::new();

        let mut user = repo.find_or_create("42", Some("mod")).await?;
        user.is_admin = true;
        repo.update(&user).await?;

        let reread = repo.get_by_platform_id("42").await?.expect("record exists");
        assert!(reread.is_admin);

        let phantom = User::new("nobody", None);
        assert!(repo.update(&phantom).await.is_err());
        Ok(())
    }
}
