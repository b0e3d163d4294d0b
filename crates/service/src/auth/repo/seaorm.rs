use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::auth::domain::{InsertOutcome, User};
use crate::auth::repository::CredentialStore;
use crate::errors::StorageError;
use models::user_account;

/// Credential store over the `user_account` table.
pub struct SeaOrmCredentialStore {
    pub db: DatabaseConnection,
}

impl SeaOrmCredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for SeaOrmCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let row = user_account::find_by_username(&self.db, username).await?;
        Ok(row.map(|r| User { username: r.username, password: r.password }))
    }

    async fn save(&self, user: User) -> Result<(), StorageError> {
        user_account::upsert(&self.db, &user.username, &user.password).await?;
        Ok(())
    }

    async fn insert_if_absent(&self, user: User) -> Result<InsertOutcome, StorageError> {
        let inserted = user_account::insert_if_absent(&self.db, &user.username, &user.password).await?;
        Ok(if inserted { InsertOutcome::Inserted } else { InsertOutcome::Taken })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::MigratorTrait;

    async fn store() -> anyhow::Result<SeaOrmCredentialStore> {
        let cfg = configs::DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
        let db = models::db::connect_with_config(&cfg).await?;
        migration::Migrator::up(&db, None).await?;
        Ok(SeaOrmCredentialStore::new(db))
    }

    #[tokio::test]
    async fn unique_username_enforced_by_table() -> anyhow::Result<()> {
        let store = store().await?;
        assert_eq!(store.insert_if_absent(User::new("alice", "pw1")).await?, InsertOutcome::Inserted);
        assert_eq!(store.insert_if_absent(User::new("alice", "pw2")).await?, InsertOutcome::Taken);
        assert_eq!(store.find_by_username("alice").await?.unwrap().password, "pw1");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_have_one_winner() -> anyhow::Result<()> {
        use crate::auth::domain::RegisterOutcome;
        use crate::auth::service::{AuthConfig, AuthService};
        use std::sync::Arc;

        let svc = Arc::new(AuthService::new(Arc::new(store().await?), AuthConfig::default()));
        let mut handles = Vec::new();
        for i in 0..16 {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move { svc.register(User::new("racer", format!("pw{i}"))).await }));
        }
        let mut registered = 0;
        for h in handles {
            if h.await?? == RegisterOutcome::Registered {
                registered += 1;
            }
        }
        assert_eq!(registered, 1);
        assert!(svc.store().find_by_username("racer").await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn save_upserts() -> anyhow::Result<()> {
        let store = store().await?;
        store.save(User::new("bob", "one")).await?;
        store.save(User::new("bob", "two")).await?;
        assert_eq!(store.find_by_username("bob").await?.unwrap().password, "two");
        Ok(())
    }
}
