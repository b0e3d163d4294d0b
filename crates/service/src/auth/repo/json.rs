use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::domain::{InsertOutcome, User};
use crate::auth::repository::CredentialStore;
use crate::errors::StorageError;
use crate::storage::json_map_store::JsonMapStore;

/// Credential store persisted as a `username -> User` JSON map on disk.
pub struct JsonCredentialStore {
    map: Arc<JsonMapStore<String, User>>,
}

impl JsonCredentialStore {
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StorageError> {
        let map = JsonMapStore::new(path).await?;
        Ok(Self { map })
    }
}

#[async_trait]
impl CredentialStore for JsonCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        Ok(self.map.get(&username.to_string()).await)
    }

    async fn save(&self, user: User) -> Result<(), StorageError> {
        self.map.insert(user.username.clone(), user).await
    }

    async fn insert_if_absent(&self, user: User) -> Result<InsertOutcome, StorageError> {
        self.map
            .update_map(|m| {
                if m.contains_key(&user.username) {
                    return InsertOutcome::Taken;
                }
                m.insert(user.username.clone(), user);
                InsertOutcome::Inserted
            })
            .await
    }
}
