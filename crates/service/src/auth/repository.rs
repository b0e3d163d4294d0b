use async_trait::async_trait;

use super::domain::{InsertOutcome, User};
use crate::errors::StorageError;

/// Persistence boundary for username/password records.
///
/// Implementations must guarantee at most one record per username through
/// `insert_if_absent`; `save` is an unconditional upsert.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;
    async fn save(&self, user: User) -> Result<(), StorageError>;
    /// Atomic check-and-insert.
    async fn insert_if_absent(&self, user: User) -> Result<InsertOutcome, StorageError>;
}

/// In-process store, lost on restart.
pub mod memory {
    use super::*;
    use std::collections::hash_map::Entry;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryCredentialStore {
        users: Mutex<HashMap<String, User>>,
    }

    impl MemoryCredentialStore {
        pub fn new() -> Self {
            Self::default()
        }

        fn users(&self) -> std::sync::MutexGuard<'_, HashMap<String, User>> {
            // a panic mid-insert leaves the map consistent, so poison is ignored
            self.users.lock().unwrap_or_else(|p| p.into_inner())
        }
    }

    #[async_trait]
    impl CredentialStore for MemoryCredentialStore {
        async fn find_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
            Ok(self.users().get(username).cloned())
        }

        async fn save(&self, user: User) -> Result<(), StorageError> {
            self.users().insert(user.username.clone(), user);
            Ok(())
        }

        async fn insert_if_absent(&self, user: User) -> Result<InsertOutcome, StorageError> {
            match self.users().entry(user.username.clone()) {
                Entry::Occupied(_) => Ok(InsertOutcome::Taken),
                Entry::Vacant(slot) => {
                    slot.insert(user);
                    Ok(InsertOutcome::Inserted)
                }
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn insert_if_absent_does_not_overwrite() {
            let store = MemoryCredentialStore::new();
            assert_eq!(store.insert_if_absent(User::new("alice", "pw1")).await.unwrap(), InsertOutcome::Inserted);
            assert_eq!(store.insert_if_absent(User::new("alice", "pw2")).await.unwrap(), InsertOutcome::Taken);
            let found = store.find_by_username("alice").await.unwrap().unwrap();
            assert_eq!(found.password, "pw1");
        }

        #[tokio::test]
        async fn save_overwrites() {
            let store = MemoryCredentialStore::new();
            store.save(User::new("bob", "a")).await.unwrap();
            store.save(User::new("bob", "b")).await.unwrap();
            assert_eq!(store.find_by_username("bob").await.unwrap().unwrap().password, "b");
        }

        #[tokio::test]
        async fn lookup_is_read_only() {
            let store = MemoryCredentialStore::new();
            store.save(User::new("carol", "pw")).await.unwrap();
            let first = store.find_by_username("carol").await.unwrap();
            let second = store.find_by_username("carol").await.unwrap();
            assert_eq!(first, second);
            assert!(store.find_by_username("dave").await.unwrap().is_none());
            assert!(store.find_by_username("dave").await.unwrap().is_none());
        }
    }
}
