use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};

use crate::errors::StorageError;

/// Generic JSON file-backed key-value map store.
///
/// Persists a `HashMap<K, V>` to a JSON file. Every mutation rewrites the file
/// while the write lock is held, so readers never observe an unpersisted value
/// and concurrent writers cannot reorder their snapshots on disk.
pub struct JsonMapStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path. Creates the file with an empty map if missing.
    /// A file that exists but does not parse is an error rather than an empty store.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, StorageError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: HashMap<K, V> = HashMap::new();
                write_atomic(&file_path, &empty).await?;
                empty
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Arc::new(Self { inner: RwLock::new(map), file_path }))
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Insert or update a value by key and persist.
    pub async fn insert(&self, key: K, value: V) -> Result<(), StorageError> {
        self.update_map(|m| {
            m.insert(key, value);
        })
        .await
    }

    /// Apply a mutation to the underlying map and persist under the same lock.
    ///
    /// If persisting fails the in-memory map is rolled back.
    pub async fn update_map<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> T,
    {
        let mut map = self.inner.write().await;
        let before = map.clone();
        let out = f(&mut *map);
        if let Err(e) = write_atomic(&self.file_path, &*map).await {
            *map = before;
            return Err(e);
        }
        Ok(out)
    }
}

async fn write_atomic<T: serde::Serialize>(path: &PathBuf, value: &T) -> Result<(), StorageError> {
    let data = serde_json::to_vec_pretty(value)?;
    let mut tmp = path.clone().into_os_string();
    tmp.push(".tmp");
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
