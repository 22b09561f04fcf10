// Key-value persistence for user preferences.
//
// Values are plain strings under string keys. `FileStore` keeps them in one
// JSON object on disk, `MemoryStore` in process memory.
use crate::context::AppContext;
use anyhow::Result as AnyResult;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;

#[cfg(not(target_os = "android"))]
use fs2::FileExt;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference file '{path}' is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode {target}: {source}")]
    Encode {
        target: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage worker failed: {0}")]
    Worker(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous string-keyed storage.
///
/// Absent keys read as `Ok(None)`. I/O failures are returned, never swallowed;
/// the caller decides whether a default applies.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn keys(&self) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    /// Stores `value` as a JSON string.
    fn set_json<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        async move {
            let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
                target: format!("value for key '{}'", key),
                source,
            })?;
            self.set(key, &encoded).await
        }
    }

    /// Reads a JSON value. A value that does not parse as `T` reads as `None`.
    fn get_json<T: DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<T>, StoreError>> + Send {
        async move {
            let Some(raw) = self.get(key).await? else {
                return Ok(None);
            };
            match serde_json::from_str(&raw) {
                Ok(v) => Ok(Some(v)),
                Err(e) => {
                    log::error!("Could not parse stored object for key {}: {}", key, e);
                    Ok(None)
                }
            }
        }
    }
}

// --- File-backed store ---

/// Preference map persisted as a single JSON object.
///
/// Every access takes an exclusive lock on a sibling `.lock` file and writes go
/// through a temp file plus rename, so a crash never leaves a half-written map.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_context(ctx: &dyn AppContext) -> AnyResult<Self> {
        Ok(Self::new(ctx.get_preferences_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    #[cfg(not(target_os = "android"))]
    pub fn with_lock<F, T, E>(file_path: &Path, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<std::io::Error>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    // Android has no reliable advisory locks; one process owns the files.
    #[cfg(target_os = "android")]
    pub fn with_lock<F, T, E>(_file_path: &Path, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<std::io::Error>,
    {
        static LOCK: Mutex<()> = Mutex::new(());
        let _guard = LOCK.lock().unwrap_or_else(|p| p.into_inner());
        f()
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
        path: P,
        contents: C,
    ) -> std::io::Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    fn read_map(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(path)?;
        if json.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&json).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_map(path: &Path, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(map).map_err(|source| StoreError::Encode {
            target: format!("preference map '{}'", path.display()),
            source,
        })?;
        Self::atomic_write(path, json)?;
        Ok(())
    }

    /// Runs a locked operation on the map off the async runtime.
    async fn blocking<F, T>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Path) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<T, StoreError> {
            // The lock file sits beside the map.
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            Self::with_lock(&path, || op(&path))
        })
        .await
        .map_err(|e| StoreError::Worker(e.to_string()))?
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let owned = key.to_string();
        let result = self
            .blocking(move |path| Ok(Self::read_map(path)?.remove(&owned)))
            .await;
        match &result {
            Ok(_) => log::debug!("FileStore: Retrieved value for key: {}", key),
            Err(e) => log::error!("FileStore: Could not get item for key {}: {}", key, e),
        }
        result
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let (k, v) = (key.to_string(), value.to_string());
        let result = self
            .blocking(move |path| {
                let mut map = Self::read_map(path)?;
                map.insert(k, v);
                Self::write_map(path, &map)
            })
            .await;
        match &result {
            Ok(()) => log::debug!("FileStore: Successfully set item for key: {}", key),
            Err(e) => log::error!("FileStore: Could not set item for key {}: {}", key, e),
        }
        result
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let k = key.to_string();
        self.blocking(move |path| {
            let mut map = Self::read_map(path)?;
            if map.remove(&k).is_some() {
                Self::write_map(path, &map)?;
            }
            Ok(())
        })
        .await
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.blocking(|path| Ok(Self::read_map(path)?.into_keys().collect()))
            .await
    }
}

// --- In-memory store ---

/// Process-local store with knobs for latency and failure injection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    latency: Mutex<Option<Duration>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store
            .lock_values()
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        store
    }

    /// Delay applied to every subsequent operation.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock().unwrap_or_else(|p| p.into_inner()) = latency;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Reads a value without latency or failure injection.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.lock_values().get(key).cloned()
    }

    fn lock_values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|p| p.into_inner())
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(d) = latency {
            tokio::time::sleep(d).await;
        }
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.simulate_latency().await;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("read of '{}' rejected", key)));
        }
        Ok(self.lock_values().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.simulate_latency().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("write of '{}' rejected", key)));
        }
        self.lock_values().insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.simulate_latency().await;
        self.lock_values().remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self.lock_values().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
