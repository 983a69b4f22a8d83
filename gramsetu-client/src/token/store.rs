/// Token store implementations
///
/// The store holds the persisted token pair under the fixed keys `token`
/// and `refreshToken`, matching what the browser frontend keeps in local
/// storage. Mutations are atomic with respect to concurrent readers: a
/// reader never observes a half-written pair.
///
/// Two implementations are provided:
///
/// - [`MemoryTokenStore`]: process-local, for tests and short-lived tools
/// - [`FileTokenStore`]: JSON file persistence across process restarts
///
/// Store operations are infallible, mirroring local storage semantics;
/// the file store reports write failures through `tracing` and keeps
/// serving its in-memory copy.
///
/// # Example
///
/// ```
/// use gramsetu_client::token::{MemoryTokenStore, TokenStore};
///
/// let store = MemoryTokenStore::new();
/// store.set_tokens("access", "refresh");
/// assert!(store.has_tokens());
///
/// store.clear();
/// assert!(store.access_token().is_none());
/// ```
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Error opening a persistent token store
#[derive(Debug, Clone, thiserror::Error)]
pub enum TokenStoreError {
    /// Token file exists but could not be read
    #[error("Failed to read token file {path}: {reason}")]
    Read { path: String, reason: String },

    /// Parent directory could not be created
    #[error("Failed to prepare token directory {path}: {reason}")]
    Prepare { path: String, reason: String },
}

/// Persisted token pair
///
/// Field names are the fixed storage keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredTokens {
    #[serde(default)]
    token: Option<String>,

    #[serde(default, rename = "refreshToken")]
    refresh_token: Option<String>,
}

/// Read/write access to the persisted token pair
pub trait TokenStore: Send + Sync {
    /// Current access token
    fn access_token(&self) -> Option<String>;

    /// Current refresh token
    fn refresh_token(&self) -> Option<String>;

    /// Replaces both tokens atomically
    fn set_tokens(&self, access: &str, refresh: &str);

    /// Replaces only the access token
    fn set_access_token(&self, access: &str);

    /// Removes both tokens (logout)
    fn clear(&self);

    /// True when both tokens are present
    fn has_tokens(&self) -> bool {
        self.access_token().is_some() && self.refresh_token().is_some()
    }
}

/// In-memory token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: RwLock<StoredTokens>,
}

impl MemoryTokenStore {
    /// Creates an empty store
    pub fn new() -> Self {
        MemoryTokenStore::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.inner.read().ok()?.token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.inner.read().ok()?.refresh_token.clone()
    }

    fn set_tokens(&self, access: &str, refresh: &str) {
        if let Ok(mut inner) = self.inner.write() {
            inner.token = Some(access.to_string());
            inner.refresh_token = Some(refresh.to_string());
        }
    }

    fn set_access_token(&self, access: &str) {
        if let Ok(mut inner) = self.inner.write() {
            inner.token = Some(access.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            *inner = StoredTokens::default();
        }
    }
}

/// File-backed token store
///
/// Keeps an authoritative in-memory copy and persists every mutation to a
/// JSON file. A corrupt file is logged and treated as empty rather than
/// failing the whole client.
pub struct FileTokenStore {
    path: PathBuf,
    cache: RwLock<StoredTokens>,
}

impl FileTokenStore {
    /// Opens (or initializes) the store at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or if the
    /// parent directory cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TokenStoreError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| TokenStoreError::Prepare {
                    path: parent.display().to_string(),
                    reason: e.to_string(),
                })?;
            }
        }

        let tokens = Self::load(&path)?;
        Ok(FileTokenStore {
            path,
            cache: RwLock::new(tokens),
        })
    }

    fn load(path: &Path) -> Result<StoredTokens, TokenStoreError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredTokens::default())
            }
            Err(e) => {
                return Err(TokenStoreError::Read {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };

        match serde_json::from_str(&raw) {
            Ok(tokens) => Ok(tokens),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Token file is corrupt, starting empty");
                Ok(StoredTokens::default())
            }
        }
    }

    fn persist(&self, tokens: &StoredTokens) {
        let serialized = match serde_json::to_string_pretty(tokens) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize tokens");
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, serialized) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist tokens");
        }
    }
}

impl TokenStore for FileTokenStore {
    fn access_token(&self) -> Option<String> {
        self.cache.read().ok()?.token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.cache.read().ok()?.refresh_token.clone()
    }

    fn set_tokens(&self, access: &str, refresh: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.token = Some(access.to_string());
            cache.refresh_token = Some(refresh.to_string());
            self.persist(&cache);
        }
    }

    fn set_access_token(&self, access: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.token = Some(access.to_string());
            self.persist(&cache);
        }
    }

    fn clear(&self) {
        if let Ok(mut cache) = self.cache.write() {
            *cache = StoredTokens::default();
            self.persist(&cache);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "gramsetu-token-test-{}-{}.json",
            std::process::id(),
            name
        ))
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(!store.has_tokens());

        store.set_tokens("access-1", "refresh-1");
        assert_eq!(store.access_token().as_deref(), Some("access-1"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));
        assert!(store.has_tokens());

        store.set_access_token("access-2");
        assert_eq!(store.access_token().as_deref(), Some("access-2"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));
    }

    #[test]
    fn test_memory_store_clear_removes_both() {
        let store = MemoryTokenStore::new();
        store.set_tokens("a", "r");
        store.clear();

        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        assert!(!store.has_tokens());
    }

    #[test]
    fn test_file_store_roundtrip_across_instances() {
        let path = temp_path("roundtrip");
        let _ = fs::remove_file(&path);

        {
            let store = FileTokenStore::open(&path).unwrap();
            store.set_tokens("access-1", "refresh-1");
        }

        let reopened = FileTokenStore::open(&path).unwrap();
        assert_eq!(reopened.access_token().as_deref(), Some("access-1"));
        assert_eq!(reopened.refresh_token().as_deref(), Some("refresh-1"));

        reopened.clear();
        let reopened_again = FileTokenStore::open(&path).unwrap();
        assert!(!reopened_again.has_tokens());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_uses_fixed_keys() {
        let path = temp_path("keys");
        let _ = fs::remove_file(&path);

        let store = FileTokenStore::open(&path).unwrap();
        store.set_tokens("a", "r");

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["token"], "a");
        assert_eq!(value["refreshToken"], "r");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_tolerates_corrupt_file() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();

        let store = FileTokenStore::open(&path).unwrap();
        assert!(store.access_token().is_none());

        let _ = fs::remove_file(&path);
    }
}
