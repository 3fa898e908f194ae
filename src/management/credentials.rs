use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{config, warning};

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("credential encoding error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A bearer token together with the instant it stops being usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Persistence for the session token.
///
/// Implementations enforce the expiry themselves: `get` never returns a
/// token whose expiry has passed. The stored entry is not tied to the host
/// name of the backend, so `localhost` and `127.0.0.1` share one token.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// The stored token, or `None` if absent or expired.
    async fn get(&self) -> Option<String>;

    /// Replaces any stored token.
    async fn set(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), CredentialError>;

    /// Removes the token. Removing an absent token succeeds.
    async fn clear(&self) -> Result<(), CredentialError>;
}

/// Token kept in a JSON file under the local data directory.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/statify/cache/credentials.json`
    pub fn default_location() -> Self {
        let mut path = config::data_dir();
        path.push("cache/credentials.json");
        Self::new(path)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// The raw entry, including an expired one.
    pub async fn stored(&self) -> Result<Option<StoredToken>, CredentialError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self) -> Option<String> {
        match self.stored().await {
            Ok(Some(stored)) if !stored.is_expired() => Some(stored.access_token),
            Ok(_) => None,
            Err(e) => {
                warning!(
                    "Ignoring unreadable credentials at {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    async fn set(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let stored = StoredToken {
            access_token: token.to_string(),
            expires_at,
        };
        let json = serde_json::to_string_pretty(&stored)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialError> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process token storage.
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<StoredToken>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw entry, including an expired one.
    pub async fn stored(&self) -> Option<StoredToken> {
        self.token.lock().await.clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self) -> Option<String> {
        self.token
            .lock()
            .await
            .as_ref()
            .filter(|t| !t.is_expired())
            .map(|t| t.access_token.clone())
    }

    async fn set(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), CredentialError> {
        *self.token.lock().await = Some(StoredToken {
            access_token: token.to_string(),
            expires_at,
        });
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialError> {
        *self.token.lock().await = None;
        Ok(())
    }
}
