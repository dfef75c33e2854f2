//! Persistence for the session identifier handed out at login.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

/// Holds at most one session identifier.
///
/// `get_id` never fails: an unset or unreadable store reads as the empty
/// string, so callers only ever check for emptiness.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn set_id(&self, id: &str) -> Result<()>;
    async fn get_id(&self) -> String;
    async fn delete_id(&self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    id: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Mutex::new(Some(id.into())),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn set_id(&self, id: &str) -> Result<()> {
        *self.id.lock().await = Some(id.to_string());
        Ok(())
    }

    async fn get_id(&self) -> String {
        self.id.lock().await.clone().unwrap_or_default()
    }

    async fn delete_id(&self) -> Result<()> {
        self.id.lock().await.take();
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    session_id: String,
}

/// Keeps the identifier in a small JSON file, surviving across runs the
/// way a browser cookie survives page loads.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub const FILE_NAME: &'static str = "session.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn set_id(&self, id: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create session directory '{}'", parent.display())
            })?;
        }
        let raw = serde_json::to_vec(&PersistedSession {
            session_id: id.to_string(),
        })?;
        tokio::fs::write(&self.path, raw)
            .await
            .with_context(|| format!("failed to write session file '{}'", self.path.display()))
    }

    async fn get_id(&self) -> String {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return String::new(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "session: unreadable store");
                return String::new();
            }
        };
        match serde_json::from_slice::<PersistedSession>(&raw) {
            Ok(persisted) => persisted.session_id,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "session: corrupt store");
                String::new()
            }
        }
    }

    async fn delete_id(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| {
                format!("failed to remove session file '{}'", self.path.display())
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        std::env::temp_dir().join(format!("handbook_session_{tag}_{suffix}"))
    }

    #[tokio::test]
    async fn memory_store_round_trips_and_clears() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get_id().await, "");

        store.set_id("abc").await.expect("set");
        assert_eq!(store.get_id().await, "abc");

        store.delete_id().await.expect("delete");
        assert_eq!(store.get_id().await, "");
        store.delete_id().await.expect("delete twice");
        assert_eq!(store.get_id().await, "");
    }

    #[tokio::test]
    async fn file_store_persists_across_instances() {
        let dir = temp_dir("persist");
        let store = FileSessionStore::in_dir(dir.join("nested"));
        assert_eq!(store.get_id().await, "");

        store.set_id("session-42").await.expect("set");
        let reopened = FileSessionStore::in_dir(dir.join("nested"));
        assert_eq!(reopened.get_id().await, "session-42");

        reopened.delete_id().await.expect("delete");
        assert_eq!(store.get_id().await, "");
        store.delete_id().await.expect("delete missing file");

        std::fs::remove_dir_all(dir).expect("cleanup");
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_empty() {
        let dir = temp_dir("corrupt");
        std::fs::create_dir_all(&dir).expect("dir");
        let store = FileSessionStore::in_dir(&dir);
        std::fs::write(store.path(), b"{not json").expect("write");

        assert_eq!(store.get_id().await, "");

        std::fs::remove_dir_all(dir).expect("cleanup");
    }
}
