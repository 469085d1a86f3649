//! Session slot backed by a single JSON file.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use clinic_core::{StorageError, StoredSession, TokenStorage};
use fs2::FileExt;
use tracing::{debug, instrument};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

fn map_io(path: &Path) -> impl Fn(std::io::Error) -> StorageError + '_ {
    move |err| StorageError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// Stores the session as JSON at a fixed path.
///
/// Writes go to a sibling temp file which is then renamed over the slot, so
/// a reader never sees a half-written record. Concurrent processes are
/// serialized with an advisory lock on `<path>.lock`. On Unix the file is
/// readable by the owner only.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the session file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }

    fn lock(&self, exclusive: bool) -> Result<File, StorageError> {
        let lock_path = self.sibling(".lock");
        if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(map_io(parent))?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(map_io(&lock_path))?;

        let locked = if exclusive {
            lock_file.lock_exclusive()
        } else {
            FileExt::lock_shared(&lock_file)
        };
        locked.map_err(map_io(&lock_path))?;

        Ok(lock_file)
    }
}

#[async_trait]
impl TokenStorage for FileStorage {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        let lock = self.lock(false)?;
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No session file");
                return Ok(None);
            }
            Err(e) => return Err(map_io(&self.path)(e)),
        };
        FileExt::unlock(&lock).map_err(map_io(&self.path))?;

        let stored = serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
            message: e.to_string(),
        })?;
        Ok(Some(stored))
    }

    #[instrument(skip(self, session), fields(path = %self.path.display()))]
    async fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(session).map_err(|e| StorageError::Corrupt {
            message: e.to_string(),
        })?;

        let lock = self.lock(true)?;
        let temp_path = self.sibling(".tmp");

        let mut file = File::create(&temp_path).map_err(map_io(&temp_path))?;
        #[cfg(unix)]
        fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600))
            .map_err(map_io(&temp_path))?;
        file.write_all(json.as_bytes())
            .map_err(map_io(&temp_path))?;
        file.sync_data().map_err(map_io(&temp_path))?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(map_io(&self.path))?;
        FileExt::unlock(&lock).map_err(map_io(&self.path))?;

        debug!("Session saved");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn clear(&self) -> Result<(), StorageError> {
        let lock = self.lock(true)?;
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Session file removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(map_io(&self.path)(e)),
        }
        FileExt::unlock(&lock).map_err(map_io(&self.path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_core::{BearerToken, UserSummary};
    use tempfile::TempDir;

    fn stored() -> StoredSession {
        StoredSession::new(&BearerToken::new("t1"), UserSummary::new("a@b.com"))
    }

    #[tokio::test]
    async fn empty_slot_loads_none() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        assert_eq!(storage.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("nested/session.json"));

        storage.save(&stored()).await.unwrap();
        assert_eq!(storage.load().await.unwrap(), Some(stored()));
        assert!(!dir.path().join("nested/session.json.tmp").exists());
    }

    #[tokio::test]
    async fn save_overwrites() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));

        storage.save(&stored()).await.unwrap();
        let newer = StoredSession::new(&BearerToken::new("t2"), UserSummary::new("c@d.com"));
        storage.save(&newer).await.unwrap();

        assert_eq!(storage.load().await.unwrap(), Some(newer));
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));

        storage.save(&stored()).await.unwrap();
        storage.clear().await.unwrap();
        storage.clear().await.unwrap();

        assert_eq!(storage.load().await.unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn garbage_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStorage::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn session_file_is_private() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        storage.save(&stored()).await.unwrap();

        let mode = fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
