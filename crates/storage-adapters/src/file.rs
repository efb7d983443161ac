//! Directory-backed key-value store.
//!
//! Each key lives in `<root>/<key>.json`. Writes go to a temporary sibling
//! that is renamed over the target, so a reader sees either the old value
//! or the new one.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use domains::{KeyValueStore, Result};
use tracing::{debug, trace};

use crate::storage_error;

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) the data directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("creating data directory {}", root.display()))
            .map_err(storage_error)?;
        debug!(root = %root.display(), "file store opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> anyhow::Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            bail!("invalid storage key `{key}`");
        }
        Ok(self.root.join(format!("{key}.json")))
    }

    fn write_atomically(&self, target: &Path, value: &str) -> anyhow::Result<()> {
        let tmp = target.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)
                .with_context(|| format!("creating {}", tmp.display()))?;
            file.write_all(value.as_bytes())
                .with_context(|| format!("writing {}", tmp.display()))?;
            file.sync_all()
                .with_context(|| format!("syncing {}", tmp.display()))?;
        }
        fs::rename(&tmp, target)
            .with_context(|| format!("replacing {}", target.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key).map_err(storage_error)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_error(
                anyhow::Error::new(err).context(format!("reading {}", path.display())),
            )),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key).map_err(storage_error)?;
        self.write_atomically(&path, value).map_err(storage_error)?;
        trace!(key, bytes = value.len(), "key written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key).map_err(storage_error)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_error(
                anyhow::Error::new(err).context(format!("removing {}", path.display())),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::DomainError;
    use tempfile::tempdir;

    #[test]
    fn values_survive_reopening() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data")).unwrap();
        store.set("registeredUsers", r#"[{"email":"a@x.com"}]"#).unwrap();

        let reopened = FileStore::open(dir.path().join("data")).unwrap();
        let raw = reopened.get("registeredUsers").unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed[0]["email"], "a@x.com");
        assert!(!dir.path().join("data/registeredUsers.json.tmp").exists());
    }

    #[test]
    fn missing_and_removed_keys_read_as_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("userData").unwrap(), None);
        store.set("userData", "{}").unwrap();
        store.remove("userData").unwrap();
        store.remove("userData").unwrap();
        assert_eq!(store.get("userData").unwrap(), None);
    }

    #[test]
    fn path_like_keys_are_refused() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let err = store.set("../escape", "[]").unwrap_err();
        assert!(matches!(err, DomainError::Storage(ref msg) if msg.contains("invalid storage key")));
    }
}
