use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context as _;

/// The durable key-value primitive the engine persists through.
///
/// Absence is a normal outcome (`Ok(None)`), never an error; values are the
/// serialized documents themselves. Keys are plain file-name-safe strings.
pub trait KvStore: Send + Sync {
    fn read(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn delete(&self, key: &str) -> anyhow::Result<()>;
}

/// One file per key under a base directory.
#[derive(Debug, Clone)]
pub struct LocalFsStore {
    base_dir: PathBuf,
}

impl LocalFsStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(key)
    }
}

impl KvStore for LocalFsStore {
    fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.key_path(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("read store key: {}", path.display()))
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        write_atomic(&self.key_path(key), value)
    }

    fn delete(&self, key: &str) -> anyhow::Result<()> {
        let path = self.key_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("delete store key: {}", path.display()))
            }
        }
    }
}

fn write_atomic(path: &Path, value: &str) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("store path has no parent: {}", path.display()))?;
    std::fs::create_dir_all(parent)
        .with_context(|| format!("create store dir: {}", parent.display()))?;

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    std::fs::write(&tmp_path, value)
        .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;
    Ok(())
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemStore {
    fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("mem store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("mem store lock poisoned"))?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("mem store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_fs_round_trips_and_treats_absence_as_none() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = LocalFsStore::new(dir.path());

        assert_eq!(store.read("history.log")?, None);

        store.write("history.log", "[]")?;
        assert_eq!(store.read("history.log")?.as_deref(), Some("[]"));

        store.delete("history.log")?;
        assert_eq!(store.read("history.log")?, None);

        Ok(())
    }

    #[test]
    fn local_fs_delete_of_missing_key_is_ok() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = LocalFsStore::new(dir.path());
        store.delete("never-written")?;
        Ok(())
    }

    #[test]
    fn local_fs_overwrite_replaces_value() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = LocalFsStore::new(dir.path());

        store.write("k", "one")?;
        store.write("k", "two")?;
        assert_eq!(store.read("k")?.as_deref(), Some("two"));

        Ok(())
    }

    #[test]
    fn mem_store_round_trips() -> anyhow::Result<()> {
        let store = MemStore::new();
        assert_eq!(store.read("k")?, None);

        store.write("k", "v")?;
        assert_eq!(store.read("k")?.as_deref(), Some("v"));

        store.delete("k")?;
        assert_eq!(store.read("k")?, None);

        Ok(())
    }
}
