use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::error::Result;
use crate::store::EntryStore;

pub const DB_FILE: &str = "entries.db";
pub const CONFIG_FILE: &str = "config.toml";

/// Default data directory: `~/.mental-model`.
pub fn default_data_dir() -> PathBuf {
    dirs_home().join(".mental-model")
}

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

impl EntryStore {
    /// Open `<dir>/entries.db`, creating `dir` if needed.
    /// With no `dir`, uses [`default_data_dir`].
    pub fn open_data_dir(dir: Option<&Path>) -> Result<Self> {
        let dir = dir.map(Path::to_path_buf).unwrap_or_else(default_data_dir);
        fs::create_dir_all(&dir)?;
        let path = dir.join(DB_FILE);
        tracing::debug!("opening entry store at {}", path.display());
        Self::open(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_data_dir_name() {
        assert!(default_data_dir().ends_with(".mental-model"));
    }

    #[test]
    fn test_open_data_dir_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("journal");
        let store = EntryStore::open_data_dir(Some(&dir)).unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(dir.join(DB_FILE).exists());
    }

    #[test]
    fn test_open_data_dir_blocked_by_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("taken");
        fs::write(&blocker, "not a directory").unwrap();
        let err = EntryStore::open_data_dir(Some(&blocker.join("journal"))).err().unwrap();
        assert!(matches!(err, crate::error::StoreError::Io(_)));
    }
}
