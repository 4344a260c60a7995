use std::fs;
use std::path::Path;

use uuid::Uuid;

use mm_core::Entry;

use crate::error::{Result, StoreError};
use crate::store::EntryStore;

impl EntryStore {
    /// Import a JSON array of entries from `path`. Returns the number stored.
    pub fn import_json_file(&self, path: &Path) -> Result<usize> {
        let json = fs::read_to_string(path)?;
        self.import_json_str(&json)
    }

    /// Import a JSON array of entries.
    ///
    /// Individual records are parsed leniently, but the document itself must
    /// be an array. Records without an id are given a fresh UUID.
    pub fn import_json_str(&self, json: &str) -> Result<usize> {
        let mut entries: Vec<Entry> = serde_json::from_str(json)
            .map_err(|e| StoreError::InvalidData(format!("expected a JSON array of entries: {e}")))?;

        let mut generated = 0;
        for entry in entries.iter_mut().filter(|e| e.id.is_empty()) {
            entry.id = Uuid::new_v4().to_string();
            generated += 1;
        }
        if generated > 0 {
            tracing::warn!("{generated} imported entries had no id; assigned UUIDs");
        }

        self.upsert_entries(&entries)
    }

    /// All entries as a pretty-printed JSON array, in load order.
    pub fn export_json(&self) -> Result<String> {
        let entries = self.load_entries()?;
        Ok(serde_json::to_string_pretty(&entries)?)
    }

    pub fn export_json_file(&self, path: &Path) -> Result<()> {
        let json = self.export_json()?;
        fs::write(path, json)?;
        Ok(())
    }
}
