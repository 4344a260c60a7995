use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Transaction, params};

use mm_core::{Entry, now_iso8601};

use crate::error::{Result, StoreError};
use crate::schema;

/// Cheap change detector for memoizing engine output.
///
/// `revision` increases on every write, so two equal fingerprints taken from
/// the same store mean the entries have not changed in between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub entries: usize,
    pub revision: u64,
}

pub struct EntryStore {
    conn: Connection,
}

impl EntryStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    // --- Metadata ---

    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM metadata WHERE key = ?1")?;
        let result = stmt.query_row([key], |row| row.get(0)).ok();
        Ok(result)
    }

    pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // --- Writes ---

    /// Insert `entry`, or replace the stored entry with the same id.
    /// A replaced entry keeps its original load position.
    pub fn upsert_entry(&self, entry: &Entry) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        Self::upsert_on(&tx, entry, &now_iso8601())?;
        Self::bump_revision(&tx)?;
        tx.commit()?;
        Ok(())
    }

    /// Upsert a batch in one transaction. Either every entry lands or none do.
    pub fn upsert_entries(&self, entries: &[Entry]) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.unchecked_transaction()?;
        let updated_at = now_iso8601();
        for entry in entries {
            Self::upsert_on(&tx, entry, &updated_at)?;
        }
        Self::bump_revision(&tx)?;
        tx.commit()?;

        tracing::info!("stored {} entries", entries.len());
        Ok(entries.len())
    }

    /// Remove the entry with `id`. Returns whether anything was deleted.
    pub fn delete_entry(&self, id: &str) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        let deleted = tx.execute("DELETE FROM entries WHERE id = ?1", [id])?;
        if deleted > 0 {
            Self::bump_revision(&tx)?;
        }
        tx.commit()?;
        Ok(deleted > 0)
    }

    fn upsert_on(tx: &Transaction<'_>, entry: &Entry, updated_at: &str) -> Result<()> {
        if entry.id.is_empty() {
            return Err(StoreError::InvalidData("entry id must not be empty".into()));
        }
        let payload = serde_json::to_string(entry)?;
        tx.execute(
            "INSERT INTO entries (id, date, kind, payload, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                date = excluded.date,
                kind = excluded.kind,
                payload = excluded.payload,
                updated_at = excluded.updated_at",
            params![entry.id, entry.date, entry.kind(), payload, updated_at],
        )?;
        Ok(())
    }

    fn bump_revision(tx: &Transaction<'_>) -> Result<()> {
        tx.execute(
            "UPDATE metadata SET value = CAST(value AS INTEGER) + 1 WHERE key = 'revision'",
            [],
        )?;
        Ok(())
    }

    // --- Reads ---

    /// All entries in insertion order.
    pub fn load_entries(&self) -> Result<Vec<Entry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM entries ORDER BY seq")?;
        let payloads: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<_, _>>()?;

        let mut entries = Vec::with_capacity(payloads.len());
        for payload in &payloads {
            entries.push(serde_json::from_str(payload)?);
        }
        Ok(entries)
    }

    pub fn get_entry(&self, id: &str) -> Result<Option<Entry>> {
        let payload: Option<String> = self
            .conn
            .query_row("SELECT payload FROM entries WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?;
        match payload {
            Some(p) => Ok(Some(serde_json::from_str(&p)?)),
            None => Ok(None),
        }
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT count(*) FROM entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn fingerprint(&self) -> Result<Fingerprint> {
        let revision = self
            .get_metadata("revision")?
            .map(|v| {
                v.parse::<u64>()
                    .map_err(|_| StoreError::InvalidData(format!("bad revision counter: {v}")))
            })
            .transpose()?
            .unwrap_or(0);
        Ok(Fingerprint {
            entries: self.count()?,
            revision,
        })
    }
}
