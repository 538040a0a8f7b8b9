//! Entry append and lookup operations.

use chrono::{DateTime, Utc};
use rusqlite::{Row, params};
use tracing::debug;

use mnemos_types::{EntryType, MemoryEntry, generate_entry_id};

use crate::error::{Result, StoreError};
use crate::validation::validate_entry;

use super::MemoryStore;

impl MemoryStore {
    /// Append an entry and index it, returning the assigned id.
    ///
    /// Validates the entry first (`Validation` error, nothing persisted),
    /// assigns an id derived from type, timestamp, and content when the id
    /// is empty, and writes the row plus its search projection in a single
    /// transaction. A failed durable write is fatal to this call; there are
    /// no partial writes.
    pub fn append(&self, mut entry: MemoryEntry) -> Result<String> {
        validate_entry(&entry)?;

        if entry.id.is_empty() {
            entry.id = generate_entry_id(entry.entry_type, entry.timestamp, &entry.content);
        }

        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        // A re-append of the same logical id replaces the prior row and its
        // projection (last write wins). INSERT OR REPLACE assigns a fresh
        // rowid, so the stale projection row must go first.
        let existing_rowid: Option<i64> = tx
            .query_row(
                "SELECT rowid FROM memory_entries WHERE id = ?1",
                params![entry.id],
                |row| row.get(0),
            )
            .ok();
        if let Some(rowid) = existing_rowid {
            tx.execute("DELETE FROM entry_search WHERE rowid = ?1", params![rowid])?;
        }

        tx.execute(
            r#"
            INSERT OR REPLACE INTO memory_entries
                (id, type, content, context, tags, timestamp, relevance_score)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                entry.id,
                entry.entry_type.as_str(),
                entry.content,
                entry.context,
                entry.tags,
                entry.timestamp.to_rfc3339(),
                entry.relevance_score,
            ],
        )?;

        let rowid = tx.last_insert_rowid();
        tx.execute(
            r#"
            INSERT INTO entry_search (rowid, content, context, tags)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![rowid, entry.content, entry.context, entry.tags],
        )?;

        tx.commit()?;

        debug!("Appended entry {}", entry.id);
        Ok(entry.id)
    }

    /// Point lookup by id.
    pub fn get_by_id(&self, id: &str) -> Result<MemoryEntry> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            r#"
            SELECT id, type, content, context, tags, timestamp, relevance_score
            FROM memory_entries
            WHERE id = ?1
            "#,
        )?;

        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => Self::row_to_entry(row),
            None => Err(StoreError::NotFound(format!("entry {id}"))),
        }
    }

    /// The `limit` most recent entries of a type, newest first.
    ///
    /// Timestamp ties break last-in first. An empty store yields an empty
    /// vec, never an error.
    pub fn get_recent(&self, entry_type: EntryType, limit: usize) -> Result<Vec<MemoryEntry>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            r#"
            SELECT id, type, content, context, tags, timestamp, relevance_score
            FROM memory_entries
            WHERE type = ?1
            ORDER BY timestamp DESC, rowid DESC
            LIMIT ?2
            "#,
        )?;

        let mut rows = stmt.query(params![entry_type.as_str(), limit as i64])?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(Self::row_to_entry(row)?);
        }
        Ok(entries)
    }

    /// Count entries, optionally filtered by type.
    pub fn count(&self, entry_type: Option<EntryType>) -> Result<usize> {
        let conn = self.conn.lock().unwrap();

        let count: i64 = match entry_type {
            Some(ty) => conn.query_row(
                "SELECT COUNT(*) FROM memory_entries WHERE type = ?1",
                params![ty.as_str()],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM memory_entries", [], |row| row.get(0))?,
        };

        Ok(count as usize)
    }

    pub(crate) fn row_to_entry(row: &Row<'_>) -> Result<MemoryEntry> {
        let type_str: String = row.get(1)?;
        let entry_type: EntryType = type_str
            .parse()
            .map_err(|e: mnemos_types::EntryTypeParseError| StoreError::Query(e.to_string()))?;

        let timestamp_str: String = row.get(5)?;
        let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
            .map_err(|e| StoreError::Query(format!("bad timestamp: {e}")))?
            .with_timezone(&Utc);

        Ok(MemoryEntry {
            id: row.get(0)?,
            entry_type,
            content: row.get(2)?,
            context: row.get(3)?,
            tags: row.get(4)?,
            timestamp,
            relevance_score: row.get(6)?,
        })
    }
}
