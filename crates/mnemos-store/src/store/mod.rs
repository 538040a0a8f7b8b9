//! Entry store implementation using SQLite.
//!
//! A single database file holds the append-only `memory_entries` table and
//! the `entry_search` FTS5 projection. Schema creation happens inside
//! `open`, before the store is handed to any caller, so there is no window
//! between "store constructed" and "store ready".

mod entry_ops;
mod record_ops;
mod search;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use crate::error::Result;

/// Current schema version for migrations.
const SCHEMA_VERSION: i32 = 1;

/// Entry store backed by SQLite.
///
/// Uses WAL mode for better concurrent read performance. Appends are
/// infrequent enough that per-write index updates suffice; there is no
/// batching or write-ahead staging. Concurrent appends to the same logical
/// entry id resolve last-write-wins.
pub struct MemoryStore {
    /// The SQLite connection (wrapped in Mutex for thread safety).
    pub(crate) conn: Mutex<Connection>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl MemoryStore {
    /// Open or create an entry store at the given path.
    ///
    /// Creates the database file (and parent directory) and initializes the
    /// schema if needed. Returns only once the store is fully ready.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;

        info!("Entry store opened at {:?}", path);
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;

        info!("In-memory entry store created");
        Ok(store)
    }

    /// Initialize the database with schema and pragmas.
    fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        // WAL gives readers a consistent view while a write is in flight
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        self.create_schema(&conn)?;
        Ok(())
    }

    /// Create the database schema.
    fn create_schema(&self, conn: &Connection) -> Result<()> {
        let current_version: i32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap_or(0);

        if current_version >= SCHEMA_VERSION {
            debug!("Schema up to date (version {})", current_version);
            return Ok(());
        }

        conn.execute_batch(
            r#"
            -- Entries table: append-only, rows are never updated in place
            CREATE TABLE IF NOT EXISTS memory_entries (
                id TEXT PRIMARY KEY,
                type TEXT NOT NULL,
                content TEXT NOT NULL,
                context TEXT NOT NULL DEFAULT '',
                tags TEXT NOT NULL DEFAULT '',
                timestamp TEXT NOT NULL,
                relevance_score REAL NOT NULL DEFAULT 0.0
            );

            CREATE INDEX IF NOT EXISTS idx_entries_type
                ON memory_entries(type);

            CREATE INDEX IF NOT EXISTS idx_entries_timestamp
                ON memory_entries(timestamp);

            -- Full-text projection over searchable fields, keyed by the
            -- entry's rowid. Derived data: rebuildable via rebuild_index().
            CREATE VIRTUAL TABLE IF NOT EXISTS entry_search
                USING fts5(content, context, tags);
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        info!("Schema created (version {})", SCHEMA_VERSION);
        Ok(())
    }

    /// Rebuild the search projection by re-scanning the entries table.
    ///
    /// The projection is never a source of truth; this restores it after
    /// corruption or a schema change. Returns the number of entries indexed.
    pub fn rebuild_index(&self) -> Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM entry_search", [])?;
        let indexed = tx.execute(
            r#"
            INSERT INTO entry_search (rowid, content, context, tags)
            SELECT rowid, content, context, tags FROM memory_entries
            "#,
            [],
        )?;

        tx.commit()?;
        info!("Search index rebuilt ({} entries)", indexed);
        Ok(indexed)
    }

    /// Counts of stored entries by kind.
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.conn.lock().unwrap();

        let entry_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM memory_entries", [], |row| row.get(0))?;
        let decision_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM memory_entries WHERE type = 'decision'",
            [],
            |row| row.get(0),
        )?;
        let conversation_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM memory_entries WHERE type = 'conversation'",
            [],
            |row| row.get(0),
        )?;

        Ok(StoreStats {
            entry_count: entry_count as usize,
            decision_count: decision_count as usize,
            conversation_count: conversation_count as usize,
            schema_version: SCHEMA_VERSION,
        })
    }
}

/// Statistics about the entry store.
#[derive(Debug, Clone)]
pub struct StoreStats {
    /// Total entries stored.
    pub entry_count: usize,
    /// Entries of type decision.
    pub decision_count: usize,
    /// Entries of type conversation.
    pub conversation_count: usize,
    /// Current schema version.
    pub schema_version: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemos_types::{EntryType, MemoryEntry};

    #[test]
    fn test_open_in_memory() {
        let store = MemoryStore::open_in_memory().unwrap();
        let stats = store.stats().unwrap();
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_open_on_disk_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory_bank").join("memory_index.db");
        let store = MemoryStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.stats().unwrap().entry_count, 0);
    }

    #[test]
    fn test_reopen_preserves_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory_index.db");

        {
            let store = MemoryStore::open(&path).unwrap();
            store
                .append(MemoryEntry::new(EntryType::Task, "persisted task"))
                .unwrap();
        }

        let store = MemoryStore::open(&path).unwrap();
        assert_eq!(store.stats().unwrap().entry_count, 1);
        let hits = store.query_fulltext("persisted").unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_rebuild_index_restores_search() {
        let store = MemoryStore::open_in_memory().unwrap();
        store
            .append(MemoryEntry::new(EntryType::Task, "indexed content"))
            .unwrap();

        {
            let conn = store.conn.lock().unwrap();
            conn.execute("DELETE FROM entry_search", []).unwrap();
        }
        assert!(store.query_fulltext("indexed").unwrap().is_empty());

        let indexed = store.rebuild_index().unwrap();
        assert_eq!(indexed, 1);
        assert_eq!(store.query_fulltext("indexed").unwrap().len(), 1);
    }
}
