//! Indexed entry store for the mnemos project-memory assistant.
//!
//! This crate provides durable, append-only persistence of memory entries
//! (decisions, conversation logs, patterns) backed by a single SQLite file,
//! plus a full-text search projection over entry content.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  MemoryStore                                                 │
//! │  - Single SQLite file with WAL mode                          │
//! │  - memory_entries table (append-only, immutable rows)        │
//! │  - entry_search FTS5 projection (derived, rebuildable)       │
//! └──────────────────────────────────────────────────────────────┘
//! ┌──────────────────────────────────────────────────────────────┐
//! │  MarkdownBank                                                │
//! │  - Human-readable category files (append targets only,       │
//! │    never the query path)                                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The search projection is owned by the store and kept in sync on every
//! append; it is never treated as a source of truth and can be rebuilt by
//! re-scanning the entries table.
//!
//! # Usage
//!
//! ```no_run
//! use mnemos_store::MemoryStore;
//! use mnemos_types::{Decision, DecisionOption};
//!
//! let store = MemoryStore::open("memory_bank/memory_index.db")?;
//!
//! let decision = Decision::new(
//!     "Database Choice",
//!     "Need to select a database",
//!     vec![DecisionOption::new("SQLite", "embedded, zero-ops")],
//!     "SQLite",
//!     "No server to run",
//! );
//! let id = store.store_decision(&decision)?;
//!
//! let hits = store.query_fulltext("database")?;
//! # Ok::<(), mnemos_store::StoreError>(())
//! ```

pub mod bank;
pub mod error;
pub mod store;
pub mod validation;

pub use bank::MarkdownBank;
pub use error::{Result, StoreError};
pub use store::{MemoryStore, StoreStats};
pub use validation::{ValidationError, validate_decision, validate_entry};
