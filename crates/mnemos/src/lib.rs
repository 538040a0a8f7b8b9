//! mnemos - a project-memory assistant.
//!
//! Persists decisions, conversations, tasks, and observed patterns for a
//! project, and answers free-text queries with an assembled context bundle
//! drawn from everything stored so far.
//!
//! [`MemoryBank`] is the facade: it wires the SQLite entry store, the
//! human-readable markdown bank, and the context engine together for one
//! project directory.
//!
//! ```no_run
//! use mnemos::MemoryBank;
//! use mnemos_config::Settings;
//! use mnemos_types::{Decision, DecisionOption};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let bank = MemoryBank::open("/path/to/project", Settings::default())?;
//!
//! let decision = Decision::new(
//!     "Database Choice",
//!     "Need to select a database",
//!     vec![DecisionOption {
//!         name: "SQLite".into(),
//!         description: "Embedded, zero-ops".into(),
//!         pros: None,
//!         cons: None,
//!     }],
//!     "SQLite",
//!     "Fits the single-user deployment",
//! );
//! bank.store_decision(&decision)?;
//!
//! let context = bank.get_relevant_context("database selection").await;
//! println!("{}", mnemos_context::format_for_prompt(&context));
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use mnemos_config::Settings;
use mnemos_context::{CategoryFilter, ContextEngine, MetricsSnapshot};
use mnemos_store::{MarkdownBank, MemoryStore, Result, StoreStats};
use mnemos_types::{Decision, DecisionRecord, Interaction, MemoryContext, now};

pub use mnemos_config as config;
pub use mnemos_context as context;
pub use mnemos_store as store;
pub use mnemos_types as types;

pub use mnemos_context::format_for_prompt;
pub use mnemos_types::{DecisionOption, DecisionStatus, EntryType};

/// Database filename inside the memory directory.
const DB_FILE: &str = "memory.db";

/// A project's memory: indexed store, markdown bank, and context engine.
pub struct MemoryBank {
    store: Arc<MemoryStore>,
    bank: Option<MarkdownBank>,
    engine: ContextEngine,
    memory_dir: PathBuf,
}

impl MemoryBank {
    /// Open (creating if needed) the memory bank for a project directory.
    ///
    /// The bank lives in `<project>/<memory_dir_name>/`: the SQLite store
    /// plus, when enabled, one markdown file per memory category.
    pub fn open(project_dir: impl AsRef<Path>, settings: Settings) -> Result<Self> {
        let memory_dir = project_dir.as_ref().join(&settings.memory_dir_name);
        let store = Arc::new(MemoryStore::open(memory_dir.join(DB_FILE))?);

        let bank = if settings.bank_enabled {
            Some(MarkdownBank::open(&memory_dir)?)
        } else {
            None
        };

        let engine = ContextEngine::new(store.clone(), settings);
        info!(dir = %memory_dir.display(), "memory bank opened");

        Ok(Self {
            store,
            bank,
            engine,
            memory_dir,
        })
    }

    /// Where this bank's files live.
    pub fn memory_dir(&self) -> &Path {
        &self.memory_dir
    }

    /// Persist a decision, returning its entry id.
    ///
    /// The indexed row is the durable record; the markdown append is
    /// best-effort and a failure there only logs.
    pub fn store_decision(&self, decision: &Decision) -> Result<String> {
        let id = self.store.store_decision(decision)?;

        if let Some(bank) = &self.bank {
            let record = DecisionRecord {
                id: id.clone(),
                timestamp: now(),
                decision: decision.clone(),
                match_count: 0,
            };
            if let Err(err) = bank.append_decision(&record) {
                warn!(%err, "markdown bank append failed for decision");
            }
        }

        Ok(id)
    }

    /// Log a conversation exchange, returning its entry id.
    pub fn track_conversation(&self, interaction: &Interaction) -> Result<String> {
        let id = self.store.track_conversation(interaction)?;

        if let Some(bank) = &self.bank {
            if let Err(err) = bank.append_interaction(now(), interaction) {
                warn!(%err, "markdown bank append failed for interaction");
            }
        }

        Ok(id)
    }

    /// Record a task description; feeds future similarity lookups.
    pub fn store_task(&self, description: &str) -> Result<String> {
        self.store.store_task(description)
    }

    /// Record an observed success or failure pattern.
    pub fn store_pattern(
        &self,
        description: &str,
        outcome_tags: &str,
        success_rate: Option<f32>,
    ) -> Result<String> {
        self.store.store_pattern(description, outcome_tags, success_rate)
    }

    /// Assemble relevant context for a query across every category.
    pub async fn get_relevant_context(&self, query: &str) -> MemoryContext {
        self.engine.get_relevant_context(query).await
    }

    /// Assemble relevant context restricted to selected categories.
    pub async fn get_relevant_context_filtered(
        &self,
        query: &str,
        filter: CategoryFilter,
    ) -> MemoryContext {
        self.engine.get_relevant_context_filtered(query, filter).await
    }

    /// Entry counts and schema version of the underlying store.
    pub fn stats(&self) -> Result<StoreStats> {
        self.store.stats()
    }

    /// Context engine counters since this bank was opened.
    pub fn engine_metrics(&self) -> MetricsSnapshot {
        self.engine.metrics()
    }
}
