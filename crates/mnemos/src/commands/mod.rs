//! CLI command handlers.

use std::path::PathBuf;

use anyhow::Result;

use mnemos::MemoryBank;
use mnemos_config::Settings;

pub mod decision;
pub mod query;
pub mod stats;
pub mod track;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Project directory holding the memory bank.
    pub project: PathBuf,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Open the project's memory bank with environment-derived settings.
    pub fn open_bank(&self) -> Result<MemoryBank> {
        let settings = Settings::from_env()?;
        Ok(MemoryBank::open(&self.project, settings)?)
    }
}
