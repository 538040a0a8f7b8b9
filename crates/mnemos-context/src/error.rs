//! Error types for context assembly.

use thiserror::Error;

/// Failure of an individual retrieval strategy.
///
/// Internal only: captured at the assembler's merge point and converted to
/// the category's empty default. Callers of the assembler never see it.
#[derive(Debug, Clone, Error)]
pub enum StrategyError {
    /// The backing source (store or index) failed.
    #[error("source error: {0}")]
    Source(String),
}
