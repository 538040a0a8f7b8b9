//! Validation for entries and decisions before they reach durable storage.

use mnemos_types::{Decision, MemoryEntry};

/// Specific validation failures for write-path data.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    /// A required decision field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Entry content is empty.
    #[error("entry content is empty")]
    EmptyContent,

    /// Relevance score is outside [0.0, 1.0].
    #[error("relevance score {0} is out of range [0.0, 1.0]")]
    ScoreOutOfRange(f32),
}

/// Validate an entry before it is appended.
///
/// The entry type is a closed enum, so membership is enforced by the type
/// system; this checks the remaining invariants.
pub fn validate_entry(entry: &MemoryEntry) -> Result<(), ValidationError> {
    if entry.content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    if !(0.0..=1.0).contains(&entry.relevance_score) || entry.relevance_score.is_nan() {
        return Err(ValidationError::ScoreOutOfRange(entry.relevance_score));
    }
    Ok(())
}

/// Validate that a decision carries all required fields.
///
/// Empty strings and an empty options list count as missing.
pub fn validate_decision(decision: &Decision) -> Result<(), ValidationError> {
    if decision.title.is_empty() {
        return Err(ValidationError::MissingField("title"));
    }
    if decision.context.is_empty() {
        return Err(ValidationError::MissingField("context"));
    }
    if decision.options.is_empty() {
        return Err(ValidationError::MissingField("options"));
    }
    if decision.chosen_option.is_empty() {
        return Err(ValidationError::MissingField("chosen_option"));
    }
    if decision.rationale.is_empty() {
        return Err(ValidationError::MissingField("rationale"));
    }
    Ok(())
}
