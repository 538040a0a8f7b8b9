//! Decision and conversation writers, and their read-back paths.

use tracing::warn;

use mnemos_types::{Decision, DecisionRecord, EntryType, Interaction, MemoryEntry};

use crate::error::Result;
use crate::validation::validate_decision;

use super::MemoryStore;

impl MemoryStore {
    /// Store a decision as an indexed entry, returning its id.
    ///
    /// Required fields {title, context, options, chosen_option, rationale}
    /// are checked first; a validation failure persists nothing. Status
    /// transitions are made by storing a new decision for the same title
    /// and context, never by editing a stored one.
    pub fn store_decision(&self, decision: &Decision) -> Result<String> {
        validate_decision(decision)?;

        let content = serde_json::to_string(decision)?;
        let entry = MemoryEntry::new(EntryType::Decision, content)
            .with_context(decision.context.clone())
            .with_tags(format!("decision,{}", decision.status.as_str()));

        self.append(entry)
    }

    /// Log a conversational exchange, returning its id.
    ///
    /// Validation here is looser than for decisions: any exchange with at
    /// least one non-empty field is accepted.
    pub fn track_conversation(&self, interaction: &Interaction) -> Result<String> {
        let content = serde_json::to_string(interaction)?;
        let entry = MemoryEntry::new(EntryType::Conversation, content)
            .with_context(interaction.context.clone())
            .with_tags("conversation,ai_interaction".to_string());

        self.append(entry)
    }

    /// The most recent decisions with their payloads decoded.
    ///
    /// Rows whose payload no longer decodes are skipped with a warning;
    /// the read path degrades rather than failing the whole call.
    pub fn recent_decisions(&self, limit: usize) -> Result<Vec<DecisionRecord>> {
        let entries = self.get_recent(EntryType::Decision, limit)?;

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_str::<Decision>(&entry.content) {
                Ok(decision) => records.push(DecisionRecord {
                    id: entry.id,
                    timestamp: entry.timestamp,
                    decision,
                    match_count: 0,
                }),
                Err(e) => warn!("Skipping undecodable decision {}: {}", entry.id, e),
            }
        }
        Ok(records)
    }

    /// The most recent conversation interactions, newest first.
    pub fn recent_interactions(&self, limit: usize) -> Result<Vec<Interaction>> {
        let entries = self.get_recent(EntryType::Conversation, limit)?;

        let mut interactions = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_str::<Interaction>(&entry.content) {
                Ok(interaction) => interactions.push(interaction),
                Err(e) => warn!("Skipping undecodable interaction {}: {}", entry.id, e),
            }
        }
        Ok(interactions)
    }

    /// Record a pattern observation (success or failure) for later recall.
    pub fn store_pattern(
        &self,
        description: &str,
        outcome_tags: &str,
        success_rate: Option<f32>,
    ) -> Result<String> {
        let payload = serde_json::json!({
            "description": description,
            "success_rate": success_rate,
        });
        let entry = MemoryEntry::new(EntryType::Pattern, payload.to_string())
            .with_context(description.to_string())
            .with_tags(format!("pattern,{outcome_tags}"));

        self.append(entry)
    }

    /// Record a task description; feeds the similarity strategy's corpus.
    pub fn store_task(&self, description: &str) -> Result<String> {
        let entry = MemoryEntry::new(EntryType::Task, description.to_string())
            .with_context(description.to_string())
            .with_tags("task".to_string());

        self.append(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemos_types::{DecisionOption, DecisionStatus};

    fn create_test_store() -> MemoryStore {
        MemoryStore::open_in_memory().unwrap()
    }

    fn sample_decision() -> Decision {
        Decision::new(
            "Database Choice",
            "Need to select a database",
            vec![DecisionOption::new("SQLite", "embedded")],
            "SQLite",
            "No server to operate",
        )
    }

    #[test]
    fn test_store_decision_round_trip() {
        let store = create_test_store();

        let id = store.store_decision(&sample_decision()).unwrap();
        assert!(id.starts_with("decision_"));

        let records = store.recent_decisions(10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].decision.title, "Database Choice");
        assert_eq!(records[0].decision.rationale, "No server to operate");
        assert_eq!(records[0].id, id);
    }

    #[test]
    fn test_store_decision_missing_field_persists_nothing() {
        let store = create_test_store();

        let mut decision = sample_decision();
        decision.rationale.clear();

        assert!(store.store_decision(&decision).is_err());
        assert_eq!(store.count(None).unwrap(), 0);
    }

    #[test]
    fn test_decision_tags_carry_status() {
        let store = create_test_store();

        let decision = sample_decision().with_status(DecisionStatus::Approved);
        let id = store.store_decision(&decision).unwrap();

        let entry = store.get_by_id(&id).unwrap();
        assert_eq!(entry.tags, "decision,approved");
    }

    #[test]
    fn test_track_conversation() {
        let store = create_test_store();

        let interaction = Interaction::new("How do we deploy?", "Use the staging pipeline")
            .with_context("deployment discussion");
        let id = store.track_conversation(&interaction).unwrap();
        assert!(id.starts_with("conversation_"));

        let back = store.recent_interactions(5).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].user_message, "How do we deploy?");
    }

    #[test]
    fn test_recent_decisions_skips_undecodable_rows() {
        let store = create_test_store();

        store.store_decision(&sample_decision()).unwrap();
        store
            .append(
                MemoryEntry::new(EntryType::Decision, "not json at all")
                    .with_tags("decision,pending".to_string()),
            )
            .unwrap();

        let records = store.recent_decisions(10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].decision.title, "Database Choice");
    }

    #[test]
    fn test_store_pattern_is_searchable() {
        let store = create_test_store();

        store
            .store_pattern("Incremental rollout avoided downtime", "success", Some(0.92))
            .unwrap();

        let hits = store.query_fulltext("rollout").unwrap();
        assert_eq!(hits.len(), 1);
    }
}
