//! Decision and conversation records.

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Lifecycle status of a decision.
///
/// Status transitions are modeled by writing a new entry referencing the
/// same title and context, not by editing the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    #[default]
    Pending,
    Approved,
    Implemented,
    Failed,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Implemented => "implemented",
            Self::Failed => "failed",
        }
    }
}

/// One alternative considered for a decision.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecisionOption {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pros: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cons: Option<String>,
}

impl DecisionOption {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            pros: None,
            cons: None,
        }
    }
}

/// A choice among options, captured with its rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub title: String,
    pub context: String,
    pub options: Vec<DecisionOption>,
    pub chosen_option: String,
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_maker: Option<String>,
    #[serde(default = "default_signoff")]
    pub stakeholder_signoff: String,
    #[serde(default)]
    pub status: DecisionStatus,
}

fn default_signoff() -> String {
    "Pending".to_string()
}

impl Decision {
    pub fn new(
        title: impl Into<String>,
        context: impl Into<String>,
        options: Vec<DecisionOption>,
        chosen_option: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            context: context.into(),
            options,
            chosen_option: chosen_option.into(),
            rationale: rationale.into(),
            decision_maker: None,
            stakeholder_signoff: default_signoff(),
            status: DecisionStatus::default(),
        }
    }

    pub fn with_decision_maker(mut self, who: impl Into<String>) -> Self {
        self.decision_maker = Some(who.into());
        self
    }

    pub fn with_status(mut self, status: DecisionStatus) -> Self {
        self.status = status;
        self
    }
}

/// A stored decision as it came back from the entry store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: String,
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub decision: Decision,
    /// Number of query terms that matched during relevance filtering.
    /// Zero until a filter has scored the record.
    #[serde(default)]
    pub match_count: usize,
}

/// A logged exchange with the conversational front-end.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(default)]
    pub user_message: String,
    #[serde(default)]
    pub ai_response: String,
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub context: String,
}

impl Interaction {
    pub fn new(user_message: impl Into<String>, ai_response: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            ai_response: ai_response.into(),
            outcome: String::new(),
            context: String::new(),
        }
    }

    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = outcome.into();
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_defaults() {
        let d = Decision::new("Database Choice", "Need to pick one", vec![], "sqlite", "fits");
        assert_eq!(d.status, DecisionStatus::Pending);
        assert_eq!(d.stakeholder_signoff, "Pending");
        assert!(d.decision_maker.is_none());
    }

    #[test]
    fn decision_json_round_trip() {
        let d = Decision::new(
            "UI Framework",
            "Need a frontend",
            vec![DecisionOption::new("A", "first option")],
            "A",
            "simplest",
        )
        .with_status(DecisionStatus::Approved);

        let json = serde_json::to_string(&d).unwrap();
        let back: Decision = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn decision_record_flattens_decision_fields() {
        let record = DecisionRecord {
            id: "decision_x".to_string(),
            timestamp: crate::now(),
            decision: Decision::new("T", "C", vec![], "opt", "why"),
            match_count: 0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["title"], "T");
        assert_eq!(json["id"], "decision_x");
    }
}
