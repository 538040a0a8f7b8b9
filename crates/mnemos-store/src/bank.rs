//! Human-readable markdown bank.
//!
//! One markdown file per memory category, created from templates on init.
//! These files are append targets for people to read; the SQLite index is
//! the query path and the durable record. Append failures here are logged
//! and reported, but callers treat the indexed write as the one that counts.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use mnemos_types::{DecisionRecord, Interaction, Timestamp};

use crate::error::Result;

/// The category files a bank directory contains.
const BANK_FILES: &[(&str, &str)] = &[
    ("project_essence.md", PROJECT_ESSENCE),
    ("active_context.md", ACTIVE_CONTEXT),
    ("decision_history.md", DECISION_HISTORY),
    ("conversation_memory.md", CONVERSATION_MEMORY),
    ("architecture_evolution.md", ARCHITECTURE_EVOLUTION),
    ("task_patterns.md", TASK_PATTERNS),
    ("stakeholder_context.md", STAKEHOLDER_CONTEXT),
    ("integration_memory.md", INTEGRATION_MEMORY),
    ("success_patterns.md", SUCCESS_PATTERNS),
    ("failure_analysis.md", FAILURE_ANALYSIS),
];

/// Markdown append targets for a project's memory bank.
#[derive(Debug, Clone)]
pub struct MarkdownBank {
    dir: PathBuf,
}

impl MarkdownBank {
    /// Open a bank directory, creating it and any missing category files.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        for (name, template) in BANK_FILES {
            let path = dir.join(name);
            if !path.exists() {
                fs::write(&path, template)?;
            }
        }

        info!("Markdown bank ready at {:?}", dir);
        Ok(Self { dir })
    }

    /// The bank directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Append a stored decision to the decision history file.
    pub fn append_decision(&self, record: &DecisionRecord) -> Result<()> {
        let d = &record.decision;

        let mut options = String::new();
        if d.options.is_empty() {
            options.push_str("No options documented");
        } else {
            for (i, opt) in d.options.iter().enumerate() {
                options.push_str(&format!(
                    "{}. **{}**: {}\n   - Pros: {}\n   - Cons: {}\n",
                    i + 1,
                    opt.name,
                    opt.description,
                    opt.pros.as_deref().unwrap_or("Not specified"),
                    opt.cons.as_deref().unwrap_or("Not specified"),
                ));
            }
        }

        let section = format!(
            "\n### {} - {}: {}\n\n\
             #### Context\n{}\n\n\
             #### Options Considered\n{}\n\
             #### Decision Made\n\
             **Chosen Option**: {}\n\
             **Rationale**: {}\n\
             **Decision Maker**: {}\n\
             **Stakeholder Sign-off**: {}\n\
             **Status**: {}\n\n---\n",
            record.timestamp.to_rfc3339(),
            record.id,
            d.title,
            d.context,
            options,
            d.chosen_option,
            d.rationale,
            d.decision_maker.as_deref().unwrap_or("Unknown"),
            d.stakeholder_signoff,
            d.status.as_str(),
        );

        self.append("decision_history.md", &section)
    }

    /// Append a logged exchange to the conversation memory file.
    pub fn append_interaction(
        &self,
        timestamp: Timestamp,
        interaction: &Interaction,
    ) -> Result<()> {
        let section = format!(
            "\n### {}\n**User**: {}\n**Assistant**: {}\n**Outcome**: {}\n",
            timestamp.to_rfc3339(),
            interaction.user_message,
            interaction.ai_response,
            if interaction.outcome.is_empty() {
                "Not recorded"
            } else {
                &interaction.outcome
            },
        );

        self.append("conversation_memory.md", &section)
    }

    fn append(&self, filename: &str, content: &str) -> Result<()> {
        let path = self.dir.join(filename);
        let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(content.as_bytes())?;
        debug!("Appended to {}", filename);
        Ok(())
    }
}

const PROJECT_ESSENCE: &str = "# Project Essence\n\n\
## Core Purpose\n[Define the fundamental purpose and goals of this project]\n\n\
## Key Stakeholders\n- **Product Owner**: [Name] - [Priorities]\n\
- **Technical Lead**: [Name] - [Constraints]\n\n\
## Success Definition\n[Measurable criteria that define project success]\n\n\
## Core Constraints\n- **Technical**: [Non-negotiable limitations]\n\
- **Business**: [Rules, compliance, budget]\n\
- **Timeline**: [Critical deadlines]\n";

const ACTIVE_CONTEXT: &str = "# Active Context\n\n\
## Current State\n**Phase**: [Current project phase]\n\
**Progress**: [Completion and current focus]\n\n\
## Active Decisions\n[Decisions currently pending or in flight]\n\n\
## Pending Issues\n[Open issues with priority and owner]\n";

const DECISION_HISTORY: &str = "# Decision History\n\n\
*Chronological log of all project decisions with full context and outcomes*\n\n---\n";

const CONVERSATION_MEMORY: &str =
    "# Conversation Memory\n\n*AI interaction patterns and effectiveness tracking*\n";

const ARCHITECTURE_EVOLUTION: &str =
    "# Architecture Evolution\n\n*Technical decisions and system evolution*\n";

const TASK_PATTERNS: &str = "# Task Patterns\n\n*Task breakdown and execution patterns*\n";

const STAKEHOLDER_CONTEXT: &str =
    "# Stakeholder Context\n\n*Stakeholder preferences and feedback*\n";

const INTEGRATION_MEMORY: &str =
    "# Integration Memory\n\n*Multi-component coordination history*\n";

const SUCCESS_PATTERNS: &str = "# Success Patterns\n\n*What worked well and why*\n";

const FAILURE_ANALYSIS: &str = "# Failure Analysis\n\n*What failed and lessons learned*\n";
