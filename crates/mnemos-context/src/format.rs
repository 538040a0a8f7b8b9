//! Flat-text rendering of a context bundle for prompt embedding.

use std::fmt::Write;

use mnemos_types::MemoryContext;

/// Bounds applied per render, keeping prompt size predictable.
const MAX_DIRECT: usize = 5;
const MAX_PATTERNS: usize = 3;
const MAX_DECISIONS: usize = 3;
const MAX_SUCCESS: usize = 2;
const MAX_CONFLICTS: usize = 2;

/// Render a context bundle as titled text sections, one per non-empty
/// category. Deterministic for a given bundle; an empty bundle renders
/// to an empty string.
pub fn format_for_prompt(context: &MemoryContext) -> String {
    let mut out = String::new();

    if !context.direct_references.is_empty() {
        push_section(&mut out, "Relevant References");
        for reference in context.direct_references.iter().take(MAX_DIRECT) {
            let _ = writeln!(out, "- {reference}");
        }
    }

    if !context.pattern_matches.is_empty() {
        push_section(&mut out, "Similar Past Work");
        for pattern in context.pattern_matches.iter().take(MAX_PATTERNS) {
            let _ = writeln!(
                out,
                "- {} (similarity {:.2})",
                pattern.excerpt, pattern.similarity
            );
        }
    }

    if !context.recent_decisions.is_empty() {
        push_section(&mut out, "Related Decisions");
        for record in context.recent_decisions.iter().take(MAX_DECISIONS) {
            let _ = writeln!(
                out,
                "- {}: chose {} ({})",
                record.decision.title, record.decision.chosen_option, record.decision.rationale
            );
        }
    }

    if !context.success_patterns.is_empty() {
        push_section(&mut out, "What Has Worked");
        for pattern in context.success_patterns.iter().take(MAX_SUCCESS) {
            match pattern.success_rate {
                Some(rate) => {
                    let _ = writeln!(out, "- {} (success rate {:.0}%)", pattern.description, rate * 100.0);
                }
                None => {
                    let _ = writeln!(out, "- {}", pattern.description);
                }
            }
        }
    }

    if !context.conflict_warnings.is_empty() {
        push_section(&mut out, "Potential Conflicts");
        for warning in context.conflict_warnings.iter().take(MAX_CONFLICTS) {
            let _ = writeln!(
                out,
                "- {}: {}",
                warning.decision_title, warning.recommendation
            );
        }
    }

    out
}

fn push_section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "## {title}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemos_types::{
        ConflictWarning, Decision, DecisionRecord, EntryType, PatternMatch, PatternSummary, now,
    };

    fn decision_record(title: &str) -> DecisionRecord {
        DecisionRecord {
            id: "d1".to_string(),
            timestamp: now(),
            decision: Decision::new(
                title.to_string(),
                "context".to_string(),
                Vec::new(),
                "Option A".to_string(),
                "fits the constraints".to_string(),
            ),
            match_count: 1,
        }
    }

    #[test]
    fn empty_context_renders_empty() {
        let ctx = MemoryContext::empty(now());
        assert_eq!(format_for_prompt(&ctx), "");
    }

    #[test]
    fn only_populated_categories_render() {
        let mut ctx = MemoryContext::empty(now());
        ctx.recent_decisions.push(decision_record("Database Choice"));

        let text = format_for_prompt(&ctx);
        assert!(text.contains("## Related Decisions"));
        assert!(text.contains("Database Choice"));
        assert!(!text.contains("## Relevant References"));
        assert!(!text.contains("## Similar Past Work"));
    }

    #[test]
    fn sections_are_bounded() {
        let mut ctx = MemoryContext::empty(now());
        for i in 0..10 {
            ctx.direct_references.push(format!("reference {i}"));
            ctx.pattern_matches.push(PatternMatch {
                id: format!("p{i}"),
                entry_type: EntryType::Pattern,
                excerpt: format!("pattern {i}"),
                similarity: 0.5,
            });
            ctx.success_patterns.push(PatternSummary {
                description: format!("worked {i}"),
                success_rate: None,
            });
            ctx.conflict_warnings.push(ConflictWarning {
                decision_id: format!("d{i}"),
                decision_title: format!("decision {i}"),
                conflict_score: 0.9,
                recommendation: "review".to_string(),
            });
        }

        let text = format_for_prompt(&ctx);
        assert_eq!(text.matches("- reference").count(), 5);
        assert_eq!(text.matches("- pattern").count(), 3);
        assert_eq!(text.matches("- worked").count(), 2);
        assert_eq!(text.matches(": review").count(), 2);
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut ctx = MemoryContext::empty(now());
        ctx.direct_references.push("a reference".to_string());
        ctx.recent_decisions.push(decision_record("Database Choice"));

        assert_eq!(format_for_prompt(&ctx), format_for_prompt(&ctx));
    }
}
