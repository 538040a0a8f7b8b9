//! Per-category relevance scoring for an assembled context.

use std::collections::BTreeMap;

use mnemos_types::{DecisionRecord, PatternMatch};

/// Direct references saturate the score at this count.
const DIRECT_SATURATION: f32 = 10.0;

/// Decision match counts saturate the score at this mean.
const DECISION_SATURATION: f32 = 5.0;

/// Score the populated categories of a context.
///
/// Categories with no hits produce no key at all, so consumers can tell
/// "nothing found" apart from "found but scored zero".
pub fn score_categories(
    direct: &[String],
    patterns: &[PatternMatch],
    decisions: &[DecisionRecord],
) -> BTreeMap<String, f32> {
    let mut scores = BTreeMap::new();

    if !direct.is_empty() {
        let score = (direct.len() as f32 / DIRECT_SATURATION).min(1.0);
        scores.insert("direct_references".to_string(), score);
    }

    if !patterns.is_empty() {
        let mean =
            patterns.iter().map(|p| p.similarity).sum::<f32>() / patterns.len() as f32;
        scores.insert("pattern_matches".to_string(), mean);
    }

    if !decisions.is_empty() {
        let mean = decisions.iter().map(|d| d.match_count as f32).sum::<f32>()
            / decisions.len() as f32;
        scores.insert("decisions".to_string(), (mean / DECISION_SATURATION).min(1.0));
    }

    scores
}
