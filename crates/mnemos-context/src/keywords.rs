//! Keyword extraction.
//!
//! The unit several strategies share: lower-case the input, keep tokens of
//! word characters with length >= 3, drop stop words, cap at the first 10
//! survivors in original order. Pure and deterministic, no I/O.

/// Common words carrying no retrieval signal.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "has", "him", "his", "how", "its", "new", "now", "old", "see", "two", "way",
    "who", "did", "get", "let", "put", "say", "she", "too", "use", "using", "with", "from",
    "this", "that", "have", "will", "been", "were", "what", "when", "then", "than", "they",
    "them", "their", "there", "these", "those", "into", "onto", "upon", "over", "very", "much",
    "some", "such", "each", "more", "most", "also", "just", "only", "about", "after", "before",
    "because", "while", "where", "which", "would", "could", "should", "does", "done", "being",
];

/// Cap on extracted terms.
const MAX_TERMS: usize = 10;

/// Extract key terms from free text for matching.
pub fn extract_key_terms(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();

    lower
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| t.len() >= 3)
        .filter(|t| !STOP_WORDS.contains(t))
        .take(MAX_TERMS)
        .map(str::to_string)
        .collect()
}
