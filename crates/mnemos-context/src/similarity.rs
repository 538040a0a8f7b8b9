//! Two-tier similarity over historical task and pattern descriptions.
//!
//! The primary path vectorizes the candidate corpus with TF-IDF and ranks
//! by cosine similarity against the query. When vectorization degenerates
//! (the corpus yields no usable vocabulary, or the query shares no terms
//! with it), the fallback ranks by raw word-set overlap instead.

use std::collections::{HashMap, HashSet};

use mnemos_types::{MemoryEntry, PatternMatch};

/// Minimum cosine similarity for a match to survive.
const SIMILARITY_THRESHOLD: f32 = 0.3;

/// Maximum matches returned.
const MAX_MATCHES: usize = 5;

/// Excerpt length carried into a match.
const EXCERPT_LEN: usize = 200;

/// Rank candidate entries by similarity to the query.
///
/// Returns at most five matches above the similarity threshold, highest
/// first. An empty candidate list yields no matches.
pub fn find_similar(query: &str, candidates: &[MemoryEntry]) -> Vec<PatternMatch> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let docs: Vec<&str> = candidates.iter().map(doc_text).collect();

    match tfidf_similarities(query, &docs) {
        Some(similarities) => collect_matches(candidates, &similarities, SIMILARITY_THRESHOLD),
        None => {
            let similarities: Vec<f32> =
                docs.iter().map(|d| keyword_overlap(query, d)).collect();
            collect_matches(candidates, &similarities, 0.0)
        }
    }
}

/// Jaccard overlap of the raw lowercase word sets of two texts.
///
/// Coarser than the vector path on purpose: it still produces a signal
/// when the texts are too short or too uniform to vectorize.
pub fn keyword_overlap(a: &str, b: &str) -> f32 {
    let set_a: HashSet<String> = a.to_lowercase().split_whitespace().map(String::from).collect();
    let set_b: HashSet<String> = b.to_lowercase().split_whitespace().map(String::from).collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f32 / union as f32
}

/// Searchable text of a candidate: context when present, else content.
fn doc_text(entry: &MemoryEntry) -> &str {
    if entry.context.is_empty() {
        &entry.content
    } else {
        &entry.context
    }
}

fn collect_matches(
    candidates: &[MemoryEntry],
    similarities: &[f32],
    threshold: f32,
) -> Vec<PatternMatch> {
    let mut matches: Vec<PatternMatch> = candidates
        .iter()
        .zip(similarities)
        .filter(|&(_, &sim)| sim > threshold)
        .map(|(entry, &sim)| PatternMatch {
            id: entry.id.clone(),
            entry_type: entry.entry_type,
            excerpt: doc_text(entry).chars().take(EXCERPT_LEN).collect(),
            similarity: sim,
        })
        .collect();

    matches.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches.truncate(MAX_MATCHES);
    matches
}

/// Cosine similarity of the query against each document, or `None` when the
/// corpus yields no usable vocabulary or the query has no weight in it.
fn tfidf_similarities(query: &str, docs: &[&str]) -> Option<Vec<f32>> {
    let vocab = build_vocab(docs)?;

    let query_vec = tfidf_vector(query, &vocab);
    if query_vec.iter().all(|v| *v == 0.0) {
        return None;
    }

    Some(
        docs.iter()
            .map(|doc| cosine_similarity(&query_vec, &tfidf_vector(doc, &vocab)))
            .collect(),
    )
}

struct Vocabulary {
    token_to_idx: HashMap<String, usize>,
    idf: Vec<f32>,
}

/// Build a vocabulary over the candidate documents.
fn build_vocab(docs: &[&str]) -> Option<Vocabulary> {
    let mut doc_freq: HashMap<String, usize> = HashMap::new();

    for doc in docs {
        let unique: HashSet<String> = tokenize(doc).into_iter().collect();
        for tok in unique {
            *doc_freq.entry(tok).or_insert(0) += 1;
        }
    }

    if doc_freq.is_empty() {
        return None;
    }

    // Deterministic ordering keeps vectors reproducible across calls
    let mut entries: Vec<(String, usize)> = doc_freq.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let num_docs = docs.len();
    let mut token_to_idx = HashMap::with_capacity(entries.len());
    let mut idf = Vec::with_capacity(entries.len());
    for (idx, (token, freq)) in entries.into_iter().enumerate() {
        token_to_idx.insert(token, idx);
        // log(N / df) + 1; the +1 keeps ubiquitous terms from zeroing out
        idf.push((num_docs as f32 / freq as f32).ln() + 1.0);
    }

    Some(Vocabulary { token_to_idx, idf })
}

/// Normalized TF-IDF vector for one text.
fn tfidf_vector(text: &str, vocab: &Vocabulary) -> Vec<f32> {
    let tokens = tokenize(text);
    let total = tokens.len().max(1) as f32;

    let mut vec = vec![0.0f32; vocab.idf.len()];
    for tok in &tokens {
        if let Some(&idx) = vocab.token_to_idx.get(tok.as_str()) {
            vec[idx] += 1.0 / total;
        }
    }
    for (v, idf) in vec.iter_mut().zip(&vocab.idf) {
        *v *= idf;
    }

    let mag: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if mag > 0.0 {
        for v in &mut vec {
            *v /= mag;
        }
    }
    vec
}

/// Vectorization tokens: lowercase alphanumeric runs of three or more
/// characters. Shorter runs carry too little signal to weight.
fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| t.len() >= 3)
        .map(str::to_string)
        .collect()
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut mag_a = 0.0f32;
    let mut mag_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }
    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom == 0.0 { 0.0 } else { dot / denom }
}
