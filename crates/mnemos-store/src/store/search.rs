//! Search operations over the FTS projection and the entries table.

use rusqlite::params;

use mnemos_types::PartialEntry;

use crate::error::{Result, StoreError};

use super::MemoryStore;

/// Cap on fulltext results; bounds downstream assembly cost.
const FULLTEXT_CAP: usize = 10;

/// Excerpt length in a substring result.
const EXCERPT_LEN: usize = 200;

/// Constant weight carried by substring results. Substring search has no
/// true ranking; this is a documented limitation.
const SUBSTRING_RELEVANCE: f32 = 0.8;

impl MemoryStore {
    /// Full-text query over indexed content, context, and tags.
    ///
    /// Tokenizes the input into quoted terms so user text cannot inject
    /// FTS5 operators, ranks by the index's native ordering (bm25), and
    /// caps results at 10. A query with no usable tokens yields no matches.
    pub fn query_fulltext(&self, text: &str) -> Result<Vec<String>> {
        let match_expr = fts_match_expr(text);
        if match_expr.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            r#"
            SELECT e.content
            FROM memory_entries e
            JOIN entry_search s ON e.rowid = s.rowid
            WHERE s.entry_search MATCH ?1
            ORDER BY s.rank
            LIMIT ?2
            "#,
        )?;

        let mut rows = stmt.query(params![match_expr, FULLTEXT_CAP as i64])?;
        let mut contents = Vec::new();
        while let Some(row) = rows.next()? {
            contents.push(row.get(0)?);
        }
        Ok(contents)
    }

    /// Case-normalized substring match against entry content.
    ///
    /// Fallback and complement to fulltext queries. Each result carries the
    /// constant relevance weight and a content excerpt truncated to 200
    /// characters.
    pub fn query_substring(&self, term: &str) -> Result<Vec<PartialEntry>> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = format!("%{}%", like_escape(&needle));

        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            r#"
            SELECT id, type, content
            FROM memory_entries
            WHERE lower(content) LIKE ?1 ESCAPE '\'
            ORDER BY timestamp DESC, rowid DESC
            "#,
        )?;

        let mut rows = stmt.query(params![pattern])?;
        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let type_str: String = row.get(1)?;
            let entry_type = type_str
                .parse()
                .map_err(|e: mnemos_types::EntryTypeParseError| StoreError::Query(e.to_string()))?;
            let content: String = row.get(2)?;

            results.push(PartialEntry {
                id: row.get(0)?,
                entry_type,
                excerpt: truncate_chars(&content, EXCERPT_LEN),
                relevance: SUBSTRING_RELEVANCE,
            });
        }
        Ok(results)
    }
}

/// Build a MATCH expression of quoted tokens joined with OR.
fn fts_match_expr(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
        .map(|t| format!("\"{t}\""))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Escape LIKE wildcards in a user-supplied needle.
fn like_escape(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemos_types::{EntryType, MemoryEntry};

    fn create_test_store() -> MemoryStore {
        MemoryStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_fulltext_matches_across_fields() {
        let store = create_test_store();

        store
            .append(
                MemoryEntry::new(EntryType::Decision, "chose sqlite for storage")
                    .with_context("database selection")
                    .with_tags("decision,pending"),
            )
            .unwrap();

        // content field
        assert_eq!(store.query_fulltext("sqlite").unwrap().len(), 1);
        // context field
        assert_eq!(store.query_fulltext("selection").unwrap().len(), 1);
        // tags field
        assert_eq!(store.query_fulltext("pending").unwrap().len(), 1);
    }

    #[test]
    fn test_fulltext_caps_results() {
        let store = create_test_store();

        for i in 0..15 {
            store
                .append(MemoryEntry::new(
                    EntryType::Task,
                    format!("deploy service number {i}"),
                ))
                .unwrap();
        }

        let hits = store.query_fulltext("deploy").unwrap();
        assert_eq!(hits.len(), 10);
    }

    #[test]
    fn test_fulltext_operators_are_neutralized() {
        let store = create_test_store();
        store
            .append(MemoryEntry::new(EntryType::Task, "plain content"))
            .unwrap();

        // Raw FTS5 syntax would be a parse error; quoting makes it a no-hit
        let hits = store.query_fulltext("NEAR(\"a b\")").unwrap();
        assert!(hits.is_empty());

        assert!(store.query_fulltext("   ").unwrap().is_empty());
    }

    #[test]
    fn test_substring_is_case_normalized() {
        let store = create_test_store();
        store
            .append(MemoryEntry::new(
                EntryType::Pattern,
                "Incremental Rollout worked well",
            ))
            .unwrap();

        let hits = store.query_substring("ROLLOUT").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry_type, EntryType::Pattern);
        assert!((hits[0].relevance - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_substring_truncates_excerpt() {
        let store = create_test_store();
        let long = "x".repeat(500);
        store
            .append(MemoryEntry::new(EntryType::Task, long))
            .unwrap();

        let hits = store.query_substring("xxx").unwrap();
        assert_eq!(hits[0].excerpt.chars().count(), 200);
    }

    #[test]
    fn test_substring_escapes_wildcards() {
        let store = create_test_store();
        store
            .append(MemoryEntry::new(EntryType::Task, "value is 100%"))
            .unwrap();
        store
            .append(MemoryEntry::new(EntryType::Task, "value is 100x"))
            .unwrap();

        let hits = store.query_substring("100%").unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].excerpt.contains('%'));
    }
}
