//! Entry id generation.
//!
//! Ids are built from a type prefix, the creation timestamp, and a hash of
//! the entry's distinguishing content, so they are stable for identical
//! input and collision-resistant within a project.

use crate::{EntryType, Timestamp};

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// 64-bit FNV-1a over the distinguishing content.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Generate an entry id like `decision_2026-08-26T12:00:00+00:00_9f3a1c...`.
pub fn generate_entry_id(entry_type: EntryType, timestamp: Timestamp, content: &str) -> String {
    format!(
        "{}_{}_{:016x}",
        entry_type.as_str(),
        timestamp.to_rfc3339(),
        fnv1a(content.as_bytes())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::now;

    #[test]
    fn id_is_stable_for_identical_input() {
        let ts = now();
        let a = generate_entry_id(EntryType::Decision, ts, "Database Choice");
        let b = generate_entry_id(EntryType::Decision, ts, "Database Choice");
        assert_eq!(a, b);
        assert!(a.starts_with("decision_"));
    }

    #[test]
    fn id_differs_for_different_content() {
        let ts = now();
        let a = generate_entry_id(EntryType::Task, ts, "one");
        let b = generate_entry_id(EntryType::Task, ts, "two");
        assert_ne!(a, b);
    }
}
