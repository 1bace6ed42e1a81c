//! Fundamental types: paper identifiers and paper records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A new-style arXiv identifier: four digits, a dot, then four or five
/// digits (e.g. `1706.03762`).
///
/// Construction goes through [`PaperId::parse`], so a value of this type
/// always satisfies the strict shape. Version suffixes (`v7`) and old-style
/// `category/NNNNNNN` identifiers are rejected; the traversal works on the
/// canonical unversioned form only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaperId(String);

impl PaperId {
    /// Parse a candidate string, accepting it only if it matches the
    /// canonical shape exactly.
    pub fn parse(raw: &str) -> Option<Self> {
        let candidate = raw.trim();
        if is_canonical_id(candidate) {
            Some(Self(candidate.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaperId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check the strict shape: exactly four digits, a dot, then four or five
/// digits. Nothing else.
fn is_canonical_id(id: &str) -> bool {
    let parts: Vec<&str> = id.split('.').collect();
    if parts.len() != 2 {
        return false;
    }
    let yymm = parts[0];
    let number = parts[1];

    if yymm.len() != 4 || !yymm.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if number.len() < 4 || number.len() > 5 || !number.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    true
}

/// Metadata for one paper: the title it carries and the identifiers found
/// in its text.
///
/// Records are created by the fetcher on a successful lookup (or read back
/// from the cache) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub id: PaperId,
    pub title: String,
    /// Cited identifiers in order of first appearance in the paper's text.
    /// May be empty. The traversal deduplicates at expansion time.
    pub cited_ids: Vec<PaperId>,
    pub fetched_at: DateTime<Utc>,
}

impl PaperRecord {
    pub fn new(id: PaperId, title: impl Into<String>, cited_ids: Vec<PaperId>) -> Self {
        Self {
            id,
            title: title.into(),
            cited_ids,
            fetched_at: Utc::now(),
        }
    }
}
