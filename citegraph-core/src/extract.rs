//! Identifier extraction from free text and user-supplied locators.
//!
//! Papers reference each other in abstracts and comments using a handful
//! of loose conventions ("arXiv:2301.12345", "[2301.12345]", bare ids,
//! abs URLs). The extractor scans text against a fixed pattern table and
//! returns the canonical ids it finds, deduplicated, in first-appearance
//! order.

use std::collections::HashSet;

use regex::Regex;

use crate::types::PaperId;

/// Extracts paper identifiers from free text and locators.
pub struct IdExtractor {
    patterns: Vec<Regex>,
    locator: Regex,
}

impl IdExtractor {
    /// Create an extractor with the standard citation pattern table.
    pub fn new() -> Self {
        let patterns = vec![
            // "arXiv:2301.12345", case-insensitive, optional space
            Regex::new(r"(?i)arxiv:\s*(\d{4}\.\d{4,5})").unwrap(),
            // "[arXiv:2301.12345]"
            Regex::new(r"(?i)\[arxiv:(\d{4}\.\d{4,5})\]").unwrap(),
            // "[2301.12345]"
            Regex::new(r"\[(\d{4}\.\d{4,5})\]").unwrap(),
            // "arxiv.org/abs/2301.12345"
            Regex::new(r"(?i)arxiv\.org/abs/(\d{4}\.\d{4,5})").unwrap(),
            // bare "2301.12345" on word boundaries
            Regex::new(r"\b(\d{4}\.\d{4,5})\b").unwrap(),
        ];
        // The id must end at a non-digit so overlong numbers are rejected, not truncated.
        let locator = Regex::new(r"/abs/(\d{4}\.\d{4,5})(?:\D|$)").unwrap();
        Self { patterns, locator }
    }

    /// Extract the identifier from a user-supplied locator.
    ///
    /// Accepts an abs URL in any common form (with or without scheme,
    /// with a version suffix or query string trailing the id) or a bare
    /// canonical id. Returns `None` when no identifier can be found.
    pub fn from_locator(&self, locator: &str) -> Option<PaperId> {
        let trimmed = locator.trim();
        if let Some(caps) = self.locator.captures(trimmed) {
            return PaperId::parse(&caps[1]);
        }
        PaperId::parse(trimmed)
    }

    /// Scan free text for cited paper ids.
    ///
    /// Every pattern in the table runs over the full text. Results are
    /// deduplicated and kept in order of first appearance across the
    /// pattern table.
    pub fn scan(&self, text: &str) -> Vec<PaperId> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for pattern in &self.patterns {
            for caps in pattern.captures_iter(text) {
                if let Some(id) = PaperId::parse(&caps[1])
                    && seen.insert(id.clone())
                {
                    found.push(id);
                }
            }
        }
        found
    }
}

impl Default for IdExtractor {
    fn default() -> Self {
        Self::new()
    }
}
