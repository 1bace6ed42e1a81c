//! Citation tally accumulation and ranking.
//!
//! A tally maps paper titles to how many times they were reached during
//! a traversal. Titles also carry a first-seen rank so that ranking ties
//! resolve deterministically in discovery order.

use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Clone)]
struct TitleEntry {
    count: u64,
    first_seen: usize,
}

/// Accumulated title counts for one traversal.
#[derive(Debug, Clone, Default)]
pub struct CitationTally {
    entries: HashMap<String, TitleEntry>,
    next_rank: usize,
}

/// One row of ranked tally output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedTitle {
    pub title: String,
    pub count: u64,
}

impl CitationTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `title`.
    pub fn add(&mut self, title: &str) {
        match self.entries.get_mut(title) {
            Some(entry) => entry.count += 1,
            None => {
                self.entries.insert(
                    title.to_string(),
                    TitleEntry {
                        count: 1,
                        first_seen: self.next_rank,
                    },
                );
                self.next_rank += 1;
            }
        }
    }

    /// Fold another tally into this one, summing counts per title.
    ///
    /// Titles new to this tally are appended in the other tally's
    /// discovery order, which keeps the combined ordering deterministic
    /// for any fixed sequence of merges.
    pub fn merge(&mut self, other: CitationTally) {
        let mut incoming: Vec<(String, TitleEntry)> = other.entries.into_iter().collect();
        incoming.sort_by_key(|(_, entry)| entry.first_seen);
        for (title, entry) in incoming {
            match self.entries.get_mut(&title) {
                Some(existing) => existing.count += entry.count,
                None => {
                    self.entries.insert(
                        title,
                        TitleEntry {
                            count: entry.count,
                            first_seen: self.next_rank,
                        },
                    );
                    self.next_rank += 1;
                }
            }
        }
    }

    /// Count recorded for `title`, zero if absent.
    pub fn count(&self, title: &str) -> u64 {
        self.entries.get(title).map(|entry| entry.count).unwrap_or(0)
    }

    /// Number of distinct titles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top titles by count, descending, ties broken by discovery order.
    ///
    /// A `limit` of zero returns the full ranking.
    pub fn ranked(&self, limit: usize) -> Vec<RankedTitle> {
        let mut rows: Vec<(&String, &TitleEntry)> = self.entries.iter().collect();
        rows.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        if limit > 0 {
            rows.truncate(limit);
        }
        rows.into_iter()
            .map(|(title, entry)| RankedTitle {
                title: title.clone(),
                count: entry.count,
            })
            .collect()
    }
}

impl PartialEq for CitationTally {
    /// Tallies compare by title counts alone. Discovery order is an
    /// output-formatting concern, not part of the tally value.
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(title, entry)| other.count(title) == entry.count)
    }
}

impl Eq for CitationTally {}
