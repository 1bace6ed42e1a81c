//! Visited-set bookkeeping for cycle-safe traversal.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::types::PaperId;

/// Thread-safe set of paper ids already claimed by a traversal.
///
/// Claiming is atomic: exactly one caller wins each id, so a paper is
/// expanded at most once per run even when siblings cite it from
/// concurrent fetches.
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<HashSet<PaperId>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id` for expansion. Returns true if this call was the
    /// first to claim it.
    pub fn claim(&self, id: &PaperId) -> bool {
        self.inner.lock().unwrap().insert(id.clone())
    }

    pub fn contains(&self, id: &PaperId) -> bool {
        self.inner.lock().unwrap().contains(id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}
