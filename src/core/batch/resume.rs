//! Resume/dedup filter

use ahash::AHashSet;

/// Identifiers completed by an earlier run. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct ResumeFilter {
    processed: AHashSet<String>,
}

impl ResumeFilter {
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let processed = identifiers
            .into_iter()
            .map(|id| id.as_ref().trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        Self { processed }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        !self.processed.is_empty() && self.processed.contains(identifier.trim())
    }

    pub fn len(&self) -> usize {
        self.processed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }
}
