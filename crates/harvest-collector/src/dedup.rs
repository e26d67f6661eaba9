use std::collections::HashSet;

/// Identity set of items already admitted during a run.
///
/// Grows monotonically; nothing is ever evicted.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Marks `id` as seen. Returns `false` if it was already present.
    pub fn admit(&mut self, id: &str) -> bool {
        self.seen.insert(id.to_owned())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
