use std::path::{Path, PathBuf};

use indexmap::IndexSet;

/// Identifiers of the documents currently being loaded, outermost first.
///
/// One set is owned by each top-level load and threaded through every nested
/// import, so concurrent loads never observe each other's entries.
#[derive(Debug, Clone, Default)]
pub struct LoadingSet {
    entries: IndexSet<PathBuf>,
}

impl LoadingSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: &Path) -> bool {
        self.entries.contains(id)
    }

    /// Mark `id` as in progress. Returns `false` if it already was.
    pub fn enter(&mut self, id: PathBuf) -> bool {
        self.entries.insert(id)
    }

    /// Remove `id` once its load has finished, successfully or not.
    pub fn leave(&mut self, id: &Path) {
        self.entries.shift_remove(id);
    }

    /// The in-progress chain followed by `id`, for cycle diagnostics.
    #[must_use]
    pub fn chain_to(&self, id: &Path) -> Vec<PathBuf> {
        self.entries
            .iter()
            .cloned()
            .chain(std::iter::once(id.to_path_buf()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
