use std::collections::{HashMap, HashSet};

use medreg_domain::Dataset;

/// Persisted business keys of the datasets a mapper validates references
/// against. Each dataset is loaded at most once per run, on first need, and
/// the loaded set is never refreshed while the run is in flight.
///
/// Keys are canonical [`BusinessKey`](medreg_domain::BusinessKey) strings,
/// so composite references compare the same way they are stored.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    keys: HashMap<Dataset, HashSet<String>>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        ReferenceCache::default()
    }

    /// Load a dataset's key set through `loader` unless it is already
    /// memoized. The loader runs inside the caller's transaction, so a
    /// dataset reconciled earlier in the same run is visible here.
    pub fn ensure_loaded<E>(
        &mut self,
        dataset: Dataset,
        loader: impl FnOnce() -> Result<HashSet<String>, E>,
    ) -> Result<(), E> {
        if !self.keys.contains_key(&dataset) {
            let loaded = loader()?;
            self.keys.insert(dataset, loaded);
        }
        Ok(())
    }

    pub fn is_loaded(&self, dataset: Dataset) -> bool {
        self.keys.contains_key(&dataset)
    }

    /// Membership test. The dataset must have been loaded first; an
    /// unloaded dataset means the orchestrator's dependency list is wrong.
    pub fn contains(&self, dataset: Dataset, key: &str) -> bool {
        debug_assert!(
            self.is_loaded(dataset),
            "reference lookup against unloaded dataset {dataset}"
        );
        self.keys
            .get(&dataset)
            .map(|set| set.contains(key))
            .unwrap_or(false)
    }

    pub fn len(&self, dataset: Dataset) -> usize {
        self.keys.get(&dataset).map(HashSet::len).unwrap_or(0)
    }
}
