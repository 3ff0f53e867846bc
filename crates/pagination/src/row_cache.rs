use serde_json::{Map, Value};

use crate::{OptionsKey, PageCache};

/// Shallow merge of a partial row over a full one.
pub trait MergePatch {
    fn merge_patch(&self, patch: &Self) -> Self;
}

impl MergePatch for Map<String, Value> {
    fn merge_patch(&self, patch: &Self) -> Self {
        let mut merged = self.clone();

        for (key, value) in patch {
            merged.insert(key.clone(), value.clone());
        }

        merged
    }
}

impl MergePatch for Value {
    fn merge_patch(&self, patch: &Self) -> Self {
        match (self, patch) {
            (Value::Object(row), Value::Object(patch)) => Value::Object(row.merge_patch(patch)),
            _ => patch.clone(),
        }
    }
}

/// Row-level reads and local patches over the pages of one set of options.
///
/// Nothing here goes to the network. Patches are meant for rows a mutation already changed on
/// the server, so the page does not need to be fetched again.
pub struct RowCacheAccessor<'a, R> {
    cache: &'a PageCache<R>,
    options: &'a OptionsKey,
}

impl<'a, R> RowCacheAccessor<'a, R> {
    pub fn new(cache: &'a PageCache<R>, options: &'a OptionsKey) -> Self {
        Self { cache, options }
    }

    fn locate(&self, index: usize) -> (usize, usize) {
        let page_size = self.options.page_size.max(1);
        (index / page_size, index % page_size)
    }
}

impl<R: Clone> RowCacheAccessor<'_, R> {
    pub fn row_at_index(&self, index: usize) -> Option<R> {
        let (page_index, offset) = self.locate(index);
        let page = self.cache.get(&self.options.page(page_index))?;

        page.row(offset).cloned()
    }

    pub fn is_row_loaded(&self, index: usize) -> bool {
        let (page_index, offset) = self.locate(index);

        self.cache
            .get(&self.options.page(page_index))
            .is_some_and(|page| offset < page.len())
    }
}

impl<R: Clone + MergePatch> RowCacheAccessor<'_, R> {
    /// Merges `patch` over the cached row at `index`. Returns `false`, leaving the cache as it
    /// was, when the row is not cached.
    pub fn update_row_at_index(&self, index: usize, patch: &R) -> bool {
        let (page_index, offset) = self.locate(index);

        let updated = self.cache.update(&self.options.page(page_index), |page| {
            let merged = page.row(offset)?.merge_patch(patch);

            let mut updated = page.clone();
            updated.rows[offset] = merged;

            Some(updated)
        });

        if !updated {
            tracing::debug!("Row {index} of '{}' is not cached, skipping the patch", self.options.entity);
        }

        updated
    }
}
