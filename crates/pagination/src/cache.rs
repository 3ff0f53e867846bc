use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{OptionsKey, PageData, PageKey};

/// Pages shared between every engine of a process.
///
/// The cache outlives the engines reading from it: a view that is torn down and mounted again
/// finds its pages where it left them. Cloning is cheap and shares the storage.
pub struct PageCache<R> {
    inner: Arc<Mutex<Pages<R>>>,
}

struct Pages<R> {
    pages: HashMap<PageKey, Arc<PageData<R>>>,
    /// Options currently paged by a live engine, with the number of engines on each.
    owners: HashMap<OptionsKey, usize>,
}

impl<R> PageCache<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PageKey) -> Option<Arc<PageData<R>>> {
        self.lock().pages.get(key).cloned()
    }

    pub fn contains(&self, key: &PageKey) -> bool {
        self.lock().pages.contains_key(key)
    }

    pub fn insert(&self, key: PageKey, page: Arc<PageData<R>>) {
        self.lock().pages.insert(key, page);
    }

    /// Replaces the page at `key` with `update(page)` if it is cached. The closure runs under the
    /// cache lock, so concurrent updates of one page are applied one after the other.
    pub fn update<F>(&self, key: &PageKey, update: F) -> bool
    where
        F: FnOnce(&PageData<R>) -> Option<PageData<R>>,
    {
        let mut pages = self.lock();

        let Some(page) = pages.pages.get_mut(key) else {
            return false;
        };

        match update(&**page) {
            Some(updated) => {
                *page = Arc::new(updated);
                true
            }
            None => false,
        }
    }

    /// Marks `options` as paged by an engine. Its pages survive [`PageCache::invalidate_entity`]
    /// until every engine paging it has called [`PageCache::release`].
    pub fn acquire(&self, options: &OptionsKey) {
        *self.lock().owners.entry(options.clone()).or_default() += 1;
    }

    pub fn release(&self, options: &OptionsKey) {
        let mut pages = self.lock();

        if let Some(count) = pages.owners.get_mut(options) {
            *count -= 1;
            if *count == 0 {
                pages.owners.remove(options);
            }
        }
    }

    /// Drops every page of `entity` fetched with options no engine is paging anymore.
    pub fn invalidate_entity(&self, entity: &str) -> usize {
        let mut guard = self.lock();
        let Pages { pages, owners } = &mut *guard;
        let before = pages.len();

        pages.retain(|key, _| key.options.entity != entity || owners.contains_key(&key.options));

        before - pages.len()
    }

    pub fn invalidate_options(&self, options: &OptionsKey) -> usize {
        self.retain(|key| &key.options != options)
    }

    pub fn len(&self) -> usize {
        self.lock().pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().pages.is_empty()
    }

    fn retain(&self, keep: impl Fn(&PageKey) -> bool) -> usize {
        let mut pages = self.lock();
        let before = pages.pages.len();

        pages.pages.retain(|key, _| keep(key));

        before - pages.pages.len()
    }

    fn lock(&self) -> MutexGuard<'_, Pages<R>> {
        // A panic while holding the lock cannot leave a half-written entry behind.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R> Default for PageCache<R> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Pages {
                pages: HashMap::new(),
                owners: HashMap::new(),
            })),
        }
    }
}

impl<R> Clone for PageCache<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
