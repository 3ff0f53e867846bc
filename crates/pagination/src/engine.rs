use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use dbdash_config::PaginationConfig;
use futures_util::future::join_all;
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use crate::{
    plan::{self, plan_page, PageRequest},
    response, CursorChain, FetchError, FetchResult, GraphqlRequest, MergePatch, OptionsKey, PageCache, PageData,
    PageKey, PageRequestOptions, PaginationSnapshot, RowCacheAccessor, Transport,
};

/// A row as returned by the API, keyed by field name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Loads the rows of one paginated view.
///
/// The engine owns the cursor chain of its current options and shares pages with every other
/// engine through a [`PageCache`]. Changing the options starts a new generation: pages and
/// cursors of the previous options are dropped, and responses still in flight for them are
/// discarded when they arrive.
pub struct PaginationEngine<R = Row> {
    transport: Arc<dyn Transport>,
    cache: PageCache<R>,
    config: PaginationConfig,
    state: Mutex<EngineState<R>>,
    snapshots: watch::Sender<PaginationSnapshot>,
}

struct EngineState<R> {
    options: PageRequestOptions,
    key: OptionsKey,
    generation: u64,
    cursors: CursorChain,
    total_count: Option<usize>,
    /// Pages the view asked for. Always contains the first page.
    requested: BTreeSet<usize>,
    in_flight: BTreeSet<usize>,
    /// Not retried until the next invalidation.
    failed: BTreeSet<usize>,
    /// Pages restored from the cache or fetched under the current generation.
    known: BTreeSet<usize>,
    /// Fetched pages, read when the cache lost them.
    fetched: HashMap<usize, Arc<PageData<R>>>,
    error: Option<FetchError>,
}

struct PendingFetch {
    generation: u64,
    key: PageKey,
    request: PageRequest,
    options: PageRequestOptions,
}

impl<R> PaginationEngine<R>
where
    R: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Creates an engine and restores the cursors of the pages `cache` already holds for
    /// `options`, so a view mounted again keeps continuing from cursors.
    pub fn new(
        transport: Arc<dyn Transport>,
        cache: PageCache<R>,
        config: &PaginationConfig,
        options: PageRequestOptions,
    ) -> Self {
        let mut state = EngineState::new(options);
        cache.acquire(&state.key);

        let restored = state.restore(&cache);
        if restored > 0 {
            tracing::debug!("Restored {restored} cached pages of '{}'", state.key.entity);
        }

        let (snapshots, _) = watch::channel(state.snapshot(&cache));

        Self {
            transport,
            cache,
            config: config.clone(),
            state: Mutex::new(state),
            snapshots,
        }
    }

    /// Switches to new options. Returns `false` if they select the same pages as the current
    /// ones, which keeps everything loaded so far.
    pub fn set_options(&self, options: PageRequestOptions) -> bool {
        let mut state = self.lock();

        if OptionsKey::from(&options) == state.key {
            state.options = options;
            return false;
        }

        let previous = state.key.clone();
        state.reset(options);

        self.cache.release(&previous);
        self.cache.acquire(&state.key);

        let evicted = self.cache.invalidate_entity(&previous.entity);
        tracing::info!(
            "Options of '{}' changed, dropped {evicted} cached pages",
            previous.entity
        );

        state.restore(&self.cache);
        self.publish(&state);

        true
    }

    /// Drops the pages of the current options so they are fetched again, failed pages included.
    pub fn invalidate(&self) {
        let mut state = self.lock();

        let evicted = self.cache.invalidate_options(&state.key);
        tracing::info!("Invalidated {evicted} cached pages of '{}'", state.key.entity);

        let options = state.options.clone();
        state.reset(options);
        self.publish(&state);
    }

    /// Fetches the pages holding rows `start..end`, plus the configured buffer, that are neither
    /// cached nor in flight. Returns the last error of this call; pages fetched successfully are
    /// kept either way.
    pub async fn ensure_rows_loaded(&self, start: usize, end: usize) -> FetchResult<()> {
        let generation = {
            let mut state = self.lock();

            let pages = plan::pages_for_rows(
                start..end,
                state.key.page_size,
                self.config.buffer_pages,
                state.total_count,
            );
            tracing::debug!("Rows {start}..{end} of '{}' span pages {pages:?}", state.key.entity);

            state.requested.extend(pages);
            state.generation
        };

        let mut last_error = None;

        loop {
            let batch = self.next_batch(generation);
            if batch.is_empty() {
                break;
            }

            let results = join_all(batch.iter().map(|fetch| self.fetch(fetch))).await;

            for (fetch, result) in batch.into_iter().zip(results) {
                if let Err(error) = &result {
                    last_error = Some(error.clone());
                }

                self.complete(fetch, result);
            }
        }

        last_error.map_or(Ok(()), Err)
    }

    /// The row at `index`, from the cache first and from the pages fetched by this engine
    /// otherwise.
    pub fn row_at_index(&self, index: usize) -> Option<R> {
        let state = self.lock();

        RowCacheAccessor::new(&self.cache, &state.key)
            .row_at_index(index)
            .or_else(|| state.fetched_row(index).cloned())
    }

    pub fn is_row_loaded(&self, index: usize) -> bool {
        let state = self.lock();

        RowCacheAccessor::new(&self.cache, &state.key).is_row_loaded(index) || state.fetched_row(index).is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<PaginationSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> PaginationSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn error(&self) -> Option<FetchError> {
        self.lock().error.clone()
    }

    pub fn total_count(&self) -> Option<usize> {
        self.lock().total_count
    }

    pub fn cursors(&self) -> CursorChain {
        self.lock().cursors.clone()
    }

    pub fn options(&self) -> PageRequestOptions {
        self.lock().options.clone()
    }

    pub fn options_key(&self) -> OptionsKey {
        self.lock().key.clone()
    }

    pub fn cache(&self) -> &PageCache<R> {
        &self.cache
    }

    /// Up to `max_concurrent_pages` requested pages that can be sent right away, marked as in
    /// flight.
    fn next_batch(&self, generation: u64) -> Vec<PendingFetch> {
        let mut guard = self.lock();
        let state = &mut *guard;

        // The options changed while this call was waiting on the network.
        if state.generation != generation {
            return Vec::new();
        }

        let page_count = state.page_count();
        let arguments = state.options.paging_arguments();
        let limit = self.config.max_concurrent_pages.max(1);
        let mut batch = Vec::new();

        for &page_index in &state.requested {
            if batch.len() >= limit {
                break;
            }

            if page_count.is_some_and(|count| page_index >= count)
                || state.in_flight.contains(&page_index)
                || state.failed.contains(&page_index)
            {
                continue;
            }

            let key = state.key.page(page_index);
            if self.cache.contains(&key) {
                continue;
            }

            match plan_page(page_index, state.key.page_size, &state.cursors, arguments) {
                Some(request) => batch.push(PendingFetch {
                    generation,
                    key,
                    request,
                    options: state.options.clone(),
                }),
                None => tracing::debug!(
                    "Holding page {page_index} of '{}' until the cursor of page {} is known ({arguments:?})",
                    state.key.entity,
                    page_index - 1
                ),
            }
        }

        if !batch.is_empty() {
            state.in_flight.extend(batch.iter().map(|fetch| fetch.key.page_index));
            self.publish(state);
        }

        batch
    }

    async fn fetch(&self, fetch: &PendingFetch) -> FetchResult<PageData<R>> {
        let document = &fetch.options.document;

        let root_field = document
            .root_field()
            .ok_or_else(|| FetchError::invalid_response("the document has no root field"))?;

        tracing::debug!(
            "Fetching page {} of '{}' with {:?}",
            fetch.key.page_index,
            fetch.options.entity,
            fetch.request
        );

        let data = self
            .transport
            .execute(GraphqlRequest {
                query: &document.query,
                operation_name: &document.query_name,
                variables: fetch.options.variables(&fetch.request),
            })
            .await?;

        response::parse_page(data, root_field, fetch.key.page_index)
    }

    fn complete(&self, fetch: PendingFetch, result: FetchResult<PageData<R>>) {
        let mut state = self.lock();
        let page_index = fetch.key.page_index;

        if state.generation != fetch.generation {
            tracing::warn!(
                "Discarding page {page_index} of '{}' fetched for options that are no longer current",
                fetch.options.entity
            );
            return;
        }

        state.in_flight.remove(&page_index);

        match result {
            Ok(page) => {
                if let Some(cursor) = &page.page_info.end_cursor {
                    state.cursors.record(page_index, cursor.clone());
                }

                if let Some(total_count) = page.total_count {
                    state.total_count = Some(total_count);
                }

                let page = Arc::new(page);
                self.cache.insert(fetch.key, Arc::clone(&page));
                state.fetched.insert(page_index, page);
                state.known.insert(page_index);
            }
            Err(error) => {
                tracing::error!("Failed to fetch page {page_index} of '{}': {error}", fetch.options.entity);

                state.failed.insert(page_index);
                state.error = Some(error);
            }
        }

        self.publish(&state);
    }

    fn publish(&self, state: &EngineState<R>) {
        self.snapshots.send_replace(state.snapshot(&self.cache));
    }

    fn lock(&self) -> MutexGuard<'_, EngineState<R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R> PaginationEngine<R>
where
    R: DeserializeOwned + Clone + MergePatch + Send + Sync + 'static,
{
    /// Merges `patch` over a cached row without going to the network. Returns `false` when the
    /// page of the row is not cached.
    pub fn update_row_at_index(&self, index: usize, patch: &R) -> bool {
        let state = self.lock();

        RowCacheAccessor::new(&self.cache, &state.key).update_row_at_index(index, patch)
    }
}

impl<R> Drop for PaginationEngine<R> {
    fn drop(&mut self) {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        self.cache.release(&state.key);
    }
}

impl<R> EngineState<R> {
    fn new(options: PageRequestOptions) -> Self {
        Self {
            key: OptionsKey::from(&options),
            options,
            generation: 0,
            cursors: CursorChain::default(),
            total_count: None,
            requested: BTreeSet::from([0]),
            in_flight: BTreeSet::new(),
            failed: BTreeSet::new(),
            known: BTreeSet::new(),
            fetched: HashMap::new(),
            error: None,
        }
    }

    fn reset(&mut self, options: PageRequestOptions) {
        let generation = self.generation + 1;

        *self = Self {
            generation,
            ..Self::new(options)
        };
    }

    /// Records the cursors of the consecutive cached pages from the first one. Returns the number
    /// of pages found.
    fn restore(&mut self, cache: &PageCache<R>) -> usize {
        let mut page_index = 0;

        while let Some(page) = cache.get(&self.key.page(page_index)) {
            if let Some(cursor) = &page.page_info.end_cursor {
                self.cursors.record(page_index, cursor.clone());
            }

            if let Some(total_count) = page.total_count {
                self.total_count = Some(total_count);
            }

            self.known.insert(page_index);
            page_index += 1;
        }

        page_index
    }

    fn page_count(&self) -> Option<usize> {
        self.total_count
            .map(|total_count| plan::page_count(total_count, self.key.page_size))
    }

    fn fetched_row(&self, index: usize) -> Option<&R> {
        let page_size = self.key.page_size.max(1);

        self.fetched.get(&(index / page_size))?.row(index % page_size)
    }

    fn snapshot(&self, cache: &PageCache<R>) -> PaginationSnapshot {
        let loaded_pages = self
            .known
            .iter()
            .copied()
            .filter(|page_index| self.fetched.contains_key(page_index) || cache.contains(&self.key.page(*page_index)))
            .collect();

        PaginationSnapshot {
            generation: self.generation,
            total_count: self.total_count,
            loaded_pages,
            pending_pages: self.in_flight.clone(),
            error: self.error.clone(),
            cursors: self.cursors.clone(),
        }
    }
}
