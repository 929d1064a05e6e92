//! Keyword-filtered list loading with "load more". A full page means there may
//! be more, so a server holding exactly `limit * n` items costs one extra empty page.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::clients::models::common::{PageOutcome, PageRequest};
use crate::error::Result;

/// Produces one page of items for a request.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageOutcome<Self::Item>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub has_more: bool,
    pub current_page: u32,
}

impl<T> CollectionState<T> {
    fn fresh() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            has_more: true,
            current_page: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing was requested: a fetch was in flight or no page to go to.
    Skipped,
    Loaded(usize),
    Empty,
    Failed,
    /// A filter change arrived first; this response was dropped.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Merge {
    Replace,
    Append,
}

struct Inner<T> {
    view: CollectionState<T>,
    // page is always 0 here, the page to fetch is derived per operation
    filter: PageRequest,
    total: Option<u64>,
    generation: u64,
}

pub struct PaginatedCollection<S: PageSource> {
    source: S,
    inner: Mutex<Inner<S::Item>>,
}

impl<S: PageSource> PaginatedCollection<S> {
    pub fn new(source: S, limit: u32) -> Self {
        Self {
            source,
            inner: Mutex::new(Inner {
                view: CollectionState::fresh(),
                filter: PageRequest::first("", limit.max(1), None),
                total: None,
                generation: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S::Item>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn keyword(&self) -> String {
        self.lock().filter.keyword.clone()
    }

    pub fn category_id(&self) -> Option<u64> {
        self.lock().filter.category_id
    }

    pub fn limit(&self) -> u32 {
        self.lock().filter.limit
    }

    pub fn is_loading(&self) -> bool {
        self.lock().view.loading
    }

    pub fn has_more(&self) -> bool {
        self.lock().view.has_more
    }

    pub fn current_page(&self) -> u32 {
        self.lock().view.current_page
    }

    pub fn error(&self) -> Option<String> {
        self.lock().view.error.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().view.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item count from a `/count` endpoint; bounds `has_more` when known.
    pub fn set_total(&self, total: Option<u64>) {
        self.lock().total = total;
    }

    // Items are dropped up front and any in-flight response is discarded
    pub async fn set_filter(&self, keyword: impl Into<String>, category_id: Option<u64>) -> LoadOutcome {
        let keyword = keyword.into();
        let (request, generation) = {
            let mut inner = self.lock();
            inner.filter.keyword = keyword;
            inner.filter.category_id = category_id;
            Self::reset(&mut inner)
        };
        self.run(request, generation, Merge::Replace).await
    }

    pub async fn set_limit(&self, limit: u32) -> LoadOutcome {
        let (request, generation) = {
            let mut inner = self.lock();
            inner.filter.limit = limit.max(1);
            Self::reset(&mut inner)
        };
        self.run(request, generation, Merge::Replace).await
    }

    fn reset(inner: &mut Inner<S::Item>) -> (PageRequest, u64) {
        inner.generation += 1;
        inner.view = CollectionState::fresh();
        inner.view.loading = true;
        (inner.filter.clone(), inner.generation)
    }

    pub async fn load_first_page(&self) -> LoadOutcome {
        let Some((request, generation)) = self.begin(|_| Some(0)) else {
            return LoadOutcome::Skipped;
        };
        self.run(request, generation, Merge::Replace).await
    }

    pub async fn load_next_page(&self) -> LoadOutcome {
        let next = |view: &CollectionState<S::Item>| {
            view.has_more.then_some(view.current_page + 1)
        };
        let Some((request, generation)) = self.begin(next) else {
            return LoadOutcome::Skipped;
        };
        self.run(request, generation, Merge::Append).await
    }

    /// Reloads from page 0, discarding later pages.
    pub async fn refresh(&self) -> LoadOutcome {
        self.load_first_page().await
    }

    /// Jumps to `page` and shows only that page, as the admin tables do.
    /// Pages past a known total are skipped.
    pub async fn load_page(&self, page: u32) -> LoadOutcome {
        let Some((request, generation)) = self.begin_at(page) else {
            return LoadOutcome::Skipped;
        };
        self.run(request, generation, Merge::Replace).await
    }

    pub async fn load_previous_page(&self) -> LoadOutcome {
        let Some(page) = self.current_page().checked_sub(1) else {
            return LoadOutcome::Skipped;
        };
        self.load_page(page).await
    }

    fn begin_at(&self, page: u32) -> Option<(PageRequest, u64)> {
        let (total, limit) = {
            let inner = self.lock();
            (inner.total, inner.filter.limit)
        };
        if page > 0
            && total.is_some_and(|total| u64::from(page) * u64::from(limit) >= total)
        {
            tracing::debug!(page, "pagination.page_out_of_range");
            return None;
        }
        self.begin(|_| Some(page))
    }

    fn begin(
        &self,
        page_for: impl FnOnce(&CollectionState<S::Item>) -> Option<u32>,
    ) -> Option<(PageRequest, u64)> {
        let mut inner = self.lock();
        if inner.view.loading {
            tracing::debug!("pagination.skipped_while_loading");
            return None;
        }
        let page = page_for(&inner.view)?;
        inner.view.loading = true;
        inner.view.error = None;
        Some((inner.filter.with_page(page), inner.generation))
    }

    async fn run(&self, request: PageRequest, generation: u64, merge: Merge) -> LoadOutcome {
        let result = self.source.fetch_page(&request).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(page = request.page, "pagination.response_superseded");
            return LoadOutcome::Superseded;
        }
        inner.view.loading = false;

        match result {
            Ok(PageOutcome::Items(items)) => {
                let count = items.len();
                let full_page = count == request.limit as usize;
                let below_total = inner.total.is_none_or(|total| {
                    (u64::from(request.page) + 1) * u64::from(request.limit) < total
                });
                inner.view.has_more = full_page && below_total;
                inner.view.current_page = request.page;
                match merge {
                    Merge::Replace => inner.view.items = items,
                    Merge::Append => inner.view.items.extend(items),
                }
                tracing::debug!(
                    page = request.page,
                    count,
                    has_more = inner.view.has_more,
                    "pagination.page_loaded"
                );
                LoadOutcome::Loaded(count)
            }
            Ok(PageOutcome::Empty) => {
                inner.view.items.clear();
                inner.view.current_page = 0;
                inner.view.has_more = false;
                tracing::debug!(page = request.page, "pagination.empty_result");
                LoadOutcome::Empty
            }
            Err(e) => {
                tracing::warn!(error = %e, page = request.page, "pagination.fetch_failed");
                inner.view.error = Some(e.to_string());
                inner.view.has_more = false;
                LoadOutcome::Failed
            }
        }
    }
}

impl<S> PaginatedCollection<S>
where
    S: PageSource,
    S::Item: Clone,
{
    pub fn items(&self) -> Vec<S::Item> {
        self.lock().view.items.clone()
    }

    pub fn snapshot(&self) -> CollectionState<S::Item> {
        self.lock().view.clone()
    }
}
