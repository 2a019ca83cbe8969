use alloc::sync::Arc;

use crate::paginator::Paginator;
use crate::{ContentItem, ListDelta, PageItem};

/// A callback fired after every engine state transition (loading flag, error, exhaustion,
/// append, reset). Bind loading spinners and retry affordances here.
pub type OnChangeCallback<I> = Arc<dyn Fn(&Paginator<I>) + Send + Sync>;

/// The presentation sink: receives incremental [`ListDelta`]s as pages are appended or the
/// list is replaced. The delta borrows from the engine's accumulated list, so sinks copy what
/// they need and return.
pub type ListCallback<I> = Arc<dyn Fn(&Paginator<I>, ListDelta<'_, I>) + Send + Sync>;

/// Items fetched per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 24;

/// Distance from the end of the content (in the UI's own units) below which scrolling
/// triggers the next page fetch.
pub const DEFAULT_PREFETCH_THRESHOLD: u64 = 200;

/// Configuration for [`Paginator`].
///
/// Cheap to clone: callbacks are stored in `Arc`s.
pub struct PaginatorOptions<I: PageItem = ContentItem> {
    pub page_size: usize,
    /// See [`DEFAULT_PREFETCH_THRESHOLD`]. Compared strictly: a remaining distance equal to
    /// the threshold does not trigger.
    pub prefetch_threshold: u64,
    pub on_change: Option<OnChangeCallback<I>>,
    pub on_list: Option<ListCallback<I>>,
}

impl<I: PageItem> PaginatorOptions<I> {
    pub fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            prefetch_threshold: DEFAULT_PREFETCH_THRESHOLD,
            on_change: None,
            on_list: None,
        }
    }

    /// Page sizes are clamped to at least 1.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_prefetch_threshold(mut self, prefetch_threshold: u64) -> Self {
        self.prefetch_threshold = prefetch_threshold;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&Paginator<I>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_list(
        mut self,
        on_list: Option<impl Fn(&Paginator<I>, ListDelta<'_, I>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_list = on_list.map(|f| Arc::new(f) as _);
        self
    }
}

impl<I: PageItem> Default for PaginatorOptions<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: PageItem> Clone for PaginatorOptions<I> {
    fn clone(&self) -> Self {
        Self {
            page_size: self.page_size,
            prefetch_threshold: self.prefetch_threshold,
            on_change: self.on_change.clone(),
            on_list: self.on_list.clone(),
        }
    }
}

impl<I: PageItem> core::fmt::Debug for PaginatorOptions<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PaginatorOptions")
            .field("page_size", &self.page_size)
            .field("prefetch_threshold", &self.prefetch_threshold)
            .finish_non_exhaustive()
    }
}
