use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::item::{IdSet, PageItem};
use crate::{
    ContentItem, FetchError, ListDelta, LoadPhase, PageRequest, PaginationState, PaginatorOptions,
    ScrollMetrics,
};

/// What applying a completed fetch did to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageOutcome {
    /// A non-empty page was accepted. `appended` counts the items that survived filtering;
    /// `duplicates` and `malformed` count what was dropped. The page index advanced even if
    /// every item was filtered out.
    Appended {
        appended: usize,
        duplicates: usize,
        malformed: usize,
    },
    /// The source returned an empty page; the feed is exhausted until `reset()`.
    Exhausted,
    /// The fetch failed; the same page index will be retried on the next trigger.
    Failed,
    /// The ticket did not match the current generation/in-flight fetch; nothing changed.
    Stale,
}

impl PageOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

/// A headless paged-feed loading engine.
///
/// This type is intentionally UI- and IO-agnostic:
/// - It never fetches anything itself. [`Paginator::request_next_page`] issues a
///   [`PageRequest`] ticket; the host performs the fetch and applies the result with
///   [`Paginator::complete_page`].
/// - The accumulated list is owned here; the presentation layer receives only incremental
///   [`ListDelta`]s through the configured sink callback.
/// - At most one fetch is in flight, enforced by the loading flag rather than a lock: all
///   state transitions are synchronous, so the host's event loop (or a mutex around this
///   value) serializes them.
///
/// Pages are requested in strictly increasing index order. A page index is only ever
/// re-requested after a failed attempt. Items whose id was already accumulated are dropped,
/// so sources that return overlapping pages under concurrent writes stay gap-free and
/// duplicate-free on screen.
pub struct Paginator<I: PageItem = ContentItem> {
    options: PaginatorOptions<I>,
    items: Vec<I>,
    seen: IdSet<I::Id>,
    page_index: u32,
    is_loading: bool,
    is_exhausted: bool,
    last_error: Option<FetchError>,
    generation: u64,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl<I: PageItem> Paginator<I> {
    pub fn new(options: PaginatorOptions<I>) -> Self {
        pdebug!(
            page_size = options.page_size,
            prefetch_threshold = options.prefetch_threshold,
            "Paginator::new"
        );
        Self {
            options,
            items: Vec::new(),
            seen: IdSet::default(),
            page_index: 0,
            is_loading: false,
            is_exhausted: false,
            last_error: None,
            generation: 0,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        }
    }

    pub fn options(&self) -> &PaginatorOptions<I> {
        &self.options
    }

    /// Takes effect from the next issued ticket; an in-flight fetch keeps its size.
    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        if self.options.page_size == page_size {
            return;
        }
        self.options.page_size = page_size;
        self.notify();
    }

    pub fn set_prefetch_threshold(&mut self, prefetch_threshold: u64) {
        if self.options.prefetch_threshold == prefetch_threshold {
            return;
        }
        self.options.prefetch_threshold = prefetch_threshold;
        self.notify();
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&Paginator<I>) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    pub fn set_on_list(
        &mut self,
        on_list: Option<impl Fn(&Paginator<I>, ListDelta<'_, I>) + Send + Sync + 'static>,
    ) {
        self.options.on_list = on_list.map(|f| Arc::new(f) as _);
    }

    // -- queries -------------------------------------------------------------

    /// The accumulated, de-duplicated list, in append order.
    pub fn items(&self) -> &[I] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&I> {
        self.items.get(index)
    }

    /// The next page index that will be requested.
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.options.page_size
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.is_exhausted
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// Bumped by every `reset()`; tickets carry the generation they were issued under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> LoadPhase {
        if self.is_loading {
            LoadPhase::Loading
        } else if self.is_exhausted {
            LoadPhase::Exhausted
        } else if self.last_error.is_some() {
            LoadPhase::Failed
        } else {
            LoadPhase::Idle
        }
    }

    /// Returns a lightweight snapshot of the pagination state.
    pub fn pagination_state(&self) -> PaginationState {
        PaginationState {
            page_index: self.page_index,
            item_count: self.items.len(),
            is_loading: self.is_loading,
            is_exhausted: self.is_exhausted,
            has_error: self.last_error.is_some(),
        }
    }

    // -- triggers ------------------------------------------------------------

    /// Issues a ticket for the next page, or `None` when a fetch is already in flight or the
    /// feed is exhausted (both silent no-ops by design).
    ///
    /// Issuing a ticket sets the loading flag and clears the last error, so a failed page is
    /// re-attempted by simply triggering again.
    pub fn request_next_page(&mut self) -> Option<PageRequest> {
        if self.is_loading {
            ptrace!(
                page_index = self.page_index,
                "request_next_page: fetch already in flight"
            );
            return None;
        }
        if self.is_exhausted {
            ptrace!("request_next_page: feed exhausted");
            return None;
        }

        self.is_loading = true;
        self.last_error = None;
        pdebug!(
            page_index = self.page_index,
            page_size = self.options.page_size,
            "request_next_page: ticket issued"
        );
        self.notify();
        Some(PageRequest {
            page_index: self.page_index,
            page_size: self.options.page_size,
            generation: self.generation,
        })
    }

    /// Feed this from the UI's scroll events. Issues a ticket when the remaining distance to
    /// the end of the content drops below the prefetch threshold.
    ///
    /// This is the sole trigger for pagination beyond the initial load.
    pub fn notify_scroll(&mut self, metrics: ScrollMetrics) -> Option<PageRequest> {
        if self.is_loading || self.is_exhausted {
            return None;
        }
        let remaining = metrics.remaining_to_end();
        if remaining >= self.options.prefetch_threshold {
            return None;
        }
        ptrace!(
            remaining,
            threshold = self.options.prefetch_threshold,
            "notify_scroll: near end of content"
        );
        self.request_next_page()
    }

    /// Applies a completed fetch.
    ///
    /// Exactly one of append / exhaustion / error happens per accepted completion. Tickets
    /// from a previous generation (issued before a `reset()`), or that do not match the
    /// fetch currently in flight, are ignored and reported as [`PageOutcome::Stale`].
    pub fn complete_page(
        &mut self,
        request: &PageRequest,
        result: Result<Vec<I>, FetchError>,
    ) -> PageOutcome {
        if request.generation != self.generation
            || !self.is_loading
            || request.page_index != self.page_index
        {
            ptrace!(
                ticket_page = request.page_index,
                ticket_generation = request.generation,
                page_index = self.page_index,
                generation = self.generation,
                "complete_page: stale ticket ignored"
            );
            return PageOutcome::Stale;
        }

        match result {
            Ok(page) if page.is_empty() => {
                pdebug!(page_index = self.page_index, "complete_page: feed exhausted");
                self.is_loading = false;
                self.is_exhausted = true;
                self.notify();
                PageOutcome::Exhausted
            }
            Ok(page) => {
                let start = self.items.len();
                let mut duplicates = 0usize;
                let mut malformed = 0usize;
                for item in page {
                    if !item.is_well_formed() {
                        malformed += 1;
                        pwarn!(
                            page_index = self.page_index,
                            "complete_page: dropping malformed item"
                        );
                        continue;
                    }
                    if !self.seen.insert(item.id()) {
                        duplicates += 1;
                        continue;
                    }
                    self.items.push(item);
                }
                let appended = self.items.len() - start;

                self.page_index += 1;
                self.is_loading = false;
                pdebug!(
                    page_index = self.page_index,
                    appended,
                    duplicates,
                    malformed,
                    "complete_page: page accepted"
                );
                if appended > 0 {
                    self.emit_list(ListDelta::Appended {
                        start,
                        items: &self.items[start..],
                    });
                }
                self.notify();
                PageOutcome::Appended {
                    appended,
                    duplicates,
                    malformed,
                }
            }
            Err(error) => {
                pwarn!(
                    page_index = self.page_index,
                    error = %error,
                    "complete_page: fetch failed"
                );
                self.last_error = Some(error);
                self.is_loading = false;
                self.notify();
                PageOutcome::Failed
            }
        }
    }

    /// Clears the accumulated list and returns to the initial state (pull-to-refresh).
    ///
    /// The generation is bumped, so completions of tickets issued before the reset become
    /// no-ops. The sink receives a `Replaced` delta with the now-empty list.
    pub fn reset(&mut self) {
        pdebug!(
            generation = self.generation,
            item_count = self.items.len(),
            "reset"
        );
        self.generation = self.generation.wrapping_add(1);
        self.items.clear();
        self.seen.clear();
        self.page_index = 0;
        self.is_loading = false;
        self.is_exhausted = false;
        self.last_error = None;
        self.emit_list(ListDelta::Replaced { items: &self.items });
        self.notify();
    }

    // -- notification --------------------------------------------------------

    fn emit_list(&self, delta: ListDelta<'_, I>) {
        if let Some(cb) = &self.options.on_list {
            cb(self, delta);
        }
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    ///
    /// Recommended when a host applies several transitions at once (e.g. `reset()` followed
    /// by re-issuing the first ticket) and the callback drives rendering.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }
}

impl<I: PageItem> core::fmt::Debug for Paginator<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Paginator")
            .field("page_index", &self.page_index)
            .field("item_count", &self.items.len())
            .field("is_loading", &self.is_loading)
            .field("is_exhausted", &self.is_exhausted)
            .field("has_error", &self.last_error.is_some())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
