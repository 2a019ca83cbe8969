use alloc::vec::Vec;

use pagefeed::{
    ContentItem, FetchError, PageItem, PageOutcome, PageRequest, Paginator, PaginatorOptions,
    ScrollMetrics,
};

/// A framework-neutral controller that wraps a [`pagefeed::Paginator`] and maps the UI
/// trigger surface onto it.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_activate()` once when the screen appears
/// - `on_scroll(offset, content_extent, viewport_extent)` when scroll events occur
/// - `retry()` / `refresh()` from user affordances
///
/// Every trigger returns the [`PageRequest`] ticket to hand to a content source (or `None`
/// when nothing should be fetched); completions come back through [`Controller::complete`].
/// For a driver that owns the fetch loop, see `FeedSession` (`runtime` feature).
#[derive(Debug)]
pub struct Controller<I: PageItem = ContentItem> {
    paginator: Paginator<I>,
    activated: bool,
}

impl<I: PageItem> Controller<I> {
    pub fn new(options: PaginatorOptions<I>) -> Self {
        Self {
            paginator: Paginator::new(options),
            activated: false,
        }
    }

    pub fn from_paginator(paginator: Paginator<I>) -> Self {
        let activated =
            paginator.page_index() > 0 || !paginator.is_empty() || paginator.is_loading();
        Self {
            paginator,
            activated,
        }
    }

    pub fn paginator(&self) -> &Paginator<I> {
        &self.paginator
    }

    pub fn paginator_mut(&mut self) -> &mut Paginator<I> {
        &mut self.paginator
    }

    pub fn into_paginator(self) -> Paginator<I> {
        self.paginator
    }

    /// The one-time initial load, fired at screen activation. Subsequent calls are no-ops;
    /// all later fetching is scroll-driven.
    pub fn on_activate(&mut self) -> Option<PageRequest> {
        if self.activated {
            return None;
        }
        self.activated = true;
        self.paginator.request_next_page()
    }

    /// Call this when the UI reports a scroll position change.
    pub fn on_scroll(
        &mut self,
        offset: u64,
        content_extent: u64,
        viewport_extent: u64,
    ) -> Option<PageRequest> {
        self.paginator
            .notify_scroll(ScrollMetrics::new(offset, content_extent, viewport_extent))
    }

    /// Explicit retry affordance. Issues a ticket only when the last fetch failed.
    pub fn retry(&mut self) -> Option<PageRequest> {
        if self.paginator.last_error().is_none() {
            return None;
        }
        self.paginator.request_next_page()
    }

    /// Pull-to-refresh: clears the list and issues a fresh first-page ticket.
    pub fn refresh(&mut self) -> Option<PageRequest> {
        self.paginator.reset();
        self.activated = true;
        self.paginator.request_next_page()
    }

    pub fn complete(
        &mut self,
        request: &PageRequest,
        result: Result<Vec<I>, FetchError>,
    ) -> PageOutcome {
        self.paginator.complete_page(request, result)
    }
}
