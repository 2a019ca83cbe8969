use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pagefeed::{PageItem, PageOutcome, PageRequest, PaginationState, PaginatorOptions};
use tokio::task::JoinHandle;

use crate::{ContentSource, Controller};

/// A tokio-backed feed driver: a [`Controller`] behind a mutex plus an injected
/// [`ContentSource`].
///
/// Locking discipline: the lock is only held for the synchronous engine transitions, never
/// across the fetch await — each trigger is lock → issue ticket → unlock, `fetch_page().await`,
/// lock → complete → unlock. Only one fetch can be in flight regardless of how many tasks
/// trigger concurrently, because the engine's loading guard refuses to issue a second ticket.
///
/// Teardown: page fetches are not cancelled mid-flight. A fetch started before the session
/// was discarded completes against a list nobody renders (see [`FeedSession::spawn_next_page`]),
/// and tickets issued before a `reset` are dropped by the engine's generation guard.
pub struct FeedSession<S: ContentSource> {
    controller: Mutex<Controller<S::Item>>,
    source: S,
}

impl<S: ContentSource> FeedSession<S> {
    pub fn new(options: PaginatorOptions<S::Item>, source: S) -> Self {
        Self {
            controller: Mutex::new(Controller::new(options)),
            source,
        }
    }

    pub fn from_controller(controller: Controller<S::Item>, source: S) -> Self {
        Self {
            controller: Mutex::new(controller),
            source,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn lock(&self) -> MutexGuard<'_, Controller<S::Item>> {
        // A panicking callback must not wedge the whole feed.
        self.controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against the controller under the session lock. Keep `f` short; it blocks
    /// every other trigger.
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut Controller<S::Item>) -> R) -> R {
        f(&mut self.lock())
    }

    /// Reads the accumulated item list under the session lock.
    pub fn with_items<R>(&self, f: impl FnOnce(&[S::Item]) -> R) -> R {
        f(self.lock().paginator().items())
    }

    pub fn state(&self) -> PaginationState {
        self.lock().paginator().pagination_state()
    }

    async fn drive(&self, request: Option<PageRequest>) -> Option<PageOutcome> {
        let request = request?;
        let result = self.source.fetch_page(&request).await;
        Some(self.lock().complete(&request, result))
    }

    /// The one-time initial load (screen activation).
    pub async fn activate(&self) -> Option<PageOutcome> {
        let request = self.lock().on_activate();
        self.drive(request).await
    }

    /// Fetches the next page unless one is already in flight or the feed is exhausted.
    /// Returns `None` when no fetch was started.
    pub async fn request_next_page(&self) -> Option<PageOutcome> {
        let request = self.lock().paginator_mut().request_next_page();
        self.drive(request).await
    }

    /// Scroll trigger; fetches when the remaining distance drops under the threshold.
    pub async fn notify_scroll(
        &self,
        offset: u64,
        content_extent: u64,
        viewport_extent: u64,
    ) -> Option<PageOutcome> {
        let request = self.lock().on_scroll(offset, content_extent, viewport_extent);
        self.drive(request).await
    }

    /// Explicit retry of a failed page.
    pub async fn retry(&self) -> Option<PageOutcome> {
        let request = self.lock().retry();
        self.drive(request).await
    }

    /// Pull-to-refresh: reset, then fetch the first page again.
    pub async fn refresh(&self) -> Option<PageOutcome> {
        let request = self.lock().refresh();
        self.drive(request).await
    }

    /// Clears the list without fetching. In-flight completions become stale no-ops.
    pub fn reset(&self) {
        self.lock().paginator_mut().reset();
    }

    /// Fire-and-forget variant of [`FeedSession::request_next_page`] for callers without an
    /// async context (e.g. a synchronous scroll handler). Call as
    /// `Arc::clone(&session).spawn_next_page()`.
    ///
    /// The task holds only a weak handle while queued: if every strong handle to the session
    /// is dropped before the task runs, it exits without fetching. A fetch that already
    /// started is allowed to complete normally.
    pub fn spawn_next_page(self: Arc<Self>) -> JoinHandle<Option<PageOutcome>>
    where
        S: 'static,
        S::Item: Send + 'static,
        <S::Item as PageItem>::Id: Send + 'static,
    {
        let weak = Arc::downgrade(&self);
        drop(self);
        tokio::spawn(async move {
            let session = weak.upgrade()?;
            session.request_next_page().await
        })
    }
}
