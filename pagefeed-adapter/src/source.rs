use alloc::vec::Vec;

use async_trait::async_trait;
use pagefeed::{FetchError, PageItem, PageRequest};

/// The sole data-fetch boundary for a feed session.
///
/// Contract:
/// - `fetch_page` returns the items for `request.page_index` (zero-based, sized by
///   `request.page_size`), in source order.
/// - An empty vec means the source has no more data (end-of-feed).
/// - Errors are retryable: the engine keeps the page index and re-issues it on the next
///   trigger. Sources should not retry internally.
///
/// Implementations are injected into [`crate::FeedSession`] at construction; there is no
/// process-wide shared source.
#[async_trait]
pub trait ContentSource: Send + Sync {
    type Item: PageItem + Send;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Self::Item>, FetchError>;
}
