// Example: a full feed session against the mock archive — activation, scroll-driven
// paging, a scripted failure with retry, and pull-to-refresh.
use pagefeed::PaginatorOptions;
use pagefeed_adapter::{FeedSession, StaticSource, sample_feed};

const ROW_HEIGHT: u64 = 120;
const VIEWPORT: u64 = 800;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let source = StaticSource::new(sample_feed());
    source.fail_page(1);
    let session = FeedSession::new(PaginatorOptions::new().with_page_size(10), source);

    let outcome = session.activate().await;
    println!("activate -> {outcome:?}");

    // Scroll toward the bottom until every page is in (page 1 fails once on the way).
    let mut offset = 0u64;
    while !session.state().is_exhausted {
        offset += 150;
        let content_extent = session.with_items(|items| items.len() as u64 * ROW_HEIGHT);
        if let Some(outcome) = session.notify_scroll(offset, content_extent, VIEWPORT).await {
            println!("scroll @{offset} -> {outcome:?} ({:?})", session.state());
        }
    }

    println!("loaded {} posts", session.with_items(|items| items.len()));

    let outcome = session.refresh().await;
    println!(
        "refresh -> {outcome:?}, {} posts",
        session.with_items(|items| items.len())
    );
}
