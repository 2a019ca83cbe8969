// Example: scroll-driven prefetch. Each appended row grows the content extent;
// scrolling near the bottom issues the next ticket.
use pagefeed::{ContentItem, ContentKind, Paginator, PaginatorOptions, ScrollMetrics};

const ROW_HEIGHT: u64 = 120;
const VIEWPORT: u64 = 800;

fn main() {
    let mut p = Paginator::new(PaginatorOptions::new().with_page_size(6));

    // Initial load at screen activation.
    let request = p.request_next_page().expect("initial ticket");
    let first: Vec<ContentItem> = (0..6)
        .map(|n| ContentItem::new(format!("post-{n}"), ContentKind::Image))
        .collect();
    p.complete_page(&request, Ok(first));

    // The user scrolls down; once the remaining distance drops under the
    // threshold, the engine asks for more.
    for offset in (0..2000).step_by(150) {
        let content_extent = p.len() as u64 * ROW_HEIGHT;
        let metrics = ScrollMetrics::new(offset, content_extent, VIEWPORT);
        if let Some(request) = p.notify_scroll(metrics) {
            println!(
                "offset {offset}: remaining {} -> fetching page {}",
                metrics.remaining_to_end(),
                request.page_index
            );
            let next: Vec<ContentItem> = (0..6)
                .map(|n| {
                    ContentItem::new(
                        format!("post-{}-{n}", request.page_index),
                        ContentKind::Image,
                    )
                })
                .collect();
            p.complete_page(&request, Ok(next));
        }
    }

    println!("loaded {} rows across {} pages", p.len(), p.page_index());
}
