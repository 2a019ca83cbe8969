// Example: minimal ticket/complete cycle with a hand-rolled page source.
use pagefeed::{ContentItem, ContentKind, ListDelta, PageOutcome, Paginator, PaginatorOptions};

fn mock_page(index: u32, size: usize) -> Vec<ContentItem> {
    // Three pages of data, then nothing.
    let total = 10usize;
    let start = index as usize * size;
    (start..total.min(start + size))
        .map(|n| {
            let kind = if n % 3 == 0 {
                ContentKind::Video
            } else {
                ContentKind::Image
            };
            ContentItem::new(format!("post-{n}"), kind)
        })
        .collect()
}

fn main() {
    let mut p = Paginator::new(
        PaginatorOptions::new()
            .with_page_size(4)
            .with_on_list(Some(|_: &Paginator, delta: ListDelta<'_, ContentItem>| {
                println!("sink <- {delta:?}");
            })),
    );

    loop {
        let Some(request) = p.request_next_page() else {
            break;
        };
        let outcome = p.complete_page(&request, Ok(mock_page(request.page_index, request.page_size)));
        println!("page {} -> {outcome:?}", request.page_index);
        if outcome == PageOutcome::Exhausted {
            break;
        }
    }

    println!("accumulated {} items, phase {:?}", p.len(), p.phase());
}
