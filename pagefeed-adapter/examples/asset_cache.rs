// Example: asset loading with in-flight de-duplication and an LRU cache.
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use pagefeed::{AssetCategory, ContentKind, FetchError};
use pagefeed_adapter::{AssetFetcher, AssetLoader, AssetUrlScheme};

struct SlowFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl AssetFetcher for SlowFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(Bytes::from(format!("bytes of {url}")))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let scheme = AssetUrlScheme::new("https://cdn.example.net");
    let url = scheme
        .url_for("user1", "uuid1", Some(ContentKind::Image), AssetCategory::Post)
        .expect("post image url");

    let fetcher = Arc::new(SlowFetcher {
        calls: AtomicUsize::new(0),
    });
    let loader = AssetLoader::new(Arc::clone(&fetcher) as Arc<dyn AssetFetcher>);

    // Three cells ask for the same thumbnail at once: one fetch serves all three.
    let (a, b, c) = tokio::join!(loader.load(&url), loader.load(&url), loader.load(&url));
    println!(
        "3 loads, {} fetch(es), {} bytes each",
        fetcher.calls.load(Ordering::SeqCst),
        a.unwrap().len().max(b.unwrap().len()).max(c.unwrap().len())
    );

    // A later load is a cache hit.
    loader.load(&url).await.unwrap();
    println!(
        "after cache hit: still {} fetch(es)",
        fetcher.calls.load(Ordering::SeqCst)
    );
}
