use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use lru::LruCache;
use pagefeed::{AssetCategory, ContentItem, ContentKind, FetchError};
use tokio::sync::broadcast;
use tokio::task::AbortHandle;

/// Cached asset entries kept before the least-recently-used one is evicted.
pub const DEFAULT_ASSET_CACHE_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("invalid asset url: {0:?}")]
    InvalidUrl(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("asset load canceled")]
    Canceled,
}

/// Fetches raw asset bytes for a URL. The transport (HTTP client, disk, test double) is
/// injected; this crate ships none.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}

struct InFlight {
    tx: broadcast::Sender<Result<Bytes, AssetError>>,
    abort: AbortHandle,
}

struct Inner {
    fetcher: Arc<dyn AssetFetcher>,
    cache: Mutex<LruCache<String, Bytes>>,
    in_flight: Mutex<HashMap<String, InFlight>>,
}

impl Inner {
    fn cache(&self) -> MutexGuard<'_, LruCache<String, Bytes>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn in_flight(&self) -> MutexGuard<'_, HashMap<String, InFlight>> {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// A keyed asset cache with request de-duplication and cancellation.
///
/// `load` answers from an LRU byte cache first; on a miss, concurrent loads of the same URL
/// share one underlying fetch and all observe its result. Failed fetches are not cached, so
/// a flaky URL can be retried. `cancel` aborts an in-flight fetch; its waiters observe
/// [`AssetError::Canceled`].
///
/// Cheap to clone; clones share the cache and the in-flight table.
#[derive(Clone)]
pub struct AssetLoader {
    inner: Arc<Inner>,
}

impl AssetLoader {
    pub fn new(fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self::with_capacity(fetcher, DEFAULT_ASSET_CACHE_CAPACITY)
    }

    /// Capacity is clamped to at least 1.
    pub fn with_capacity(fetcher: Arc<dyn AssetFetcher>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Inner {
                fetcher,
                cache: Mutex::new(LruCache::new(capacity)),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Loads the asset at `url`, from cache when possible.
    pub async fn load(&self, url: &str) -> Result<Bytes, AssetError> {
        if url.is_empty() {
            return Err(AssetError::InvalidUrl(url.to_string()));
        }
        if let Some(bytes) = self.cached(url) {
            return Ok(bytes);
        }

        let mut rx = {
            let mut in_flight = self.inner.in_flight();
            // Re-check under the lock: the fetch may have completed between the cache miss
            // above and acquiring the in-flight table.
            if let Some(bytes) = self.inner.cache().get(url).cloned() {
                return Ok(bytes);
            }
            match in_flight.get(url) {
                Some(entry) => entry.tx.subscribe(),
                None => {
                    let (tx, rx) = broadcast::channel(1);
                    let task = tokio::spawn(run_fetch(Arc::clone(&self.inner), url.to_string()));
                    in_flight.insert(
                        url.to_string(),
                        InFlight {
                            tx,
                            abort: task.abort_handle(),
                        },
                    );
                    rx
                }
            }
        };

        match rx.recv().await {
            Ok(result) => result,
            // Sender dropped without a result: the fetch was canceled.
            Err(_) => Err(AssetError::Canceled),
        }
    }

    /// Returns the cached bytes for `url`, refreshing its recency, without fetching.
    pub fn cached(&self, url: &str) -> Option<Bytes> {
        self.inner.cache().get(url).cloned()
    }

    /// Aborts an in-flight load of `url`, if any. Completed loads stay cached.
    pub fn cancel(&self, url: &str) {
        if let Some(entry) = self.inner.in_flight().remove(url) {
            entry.abort.abort();
            // Dropping `entry.tx` wakes every waiter with a closed channel.
        }
    }

    /// Empties the byte cache. In-flight loads are unaffected.
    pub fn clear(&self) {
        self.inner.cache().clear();
    }

    pub fn cached_len(&self) -> usize {
        self.inner.cache().len()
    }
}

async fn run_fetch(inner: Arc<Inner>, url: String) {
    let result = inner
        .fetcher
        .fetch(&url)
        .await
        .map_err(AssetError::from);
    if let Ok(bytes) = &result {
        inner.cache().put(url.clone(), bytes.clone());
    }
    // A concurrent `cancel` may have removed the entry already; then there is nobody left
    // to notify and the send is skipped.
    if let Some(entry) = inner.in_flight().remove(&url) {
        let _ = entry.tx.send(result);
    }
}

/// Formats media-store URLs for content assets.
///
/// The base URL (CDN host) is injected at construction.
#[derive(Clone, Debug)]
pub struct AssetUrlScheme {
    base: String,
}

impl AssetUrlScheme {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base: String = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    /// Builds the URL for one asset. Post assets need a media kind (images resolve to the
    /// original rendition, videos to the HLS playlist); profile pictures ignore it. Other
    /// categories have no URL form here.
    pub fn url_for(
        &self,
        author_id: &str,
        asset_id: &str,
        kind: Option<ContentKind>,
        category: AssetCategory,
    ) -> Result<String, AssetError> {
        match (category, kind) {
            (AssetCategory::Post, Some(ContentKind::Image)) => Ok(format!(
                "{}/{}/post/{}/og",
                self.base, author_id, asset_id
            )),
            (AssetCategory::Post, Some(ContentKind::Video)) => Ok(format!(
                "{}/{}/post/{}/hls/og.m3u8",
                self.base, author_id, asset_id
            )),
            (AssetCategory::ProfilePic, _) => Ok(format!(
                "{}/{}/profile_pic/{}/og",
                self.base, author_id, asset_id
            )),
            _ => Err(AssetError::InvalidUrl(format!(
                "{}/{}",
                category.as_str(),
                asset_id
            ))),
        }
    }

    /// URL of an item's primary media asset.
    pub fn media_url(&self, item: &ContentItem) -> Result<String, AssetError> {
        self.url_for(&item.author_id, &item.id, Some(item.kind), AssetCategory::Post)
    }
}
