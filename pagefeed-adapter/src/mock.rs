use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use pagefeed::{ContentItem, ContentKind, FetchError, PageItem, PageRequest};

use crate::ContentSource;

/// A content source backed by a fixed in-memory list, paged by slicing.
///
/// Stands in for the real backend in demos and tests: pages past the end of the list come
/// back empty (end-of-feed), responses can be delayed to mimic network latency, and
/// individual pages can be scripted to fail once.
pub struct StaticSource<I = ContentItem> {
    items: Vec<I>,
    latency: Option<Duration>,
    failures: Mutex<HashSet<u32>>,
}

impl<I> StaticSource<I> {
    pub fn new(items: Vec<I>) -> Self {
        Self {
            items,
            latency: None,
            failures: Mutex::new(HashSet::new()),
        }
    }

    /// Delays every response, mimicking a slow backend.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Scripts `page_index` to fail exactly once; the next fetch of that page succeeds.
    pub fn fail_page(&self, page_index: u32) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(page_index);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl<I> ContentSource for StaticSource<I>
where
    I: PageItem + Clone + Send + Sync,
{
    type Item = I;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<I>, FetchError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let scripted = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&request.page_index);
        if scripted {
            return Err(FetchError::new(format!(
                "scripted failure for page {}",
                request.page_index
            )));
        }

        let start = (request.page_index as usize).saturating_mul(request.page_size);
        Ok(self
            .items
            .iter()
            .skip(start)
            .take(request.page_size)
            .cloned()
            .collect())
    }
}

const JAN_2024_EPOCH_SECS: i64 = 1_704_067_200; // 2024-01-01T00:00:00Z

fn jan_2024_ms(day: i64, hour: i64, minute: i64) -> i64 {
    (JAN_2024_EPOCH_SECS + (day - 1) * 86_400 + hour * 3_600 + minute * 60) * 1_000
}

fn post(
    n: u32,
    kind: ContentKind,
    author: &str,
    author_name: &str,
    caption: &str,
    (width, height): (u32, u32),
    created_at_ms: i64,
    popularity: f32,
    comment_count: u32,
) -> ContentItem {
    ContentItem {
        id: format!("uuid{n}"),
        kind,
        author_id: author.to_string(),
        author_name: author_name.to_string(),
        caption: caption.to_string(),
        width,
        height,
        created_at_ms,
        popularity,
        comment_count: Some(comment_count),
    }
}

/// The sample archive used by demos and tests: a few hand-written posts plus generated
/// filler (every third filler post is a video), 25 items total.
pub fn sample_feed() -> Vec<ContentItem> {
    let mut items = vec![
        post(
            1,
            ContentKind::Image,
            "user1",
            "photographer1",
            "Beautiful sunset",
            (1080, 1080),
            jan_2024_ms(15, 18, 30),
            85.0,
            12,
        ),
        post(
            2,
            ContentKind::Video,
            "user2",
            "artist2",
            "Street art timelapse",
            (1080, 1920),
            jan_2024_ms(14, 12, 15),
            92.0,
            25,
        ),
        post(
            3,
            ContentKind::Image,
            "user3",
            "architect3",
            "City architecture",
            (1080, 1080),
            jan_2024_ms(13, 9, 45),
            78.0,
            8,
        ),
    ];

    for i in 4u32..=25 {
        let kind = if i % 3 == 0 {
            ContentKind::Video
        } else {
            ContentKind::Image
        };
        items.push(post(
            i,
            kind,
            &format!("user{i}"),
            &format!("user{i}"),
            &format!("Sample post {i}"),
            (1080, 1080),
            jan_2024_ms(10 + i64::from(i % 20), 10 + i64::from(i % 12), 0),
            60.0 + (i % 40) as f32,
            i % 20,
        ));
    }

    items
}

/// Decodes the backend's content-metadata envelope (`{"contentMetadata": [...]}`).
#[cfg(feature = "serde")]
pub fn items_from_json(json: &str) -> Result<Vec<ContentItem>, serde_json::Error> {
    #[derive(serde::Deserialize)]
    struct Envelope {
        #[serde(rename = "contentMetadata")]
        content_metadata: Vec<ContentItem>,
    }

    Ok(serde_json::from_str::<Envelope>(json)?.content_metadata)
}
