use crate::*;

use pagefeed::{ContentItem, ContentKind, FetchError, Paginator, PaginatorOptions};

fn item(id: &str) -> ContentItem {
    ContentItem::new(id, ContentKind::Image)
}

fn page(ids: &[&str]) -> Vec<ContentItem> {
    ids.iter().map(|id| item(id)).collect()
}

// -- controller ------------------------------------------------------------

#[test]
fn on_activate_issues_one_initial_ticket() {
    let mut c = Controller::new(PaginatorOptions::new());
    let request = c.on_activate().expect("initial ticket");
    assert_eq!(request.page_index, 0);

    // Activation is one-shot; later loads are scroll-driven.
    assert!(c.on_activate().is_none());
    c.complete(&request, Ok(page(&["a"])));
    assert!(c.on_activate().is_none());
}

#[test]
fn from_paginator_with_content_counts_as_activated() {
    let mut p = Paginator::new(PaginatorOptions::new());
    let r = p.request_next_page().unwrap();
    p.complete_page(&r, Ok(page(&["a"])));

    let mut c = Controller::from_paginator(p);
    assert!(c.on_activate().is_none());
}

#[test]
fn retry_only_fires_after_a_failure() {
    let mut c = Controller::new(PaginatorOptions::new());
    assert!(c.retry().is_none(), "nothing to retry yet");

    let request = c.on_activate().unwrap();
    assert!(c.retry().is_none(), "no retry while loading");
    c.complete(&request, Err(FetchError::new("boom")));

    let request = c.retry().expect("retry ticket");
    assert_eq!(request.page_index, 0);
    c.complete(&request, Ok(page(&["a"])));
    assert!(c.retry().is_none(), "no retry after success");
}

#[test]
fn refresh_resets_then_reissues_page_zero() {
    let mut c = Controller::new(PaginatorOptions::new());
    let request = c.on_activate().unwrap();
    c.complete(&request, Ok(page(&["a", "b"])));
    assert_eq!(c.paginator().len(), 2);

    let request = c.refresh().expect("refresh ticket");
    assert_eq!(request.page_index, 0);
    assert!(c.paginator().is_empty());
    c.complete(&request, Ok(page(&["c"])));
    assert_eq!(c.paginator().len(), 1);
}

#[test]
fn on_scroll_respects_threshold() {
    let mut c = Controller::new(PaginatorOptions::<ContentItem>::new());
    // remaining = 500: above the default threshold.
    assert!(c.on_scroll(1400, 2000, 100).is_none());
    // remaining = 100: fetch.
    assert!(c.on_scroll(1800, 2000, 100).is_some());
}

// -- interactions ----------------------------------------------------------

#[test]
fn interaction_kind_titles() {
    assert_eq!(InteractionKind::Likes.title(), "Likes");
    assert_eq!(InteractionKind::Comments.title(), "Comments");
    assert_eq!(InteractionKind::Views.title(), "Views");
}

#[test]
fn sample_interactions_have_unique_ids_and_bodies() {
    let likes = sample_interactions(InteractionKind::Likes);
    assert_eq!(likes.len(), 5);
    assert!(likes.iter().all(|e| e.body == "liked this post"));

    let comments = sample_interactions(InteractionKind::Comments);
    assert_eq!(comments[0].username, "user_one");
    assert_eq!(comments[0].body, "Great post!");

    let mut ids: Vec<_> = comments.iter().map(|e| e.id.clone()).collect();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

#[test]
fn interaction_entries_paginate_like_any_item() {
    let mut p: Paginator<InteractionEntry> =
        Paginator::new(PaginatorOptions::new().with_page_size(2));
    let rows = sample_interactions(InteractionKind::Views);

    let r = p.request_next_page().unwrap();
    p.complete_page(&r, Ok(rows[..2].to_vec()));
    let r = p.request_next_page().unwrap();
    p.complete_page(&r, Ok(rows[1..4].to_vec()));

    assert_eq!(p.len(), 4, "overlap deduplicated by id");
}

// -- runtime ---------------------------------------------------------------

#[cfg(feature = "runtime")]
mod runtime {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use bytes::Bytes;
    use pagefeed::{LoadPhase, PageOutcome, PageRequest};

    struct CountingSource<S> {
        inner: S,
        calls: AtomicUsize,
    }

    impl<S> CountingSource<S> {
        fn new(inner: S) -> Self {
            Self {
                inner,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl<S: ContentSource> ContentSource for CountingSource<S> {
        type Item = S::Item;

        async fn fetch_page(
            &self,
            request: &PageRequest,
        ) -> Result<Vec<Self::Item>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_page(request).await
        }
    }

    fn appended(outcome: Option<PageOutcome>) -> usize {
        match outcome {
            Some(PageOutcome::Appended { appended, .. }) => appended,
            other => panic!("expected an append, got {other:?}"),
        }
    }

    // -- static source -----------------------------------------------------

    #[tokio::test]
    async fn static_source_slices_pages() {
        let source = StaticSource::new(sample_feed());
        let first = source.fetch_page(&PageRequest::new(0, 10)).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].id, "uuid1");

        let tail = source.fetch_page(&PageRequest::new(2, 10)).await.unwrap();
        assert_eq!(tail.len(), 5, "25 sample posts");

        let past_end = source.fetch_page(&PageRequest::new(3, 10)).await.unwrap();
        assert!(past_end.is_empty(), "end-of-feed is an empty page");
    }

    #[tokio::test]
    async fn static_source_scripted_failure_fires_once() {
        let source = StaticSource::new(sample_feed());
        source.fail_page(0);

        let err = source
            .fetch_page(&PageRequest::new(0, 10))
            .await
            .unwrap_err();
        assert!(err.message().contains("page 0"));

        assert!(source.fetch_page(&PageRequest::new(0, 10)).await.is_ok());
    }

    #[test]
    fn sample_feed_matches_the_mock_archive() {
        let feed = sample_feed();
        assert_eq!(feed.len(), 25);
        assert_eq!(feed[0].caption, "Beautiful sunset");
        assert_eq!(feed[1].kind, ContentKind::Video);
        assert_eq!(feed[1].height, 1920);
        // Every third generated post is a video.
        assert_eq!(feed[5].id, "uuid6");
        assert!(feed[5].kind.is_video());
        assert_eq!(feed[6].kind, ContentKind::Image);
        // Ids are unique across the whole feed.
        let mut ids: Vec<_> = feed.iter().map(|i| i.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 25);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn items_from_json_decodes_the_envelope() {
        let json = r#"{
            "contentMetadata": [{
                "postUUID": "uuid1",
                "postType": "image",
                "userID": "user1",
                "username": "photographer1",
                "postDescription": "Beautiful sunset",
                "resolutionWidth": 1080,
                "resolutionHeight": 1080,
                "createdAtMs": 1705343400000,
                "pop": 85.0,
                "numComments": 12
            }]
        }"#;
        let items = items_from_json(json).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "uuid1");
        assert_eq!(items[0].comment_count, Some(12));
    }

    // -- session -----------------------------------------------------------

    #[tokio::test]
    async fn session_pages_through_the_sample_feed() {
        let session = FeedSession::new(
            PaginatorOptions::new().with_page_size(10),
            StaticSource::new(sample_feed()),
        );

        assert_eq!(appended(session.activate().await), 10);
        assert_eq!(appended(session.request_next_page().await), 10);
        assert_eq!(appended(session.request_next_page().await), 5);
        assert_eq!(
            session.request_next_page().await,
            Some(PageOutcome::Exhausted)
        );

        assert_eq!(session.with_items(|items| items.len()), 25);
        let state = session.state();
        assert!(state.is_exhausted);
        assert_eq!(state.page_index, 3);

        // Exhausted: no further source calls, no outcome.
        assert!(session.request_next_page().await.is_none());
        assert!(session.activate().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_triggers_share_one_fetch() {
        let source = CountingSource::new(
            StaticSource::new(sample_feed()).with_latency(Duration::from_millis(50)),
        );
        let session = FeedSession::new(PaginatorOptions::new().with_page_size(10), source);

        let (first, second) = tokio::join!(
            session.request_next_page(),
            session.request_next_page()
        );
        assert_eq!(session.source().calls(), 1, "loading guard deduplicates");

        // Exactly one trigger performed the fetch; the other was a no-op.
        assert_eq!(appended(first.or(second)), 10);
        assert_eq!(session.with_items(|items| items.len()), 10);
    }

    #[tokio::test]
    async fn session_scroll_trigger_and_retry() {
        let source = StaticSource::new(sample_feed());
        source.fail_page(0);
        let session = FeedSession::new(PaginatorOptions::new().with_page_size(10), source);

        assert_eq!(session.activate().await, Some(PageOutcome::Failed));
        assert!(session.state().has_error);
        assert_eq!(session.with_controller(|c| c.paginator().phase()), LoadPhase::Failed);

        // Far from the bottom: nothing happens.
        assert!(session.notify_scroll(0, 2000, 100).await.is_none());
        // Near the bottom: retries page 0, which now succeeds.
        assert_eq!(appended(session.notify_scroll(1900, 2000, 100).await), 10);
        assert!(!session.state().has_error);
    }

    #[tokio::test]
    async fn session_explicit_retry_after_failure() {
        let source = StaticSource::new(sample_feed());
        source.fail_page(0);
        let session = FeedSession::new(PaginatorOptions::new().with_page_size(10), source);

        assert_eq!(session.activate().await, Some(PageOutcome::Failed));
        assert!(session.retry().await.is_some());
        assert_eq!(session.with_items(|items| items.len()), 10);
        assert!(session.retry().await.is_none(), "nothing left to retry");
    }

    #[tokio::test]
    async fn session_refresh_reloads_from_page_zero() {
        let session = FeedSession::new(
            PaginatorOptions::new().with_page_size(10),
            StaticSource::new(sample_feed()),
        );
        session.activate().await;
        session.request_next_page().await;
        assert_eq!(session.with_items(|items| items.len()), 20);

        assert_eq!(appended(session.refresh().await), 10);
        assert_eq!(session.with_items(|items| items.len()), 10);
        assert_eq!(session.state().page_index, 1);
    }

    #[tokio::test]
    async fn spawned_fetch_completes() {
        let session = Arc::new(FeedSession::new(
            PaginatorOptions::new().with_page_size(10),
            StaticSource::new(sample_feed()),
        ));
        let outcome = Arc::clone(&session).spawn_next_page().await.unwrap();
        assert_eq!(appended(outcome), 10);
        assert_eq!(session.with_items(|items| items.len()), 10);
    }

    #[tokio::test]
    async fn spawned_fetch_is_a_noop_after_session_drop() {
        // current-thread runtime: the spawned task cannot run before the drop below.
        let source = CountingSource::new(StaticSource::new(sample_feed()));
        let session = Arc::new(FeedSession::new(
            PaginatorOptions::<ContentItem>::new(),
            source,
        ));
        let handle = Arc::clone(&session).spawn_next_page();
        drop(session);

        assert_eq!(handle.await.unwrap(), None, "weak upgrade fails quietly");
    }

    // -- asset loading -----------------------------------------------------

    struct ScriptedFetcher {
        calls: AtomicUsize,
        fail_first: AtomicUsize,
        delay: Option<Duration>,
    }

    impl ScriptedFetcher {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first: AtomicUsize::new(0),
                delay: None,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn fail_first(self, n: usize) -> Self {
            self.fail_first.store(n, Ordering::SeqCst);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AssetFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let remaining = self.fail_first.load(Ordering::SeqCst);
            if remaining > 0 {
                self.fail_first.store(remaining - 1, Ordering::SeqCst);
                return Err(FetchError::new("scripted fetch failure"));
            }
            Ok(Bytes::from(url.as_bytes().to_vec()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_asset_loads_share_one_fetch() {
        let fetcher = Arc::new(ScriptedFetcher::new().with_delay(Duration::from_millis(50)));
        let loader = AssetLoader::new(Arc::clone(&fetcher) as Arc<dyn AssetFetcher>);

        let (a, b, c) = tokio::join!(
            loader.load("https://cdn/post/1/og"),
            loader.load("https://cdn/post/1/og"),
            loader.load("https://cdn/post/1/og")
        );
        assert_eq!(fetcher.calls(), 1, "in-flight loads are coalesced");
        assert_eq!(a.unwrap(), Bytes::from_static(b"https://cdn/post/1/og"));
        assert!(b.is_ok());
        assert!(c.is_ok());
    }

    #[tokio::test]
    async fn cached_assets_do_not_refetch() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let loader = AssetLoader::new(Arc::clone(&fetcher) as Arc<dyn AssetFetcher>);

        loader.load("https://cdn/a").await.unwrap();
        loader.load("https://cdn/a").await.unwrap();
        assert_eq!(fetcher.calls(), 1);
        assert!(loader.cached("https://cdn/a").is_some());

        loader.clear();
        assert!(loader.cached("https://cdn/a").is_none());
        loader.load("https://cdn/a").await.unwrap();
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn asset_cache_evicts_least_recently_used() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let loader = AssetLoader::with_capacity(Arc::clone(&fetcher) as Arc<dyn AssetFetcher>, 2);

        loader.load("https://cdn/a").await.unwrap();
        loader.load("https://cdn/b").await.unwrap();
        loader.load("https://cdn/c").await.unwrap();
        assert_eq!(loader.cached_len(), 2);
        assert!(loader.cached("https://cdn/a").is_none(), "oldest entry evicted");

        loader.load("https://cdn/a").await.unwrap();
        assert_eq!(fetcher.calls(), 4, "evicted entries are fetched again");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_aborts_in_flight_load() {
        let fetcher = Arc::new(ScriptedFetcher::new().with_delay(Duration::from_secs(10)));
        let loader = AssetLoader::new(Arc::clone(&fetcher) as Arc<dyn AssetFetcher>);

        let pending = {
            let loader = loader.clone();
            tokio::spawn(async move { loader.load("https://cdn/slow").await })
        };
        // Let the load register and start its fetch, then cancel well before the
        // 10 s fetch can finish.
        tokio::time::sleep(Duration::from_millis(10)).await;
        loader.cancel("https://cdn/slow");

        assert_eq!(pending.await.unwrap(), Err(AssetError::Canceled));
        assert!(loader.cached("https://cdn/slow").is_none());
    }

    #[tokio::test]
    async fn failed_fetches_are_not_cached() {
        let fetcher = Arc::new(ScriptedFetcher::new().fail_first(1));
        let loader = AssetLoader::new(Arc::clone(&fetcher) as Arc<dyn AssetFetcher>);

        let err = loader.load("https://cdn/flaky").await.unwrap_err();
        assert!(matches!(err, AssetError::Fetch(_)));
        assert!(loader.cached("https://cdn/flaky").is_none());

        assert!(loader.load("https://cdn/flaky").await.is_ok());
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn empty_url_is_rejected_without_fetching() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let loader = AssetLoader::new(Arc::clone(&fetcher) as Arc<dyn AssetFetcher>);

        assert!(matches!(
            loader.load("").await,
            Err(AssetError::InvalidUrl(_))
        ));
        assert_eq!(fetcher.calls(), 0);
    }

    // -- asset urls ---------------------------------------------------------

    #[test]
    fn url_scheme_formats_post_and_profile_assets() {
        let scheme = AssetUrlScheme::new("https://cdn.example.net/");

        assert_eq!(
            scheme
                .url_for("user1", "uuid1", Some(ContentKind::Image), pagefeed::AssetCategory::Post)
                .unwrap(),
            "https://cdn.example.net/user1/post/uuid1/og"
        );
        assert_eq!(
            scheme
                .url_for("user2", "uuid2", Some(ContentKind::Video), pagefeed::AssetCategory::Post)
                .unwrap(),
            "https://cdn.example.net/user2/post/uuid2/hls/og.m3u8"
        );
        assert_eq!(
            scheme
                .url_for("user3", "pic3", None, pagefeed::AssetCategory::ProfilePic)
                .unwrap(),
            "https://cdn.example.net/user3/profile_pic/pic3/og"
        );
        assert!(
            scheme
                .url_for("user4", "uuid4", None, pagefeed::AssetCategory::Graffiti)
                .is_err()
        );
    }

    #[test]
    fn media_url_follows_the_item_kind() {
        let scheme = AssetUrlScheme::new("https://cdn.example.net");
        let mut video = item("uuid9");
        video.kind = ContentKind::Video;
        video.author_id = "user9".to_string();

        assert_eq!(
            scheme.media_url(&video).unwrap(),
            "https://cdn.example.net/user9/post/uuid9/hls/og.m3u8"
        );
    }
}
