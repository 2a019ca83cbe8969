use alloc::string::String;

use crate::PageItem;

/// The media kind of a post's primary asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ContentKind {
    Image,
    Video,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Parses the wire form ("image"/"video", any case). Unknown strings are `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("image") {
            Some(Self::Image)
        } else if raw.eq_ignore_ascii_case("video") {
            Some(Self::Video)
        } else {
            None
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video)
    }
}

/// Which slot of the media store an asset lives in.
///
/// Consumed by URL formatting in the adapter crate; carried here because items reference it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AssetCategory {
    Post,
    ProfilePic,
    Snap,
    Graffiti,
    Album,
}

impl AssetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::ProfilePic => "profile_pic",
            Self::Snap => "snap",
            Self::Graffiti => "graffiti",
            Self::Album => "album",
        }
    }
}

/// One post in an archive feed.
///
/// Consumed read-only by the engine; all descriptive fields pass through to the rendering
/// layer untouched. With `feature = "serde"` the field names follow the backend payload keys.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentItem {
    /// Stable unique identifier (post UUID). Globally unique across all pages a source
    /// returns; the engine drops any item whose id was already accumulated.
    #[cfg_attr(feature = "serde", serde(rename = "postUUID"))]
    pub id: String,
    #[cfg_attr(feature = "serde", serde(rename = "postType"))]
    pub kind: ContentKind,
    #[cfg_attr(feature = "serde", serde(rename = "userID"))]
    pub author_id: String,
    #[cfg_attr(feature = "serde", serde(rename = "username"))]
    pub author_name: String,
    #[cfg_attr(feature = "serde", serde(rename = "postDescription"))]
    pub caption: String,
    #[cfg_attr(feature = "serde", serde(rename = "resolutionWidth"))]
    pub width: u32,
    #[cfg_attr(feature = "serde", serde(rename = "resolutionHeight"))]
    pub height: u32,
    /// Creation time, epoch milliseconds.
    #[cfg_attr(feature = "serde", serde(rename = "createdAtMs"))]
    pub created_at_ms: i64,
    /// Popularity score ("pop").
    #[cfg_attr(feature = "serde", serde(rename = "pop"))]
    pub popularity: f32,
    /// `None` means the count is unknown, not zero.
    #[cfg_attr(feature = "serde", serde(rename = "numComments", default))]
    pub comment_count: Option<u32>,
}

impl ContentItem {
    /// Creates an item with the given identity and everything else zeroed/empty.
    pub fn new(id: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            id: id.into(),
            kind,
            author_id: String::new(),
            author_name: String::new(),
            caption: String::new(),
            width: 0,
            height: 0,
            created_at_ms: 0,
            popularity: 0.0,
            comment_count: None,
        }
    }
}

impl PageItem for ContentItem {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn is_well_formed(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Scroll geometry reported by the UI layer, in whatever distance unit the UI uses
/// (points, pixels, rows). The engine only compares distances, it never interprets them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollMetrics {
    /// Current scroll offset from the top of the content.
    pub offset: u64,
    /// Total extent of the scrollable content.
    pub content_extent: u64,
    /// Extent of the visible viewport.
    pub viewport_extent: u64,
}

impl ScrollMetrics {
    pub fn new(offset: u64, content_extent: u64, viewport_extent: u64) -> Self {
        Self {
            offset,
            content_extent,
            viewport_extent,
        }
    }

    /// Distance between the bottom edge of the viewport and the end of the content.
    /// Saturates to zero when the viewport is already past the end (bounce/overscroll).
    pub fn remaining_to_end(&self) -> u64 {
        self.content_extent
            .saturating_sub(self.offset.saturating_add(self.viewport_extent))
    }
}

/// A ticket for one page fetch, issued by `Paginator::request_next_page`.
///
/// The host hands this to its content source and hands it back together with the result.
/// Tickets from before a `reset()` carry a stale generation and are ignored on completion,
/// so late completions of a torn-down list session are harmless no-ops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page_index: u32,
    pub page_size: usize,
    pub(crate) generation: u64,
}

impl PageRequest {
    /// Builds a standalone ticket for driving a source directly (tests, tools, prefetching
    /// outside the engine). Tickets meant for `complete_page` should come from
    /// `request_next_page` instead, so they carry the live generation.
    pub fn new(page_index: u32, page_size: usize) -> Self {
        Self {
            page_index,
            page_size,
            generation: 0,
        }
    }

    /// The engine generation this ticket was issued under.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Externally observable loading phase.
///
/// `Exhausted` is terminal until `reset()`. `Failed` means the most recent fetch failed and
/// the same page index will be retried on the next trigger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Exhausted,
    Failed,
}

/// An incremental list update for the presentation sink.
///
/// `Appended` carries only the newly accumulated range so the UI can insert rows instead of
/// reloading the whole list. `Replaced` is emitted on `reset()` and means "start over from
/// this (possibly empty) list".
#[derive(Debug)]
pub enum ListDelta<'a, I> {
    Appended {
        /// Index of the first new item in the accumulated list.
        start: usize,
        items: &'a [I],
    },
    Replaced {
        items: &'a [I],
    },
}

impl<I> Clone for ListDelta<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for ListDelta<'_, I> {}
