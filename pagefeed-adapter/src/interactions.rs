use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use pagefeed::PageItem;

/// Which interaction sheet a detail view shows for a post.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InteractionKind {
    Likes,
    Comments,
    Views,
}

impl InteractionKind {
    /// Sheet title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Likes => "Likes",
            Self::Comments => "Comments",
            Self::Views => "Views",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Likes => "likes",
            Self::Comments => "comments",
            Self::Views => "views",
        }
    }
}

/// One row of an interaction sheet (a like, a comment, or a view).
///
/// Implements [`PageItem`], so an interaction sheet pages through the same engine as the
/// feed itself.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractionEntry {
    pub id: String,
    pub username: String,
    /// Display text, e.g. "liked this post" or the comment body.
    pub body: String,
}

impl PageItem for InteractionEntry {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn is_well_formed(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Placeholder interaction rows used until the interaction backend exists.
pub fn sample_interactions(kind: InteractionKind) -> Vec<InteractionEntry> {
    const USERNAMES: [&str; 5] = ["user_one", "user_two", "user_three", "user_four", "user_five"];
    const COMMENTS: [&str; 5] = [
        "Great post!",
        "Love this!",
        "Amazing content",
        "Keep it up!",
        "Beautiful shot",
    ];

    USERNAMES
        .iter()
        .enumerate()
        .map(|(n, username)| {
            let body = match kind {
                InteractionKind::Likes => "liked this post".to_string(),
                InteractionKind::Comments => COMMENTS[n].to_string(),
                InteractionKind::Views => "viewed this post".to_string(),
            };
            InteractionEntry {
                id: format!("{}-{}", kind.as_str(), n + 1),
                username: (*username).to_string(),
                body,
            }
        })
        .collect()
}
