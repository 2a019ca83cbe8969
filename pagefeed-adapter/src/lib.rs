//! Adapter utilities for the `pagefeed` crate.
//!
//! The `pagefeed` crate is UI- and IO-agnostic and focuses on the pagination protocol. This
//! crate provides the glue a real screen needs around it:
//!
//! - [`Controller`]: framework-neutral wiring for UI events (activation, scroll, retry,
//!   pull-to-refresh)
//! - [`ContentSource`] + [`FeedSession`]: an async fetch seam and a tokio driver that keeps
//!   the single-fetch-in-flight invariant (`runtime` feature)
//! - [`StaticSource`]: a mock/fixture content source for demos and tests (`runtime` feature)
//! - [`AssetLoader`]: a keyed asset cache with request de-duplication and cancellation, plus
//!   media URL formatting (`runtime` feature)
//! - interaction-list data types for likes/comments/views sheets
//!
//! This crate is intentionally framework-agnostic (no ratatui/egui/DOM bindings) and ships
//! no HTTP client; transports are injected behind the source/fetcher traits.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[cfg(feature = "runtime")]
mod assets;
mod controller;
mod interactions;
#[cfg(feature = "runtime")]
mod mock;
#[cfg(feature = "runtime")]
mod session;
#[cfg(feature = "runtime")]
mod source;

#[cfg(test)]
mod tests;

#[cfg(feature = "runtime")]
pub use assets::{
    AssetError, AssetFetcher, AssetLoader, AssetUrlScheme, DEFAULT_ASSET_CACHE_CAPACITY,
};
pub use controller::Controller;
pub use interactions::{InteractionEntry, InteractionKind, sample_interactions};
#[cfg(all(feature = "runtime", feature = "serde"))]
pub use mock::items_from_json;
#[cfg(feature = "runtime")]
pub use mock::{StaticSource, sample_feed};
#[cfg(feature = "runtime")]
pub use session::FeedSession;
#[cfg(feature = "runtime")]
pub use source::ContentSource;
