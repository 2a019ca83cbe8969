//! A headless paged-feed loading engine.
//!
//! For adapter-level utilities (UI controllers, async drivers, asset caching), see the
//! `pagefeed-adapter` crate.
//!
//! This crate focuses on the core protocol needed to feed an infinite-scroll list from a
//! page-based source: issuing fetch tickets in strict page order, applying completions as a
//! small state machine, de-duplicating overlapping pages, and emitting incremental append
//! deltas so the list UI never has to reload from scratch.
//!
//! It is UI-agnostic and IO-agnostic. A host layer is expected to provide:
//! - scroll geometry (offset, content extent, viewport extent)
//! - the actual page fetch (hand each [`PageRequest`] to a source, hand the result back)
//! - a presentation sink that consumes [`ListDelta`]s
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod item;
mod options;
mod paginator;
mod state;
mod types;


pub use error::FetchError;
pub use item::{ItemId, PageItem};
pub use options::{
    DEFAULT_PAGE_SIZE, DEFAULT_PREFETCH_THRESHOLD, ListCallback, OnChangeCallback,
    PaginatorOptions,
};
pub use paginator::{PageOutcome, Paginator};
pub use state::PaginationState;
pub use types::{
    AssetCategory, ContentItem, ContentKind, ListDelta, LoadPhase, PageRequest, ScrollMetrics,
};
