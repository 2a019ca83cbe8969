/// A lightweight, serializable snapshot of the pagination state.
///
/// Useful for driving UI affordances without holding a borrow of the engine, and for
/// restoring a "where was I" indicator across sessions. With `feature = "serde"`, this type
/// implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaginationState {
    /// The next page index that will be requested.
    pub page_index: u32,
    /// Items accumulated so far (after de-duplication).
    pub item_count: usize,
    pub is_loading: bool,
    pub is_exhausted: bool,
    pub has_error: bool,
}
