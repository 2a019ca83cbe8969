#[cfg(not(feature = "std"))]
use alloc::collections::BTreeSet;
#[cfg(feature = "std")]
use std::collections::HashSet;

#[cfg(feature = "std")]
pub(crate) type IdSet<T> = HashSet<T>;
#[cfg(not(feature = "std"))]
pub(crate) type IdSet<T> = BTreeSet<T>;

#[cfg(feature = "std")]
#[doc(hidden)]
pub trait ItemId: core::hash::Hash + Eq {}
#[cfg(feature = "std")]
impl<T: core::hash::Hash + Eq> ItemId for T {}

#[cfg(not(feature = "std"))]
#[doc(hidden)]
pub trait ItemId: Ord {}
#[cfg(not(feature = "std"))]
impl<T: Ord> ItemId for T {}

/// An item the engine can paginate.
///
/// The engine is generic over the item type (default [`crate::ContentItem`]) so the same
/// protocol can drive any paged list, e.g. an interaction sheet. Only two things are required
/// of an item:
///
/// - a stable identity, used to drop items a source returns twice across overlapping pages
/// - an optional well-formedness check; items failing it are dropped with a warning instead
///   of failing the whole page
pub trait PageItem {
    /// Stable identity for de-duplication. First-seen wins; later occurrences are dropped.
    type Id: ItemId + Clone;

    fn id(&self) -> Self::Id;

    /// Basic shape validation. Defaults to accepting everything.
    fn is_well_formed(&self) -> bool {
        true
    }
}
