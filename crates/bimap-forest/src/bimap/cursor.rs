use std::marker::PhantomData;

use crate::record::SENTINEL;
use crate::types::{Left, Right, Side, SideKind};

/// A position in one ordering of a [`crate::BiTreeMap`].
///
/// A cursor is a plain slot handle: it does not borrow the map, stays valid
/// across inserts and erases of other entries, and is invalidated only by
/// erasing the entry it names (or by [`crate::BiTreeMap::clear`]). Using an
/// invalidated cursor, or one taken from a different map, is a caller error;
/// it never causes memory unsafety but may name an unrelated entry or panic.
///
/// Two cursors are equal iff they name the same slot, so every map's `end`
/// compares equal to [`Cursor::end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor<S> {
    pub(crate) slot: u32,
    side: PhantomData<S>,
}

/// Cursor into the ordering by left key.
pub type LeftCursor = Cursor<Left>;

/// Cursor into the ordering by right key.
pub type RightCursor = Cursor<Right>;

impl<S: Side> Cursor<S> {
    #[inline]
    pub(crate) const fn new(slot: u32) -> Self {
        Self {
            slot,
            side: PhantomData,
        }
    }

    /// The past-the-end position.
    #[inline]
    pub const fn end() -> Self {
        Self::new(SENTINEL)
    }

    #[inline]
    pub fn is_end(self) -> bool {
        self.slot == SENTINEL
    }

    /// The same entry seen from the other ordering. O(1): both halves of an
    /// entry share one slot. `end` flips to `end`.
    #[inline]
    pub fn flip(self) -> Cursor<S::Flip> {
        Cursor::new(self.slot)
    }

    #[inline]
    pub fn side(self) -> SideKind {
        S::KIND
    }
}
