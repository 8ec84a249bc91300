//! The bidirectional map: one arena of records, two search trees over it.

pub mod cursor;
pub mod iter;

use std::borrow::Borrow;
use std::fmt;

use log::{debug, trace};

use crate::error::{Error, InvariantError};
use crate::record::{Record, SENTINEL};
use crate::types::{Left, Node, Right, Side, SideKind};
use crate::util::{self, Locate};

pub use cursor::{Cursor, LeftCursor, RightCursor};
pub use iter::Iter;

/// An ordered bijection between left keys `L` and right keys `R`.
///
/// Every entry is one record holding both keys. The record is linked into a
/// search tree ordered by `L` and a second one ordered by `R`, so lookups,
/// ordered traversal and erasure work from either side, and a
/// [`Cursor`] on one side [`flip`](Cursor::flip)s to the other in O(1).
///
/// # Known limitation
///
/// The trees are never rebalanced. Operations are O(depth), which is
/// O(log n) for random insertion order but O(n) for sorted or otherwise
/// adversarial order. [`BiTreeMap::depth_left`] and
/// [`BiTreeMap::depth_right`] expose the current heights.
///
/// # Caller obligations
///
/// - [`insert`](BiTreeMap::insert) requires both keys to be absent; it
///   panics otherwise. Use [`try_insert`](BiTreeMap::try_insert) when
///   duplicates are possible.
/// - [`erase`](BiTreeMap::erase) requires a live cursor from this map; it
///   panics on `end`.
#[derive(Clone)]
pub struct BiTreeMap<L, R> {
    /// Slot 0 is the sentinel; other slots are live or on `free`.
    arena: Vec<Record<L, R>>,
    free: Vec<u32>,
    len: usize,
}

impl<L, R> BiTreeMap<L, R> {
    pub fn new() -> Self {
        Self {
            arena: vec![Record::vacant()],
            free: Vec::new(),
            len: 0,
        }
    }

    /// Creates an empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut arena = Vec::with_capacity(capacity.saturating_add(1));
        arena.push(Record::vacant());
        Self {
            arena,
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of entries. Both trees always hold exactly this many.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every entry at once. All cursors except `end` are invalidated.
    pub fn clear(&mut self) {
        self.arena.truncate(1);
        self.arena[SENTINEL as usize] = Record::vacant();
        self.free.clear();
        self.len = 0;
        debug!("cleared bimap");
    }

    #[inline]
    fn root<S: Side>(&self) -> Option<u32>
    where
        Record<L, R>: Node<S>,
    {
        util::get_l::<S, _>(&self.arena, SENTINEL)
    }

    /// Cursor to the smallest key on side `S`, or `end` when empty.
    pub fn begin<S: Side>(&self) -> Cursor<S>
    where
        Record<L, R>: Node<S>,
    {
        Cursor::new(util::first::<S, _>(&self.arena, self.root::<S>()).unwrap_or(SENTINEL))
    }

    /// Cursor to the largest key on side `S`, or `end` when empty.
    pub fn last<S: Side>(&self) -> Cursor<S>
    where
        Record<L, R>: Node<S>,
    {
        Cursor::new(util::last::<S, _>(&self.arena, self.root::<S>()).unwrap_or(SENTINEL))
    }

    /// The next position in the same ordering. `end` stays at `end`.
    pub fn next<S: Side>(&self, cursor: Cursor<S>) -> Cursor<S>
    where
        Record<L, R>: Node<S>,
    {
        Cursor::new(util::next::<S, _>(&self.arena, cursor.slot).unwrap_or(SENTINEL))
    }

    /// The previous position in the same ordering. Stepping back from `end`
    /// gives the last entry; stepping back from the first entry gives `end`.
    pub fn prev<S: Side>(&self, cursor: Cursor<S>) -> Cursor<S>
    where
        Record<L, R>: Node<S>,
    {
        Cursor::new(util::prev::<S, _>(&self.arena, cursor.slot).unwrap_or(SENTINEL))
    }

    /// The key the cursor is positioned at in its own ordering; `None` at
    /// `end`.
    pub fn key<S: Side>(&self, cursor: Cursor<S>) -> Option<&<Record<L, R> as Node<S>>::Key>
    where
        Record<L, R>: Node<S>,
    {
        let record = self.arena.get(cursor.slot as usize)?;
        <Record<L, R> as Node<S>>::half(record).key()
    }

    /// Both keys of the entry under the cursor, from either side.
    pub fn pair<S: Side>(&self, cursor: Cursor<S>) -> Option<(&L, &R)> {
        self.arena.get(cursor.slot as usize)?.pair()
    }

    pub fn begin_left(&self) -> LeftCursor {
        self.begin::<Left>()
    }

    pub fn begin_right(&self) -> RightCursor {
        self.begin::<Right>()
    }

    pub fn end_left(&self) -> LeftCursor {
        Cursor::end()
    }

    pub fn end_right(&self) -> RightCursor {
        Cursor::end()
    }

    pub fn last_left(&self) -> LeftCursor {
        self.last::<Left>()
    }

    pub fn last_right(&self) -> RightCursor {
        self.last::<Right>()
    }

    /// Left key under a left cursor.
    pub fn left(&self, cursor: LeftCursor) -> Option<&L> {
        self.key(cursor)
    }

    /// Right key under a right cursor.
    pub fn right(&self, cursor: RightCursor) -> Option<&R> {
        self.key(cursor)
    }

    /// Entries in ascending left order, as `(&L, &R)`.
    pub fn iter_left(&self) -> Iter<'_, L, R, Left> {
        let front = self.begin_left().slot;
        let back = self.last_left().slot;
        Iter::new(&self.arena, front, back, self.len)
    }

    /// Entries in ascending right order, as `(&R, &L)`.
    pub fn iter_right(&self) -> Iter<'_, L, R, Right> {
        let front = self.begin_right().slot;
        let back = self.last_right().slot;
        Iter::new(&self.arena, front, back, self.len)
    }

    pub fn depth_left(&self) -> usize {
        util::depth::<Left, _>(&self.arena, self.root::<Left>())
    }

    pub fn depth_right(&self) -> usize {
        util::depth::<Right, _>(&self.arena, self.root::<Right>())
    }

    /// Takes a slot off the free list, or grows the arena. Nothing is
    /// linked yet, so a failure here leaves the map untouched.
    fn alloc(&mut self, record: Record<L, R>) -> Result<u32, Error> {
        if let Some(slot) = self.free.pop() {
            self.arena[slot as usize] = record;
            return Ok(slot);
        }
        let slot = u32::try_from(self.arena.len()).map_err(|_| Error::Capacity)?;
        self.arena.try_reserve(1)?;
        self.arena.push(record);
        Ok(slot)
    }
}

impl<L: Ord, R: Ord> BiTreeMap<L, R> {
    /// Cursor to the entry with left key `key`, or `end_left()`.
    pub fn find_left<Q>(&self, key: &Q) -> LeftCursor
    where
        L: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor::new(util::find::<Left, _, Q>(&self.arena, SENTINEL, key).unwrap_or(SENTINEL))
    }

    /// Cursor to the entry with right key `key`, or `end_right()`.
    pub fn find_right<Q>(&self, key: &Q) -> RightCursor
    where
        R: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor::new(util::find::<Right, _, Q>(&self.arena, SENTINEL, key).unwrap_or(SENTINEL))
    }

    pub fn contains_left<Q>(&self, key: &Q) -> bool
    where
        L: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        !self.find_left(key).is_end()
    }

    pub fn contains_right<Q>(&self, key: &Q) -> bool
    where
        R: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        !self.find_right(key).is_end()
    }

    /// The right key paired with left key `key`.
    pub fn get_by_left<Q>(&self, key: &Q) -> Option<&R>
    where
        L: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.right(self.find_left(key).flip())
    }

    /// The left key paired with right key `key`.
    pub fn get_by_right<Q>(&self, key: &Q) -> Option<&L>
    where
        R: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.left(self.find_right(key).flip())
    }

    /// Inserts the pair `(left, right)`, returning a cursor to it on each
    /// side.
    ///
    /// Both trees are searched before either is modified, so on any error
    /// the map is unchanged.
    pub fn try_insert(&mut self, left: L, right: R) -> Result<(LeftCursor, RightCursor), Error> {
        let (l_parent, l_to_left) = match util::locate::<Left, _, L>(&self.arena, SENTINEL, &left) {
            Locate::Found(_) => return Err(Error::DuplicateLeft),
            Locate::Vacant { parent, left } => (parent, left),
        };
        let (r_parent, r_to_left) =
            match util::locate::<Right, _, R>(&self.arena, SENTINEL, &right) {
                Locate::Found(_) => return Err(Error::DuplicateRight),
                Locate::Vacant { parent, left } => (parent, left),
            };

        let slot = self.alloc(Record::new(left, right))?;
        util::attach::<Left, _>(&mut self.arena, slot, l_parent, l_to_left);
        util::attach::<Right, _>(&mut self.arena, slot, r_parent, r_to_left);
        self.len += 1;
        trace!("inserted slot {slot}, len {}", self.len);
        self.debug_check();
        Ok((Cursor::new(slot), Cursor::new(slot)))
    }

    /// Inserts the pair `(left, right)`, returning a cursor to it on each
    /// side.
    ///
    /// # Panics
    ///
    /// If `left` is already a left key or `right` already a right key. The
    /// map is not modified in that case.
    pub fn insert(&mut self, left: L, right: R) -> (LeftCursor, RightCursor) {
        match self.try_insert(left, right) {
            Ok(cursors) => cursors,
            Err(err) => panic!("BiTreeMap::insert: {err}"),
        }
    }

    /// Removes the entry under `cursor` from both trees and returns the
    /// position that followed it in the cursor's ordering.
    ///
    /// Only cursors to the removed entry are invalidated.
    ///
    /// # Panics
    ///
    /// If `cursor` is `end` or does not name a live entry.
    pub fn erase<S: Side>(&mut self, cursor: Cursor<S>) -> Cursor<S>
    where
        Record<L, R>: Node<S>,
    {
        assert!(!cursor.is_end(), "BiTreeMap::erase: cannot erase the end cursor");
        assert!(
            self.arena
                .get(cursor.slot as usize)
                .is_some_and(|rec| rec.is_occupied()),
            "BiTreeMap::erase: cursor does not name a live entry"
        );
        // The successor keeps its slot through the unlink below.
        let next = self.next(cursor);
        self.remove_slot(cursor.slot);
        next
    }

    pub fn erase_left(&mut self, cursor: LeftCursor) -> LeftCursor {
        self.erase(cursor)
    }

    pub fn erase_right(&mut self, cursor: RightCursor) -> RightCursor {
        self.erase(cursor)
    }

    fn remove_slot(&mut self, slot: u32) {
        util::erase::<Left, _>(&mut self.arena, slot);
        util::erase::<Right, _>(&mut self.arena, slot);
        drop(self.arena[slot as usize].take_pair());
        self.free.push(slot);
        self.len -= 1;
        trace!("erased slot {slot}, len {}", self.len);
        self.debug_check();
    }

    /// Verifies both trees and their bijection.
    ///
    /// Walks every entry, so this is O(n). With the `check-invariants`
    /// feature it runs after every insert and erase.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let sentinel = &self.arena[SENTINEL as usize];
        if sentinel.left.key().is_some()
            || sentinel.right.key().is_some()
            || sentinel.left.p().is_some()
            || sentinel.right.p().is_some()
            || sentinel.left.r().is_some()
            || sentinel.right.r().is_some()
        {
            return Err(InvariantError::SentinelCorrupt);
        }

        // Every non-sentinel slot is either live or on the free list.
        if self.arena.len() != 1 + self.len + self.free.len() {
            return Err(InvariantError::SlotAccounting {
                slots: self.arena.len(),
                len: self.len,
                free: self.free.len(),
            });
        }
        for &slot in &self.free {
            let clean = slot != SENTINEL
                && self
                    .arena
                    .get(slot as usize)
                    .is_some_and(Record::is_vacant);
            if !clean {
                return Err(InvariantError::FreeSlotInUse { slot });
            }
        }

        let left = util::check_tree::<Left, _>(&self.arena, SENTINEL)?;
        let right = util::check_tree::<Right, _>(&self.arena, SENTINEL)?;
        for (side, counted) in [(SideKind::Left, left.len()), (SideKind::Right, right.len())] {
            if counted != self.len {
                return Err(InvariantError::CountMismatch {
                    side,
                    counted,
                    expected: self.len,
                });
            }
        }

        let mut on_right = vec![false; self.arena.len()];
        for &slot in &right {
            on_right[slot as usize] = true;
        }
        if let Some(&slot) = left.iter().find(|&&slot| !on_right[slot as usize]) {
            return Err(InvariantError::Bijection {
                side: SideKind::Left,
                slot,
            });
        }
        Ok(())
    }

    #[inline]
    fn debug_check(&self) {
        if cfg!(feature = "check-invariants") {
            if let Err(err) = self.check_invariants() {
                panic!("BiTreeMap invariant violated: {err}");
            }
        }
    }
}

impl<L: fmt::Display, R: fmt::Display> BiTreeMap<L, R> {
    /// Shape of the left tree, for debugging.
    pub fn to_string_left(&self) -> String {
        util::print::print_tree::<Left, _>(&self.arena, SENTINEL, "")
    }

    /// Shape of the right tree, for debugging.
    pub fn to_string_right(&self) -> String {
        util::print::print_tree::<Right, _>(&self.arena, SENTINEL, "")
    }
}

impl<L, R> Default for BiTreeMap<L, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: fmt::Debug, R: fmt::Debug> fmt::Debug for BiTreeMap<L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter_left()).finish()
    }
}

impl<L: PartialEq, R: PartialEq> PartialEq for BiTreeMap<L, R> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter_left().eq(other.iter_left())
    }
}

impl<L: Eq, R: Eq> Eq for BiTreeMap<L, R> {}

impl<'a, L, R> IntoIterator for &'a BiTreeMap<L, R> {
    type Item = (&'a L, &'a R);
    type IntoIter = Iter<'a, L, R, Left>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_left()
    }
}

/// Panics on a duplicate key, like [`BiTreeMap::insert`].
impl<L: Ord, R: Ord> Extend<(L, R)> for BiTreeMap<L, R> {
    fn extend<I: IntoIterator<Item = (L, R)>>(&mut self, iter: I) {
        for (left, right) in iter {
            self.insert(left, right);
        }
    }
}

/// Panics on a duplicate key, like [`BiTreeMap::insert`].
impl<L: Ord, R: Ord> FromIterator<(L, R)> for BiTreeMap<L, R> {
    fn from_iter<I: IntoIterator<Item = (L, R)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}
