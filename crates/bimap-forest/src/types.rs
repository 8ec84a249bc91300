//! Side markers and the linkage (half-node) shared by both trees.
//!
//! A record carries two independent sets of tree links, one per key type.
//! Instead of two copies of every tree routine (`p`/`l`/`r` and
//! `p2`/`l2`/`r2`), the routines in [`crate::util`] are written once against
//! [`Node<S>`], where `S` is the [`Left`] or [`Right`] marker selecting which
//! half of the record is being walked.
//!
//! All "pointers" are `Option<u32>` slot handles into the container's arena.

use std::fmt;

/// Which of the two trees a marker, cursor or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideKind {
    Left,
    Right,
}

impl fmt::Display for SideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideKind::Left => f.write_str("left"),
            SideKind::Right => f.write_str("right"),
        }
    }
}

/// Type-level tree selector.
pub trait Side: Copy + Eq + fmt::Debug + 'static {
    /// The opposite tree.
    type Flip: Side<Flip = Self>;

    const KIND: SideKind;
}

/// Marker for the tree ordered by left keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Left;

/// Marker for the tree ordered by right keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Right;

impl Side for Left {
    type Flip = Right;
    const KIND: SideKind = SideKind::Left;
}

impl Side for Right {
    type Flip = Left;
    const KIND: SideKind = SideKind::Right;
}

/// One tree's participation state: a key plus parent/left/right handles.
///
/// `key` is `None` only for the sentinel and for vacant arena slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linkage<K> {
    pub(crate) key: Option<K>,
    pub(crate) p: Option<u32>,
    pub(crate) l: Option<u32>,
    pub(crate) r: Option<u32>,
}

impl<K> Linkage<K> {
    pub fn new(key: K) -> Self {
        Self {
            key: Some(key),
            p: None,
            l: None,
            r: None,
        }
    }

    pub fn vacant() -> Self {
        Self {
            key: None,
            p: None,
            l: None,
            r: None,
        }
    }

    #[inline]
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    #[inline]
    pub fn p(&self) -> Option<u32> {
        self.p
    }

    #[inline]
    pub fn l(&self) -> Option<u32> {
        self.l
    }

    #[inline]
    pub fn r(&self) -> Option<u32> {
        self.r
    }

    /// Drops all three links, leaving the key in place.
    pub(crate) fn unlink(&mut self) {
        self.p = None;
        self.l = None;
        self.r = None;
    }
}

/// Access to the half of an arena element that belongs to tree `S`.
pub trait Node<S: Side> {
    type Key;

    fn half(&self) -> &Linkage<Self::Key>;
    fn half_mut(&mut self) -> &mut Linkage<Self::Key>;
}
