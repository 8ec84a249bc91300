//! The storage unit: one left linkage and one right linkage in a single slot.
//!
//! Both halves of a pair live at the same arena index, so the slot handle is
//! the record's identity and the sibling linkage is recovered by reading the
//! other half of the same slot.

use crate::types::{Left, Linkage, Node, Right};

/// Arena slot of the sentinel. Its left-child link on each side is that
/// side's real root, and its handle is the `end` position of both trees.
pub const SENTINEL: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<L, R> {
    pub(crate) left: Linkage<L>,
    pub(crate) right: Linkage<R>,
}

impl<L, R> Record<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self {
            left: Linkage::new(left),
            right: Linkage::new(right),
        }
    }

    /// A keyless record, used for the sentinel and for freed slots.
    pub fn vacant() -> Self {
        Self {
            left: Linkage::vacant(),
            right: Linkage::vacant(),
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.left.key.is_some() && self.right.key.is_some()
    }

    /// No keys and no links on either side: the state of a freed slot.
    pub fn is_vacant(&self) -> bool {
        let clear = |p: Option<u32>, l: Option<u32>, r: Option<u32>| {
            p.is_none() && l.is_none() && r.is_none()
        };
        self.left.key.is_none()
            && self.right.key.is_none()
            && clear(self.left.p, self.left.l, self.left.r)
            && clear(self.right.p, self.right.l, self.right.r)
    }

    pub fn pair(&self) -> Option<(&L, &R)> {
        Some((self.left.key.as_ref()?, self.right.key.as_ref()?))
    }

    /// Moves the keys out, leaving the slot vacant. Links must already be
    /// cleared by the tree erase on both sides.
    pub(crate) fn take_pair(&mut self) -> Option<(L, R)> {
        debug_assert!(self.left.p.is_none() && self.right.p.is_none());
        match (self.left.key.take(), self.right.key.take()) {
            (Some(l), Some(r)) => Some((l, r)),
            _ => None,
        }
    }
}

impl<L, R> Node<Left> for Record<L, R> {
    type Key = L;

    #[inline]
    fn half(&self) -> &Linkage<L> {
        &self.left
    }

    #[inline]
    fn half_mut(&mut self) -> &mut Linkage<L> {
        &mut self.left
    }
}

impl<L, R> Node<Right> for Record<L, R> {
    type Key = R;

    #[inline]
    fn half(&self) -> &Linkage<R> {
        &self.right
    }

    #[inline]
    fn half_mut(&mut self) -> &mut Linkage<R> {
        &mut self.right
    }
}
