use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::record::{Record, SENTINEL};
use crate::types::{Left, Right};
use crate::util::{next, prev};

/// Borrowing in-order iterator over one side of a [`crate::BiTreeMap`].
///
/// On the left side it yields `(&L, &R)` in ascending left order; on the
/// right side `(&R, &L)` in ascending right order.
pub struct Iter<'a, L, R, S> {
    arena: &'a [Record<L, R>],
    front: u32,
    back: u32,
    remaining: usize,
    side: PhantomData<S>,
}

impl<'a, L, R, S> Iter<'a, L, R, S> {
    pub(crate) fn new(arena: &'a [Record<L, R>], front: u32, back: u32, len: usize) -> Self {
        Self {
            arena,
            front,
            back,
            remaining: len,
            side: PhantomData,
        }
    }
}

impl<'a, L, R, S> Clone for Iter<'a, L, R, S> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
            side: PhantomData,
        }
    }
}

impl<'a, L, R> Iterator for Iter<'a, L, R, Left> {
    type Item = (&'a L, &'a R);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.front;
        self.front = next::<Left, _>(self.arena, slot).unwrap_or(SENTINEL);
        self.remaining -= 1;
        self.arena[slot as usize].pair()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, L, R> DoubleEndedIterator for Iter<'a, L, R, Left> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.back;
        self.back = prev::<Left, _>(self.arena, slot).unwrap_or(SENTINEL);
        self.remaining -= 1;
        self.arena[slot as usize].pair()
    }
}

impl<'a, L, R> ExactSizeIterator for Iter<'a, L, R, Left> {}

impl<'a, L, R> FusedIterator for Iter<'a, L, R, Left> {}

impl<'a, L, R> Iterator for Iter<'a, L, R, Right> {
    type Item = (&'a R, &'a L);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.front;
        self.front = next::<Right, _>(self.arena, slot).unwrap_or(SENTINEL);
        self.remaining -= 1;
        self.arena[slot as usize].pair().map(|(l, r)| (r, l))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, L, R> DoubleEndedIterator for Iter<'a, L, R, Right> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.back;
        self.back = prev::<Right, _>(self.arena, slot).unwrap_or(SENTINEL);
        self.remaining -= 1;
        self.arena[slot as usize].pair().map(|(l, r)| (r, l))
    }
}

impl<'a, L, R> ExactSizeIterator for Iter<'a, L, R, Right> {}

impl<'a, L, R> FusedIterator for Iter<'a, L, R, Right> {}
