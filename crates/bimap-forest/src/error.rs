use std::collections::TryReserveError;

use thiserror::Error;

use crate::types::SideKind;

/// Recoverable failures of [`crate::BiTreeMap::try_insert`].
///
/// In every case the map is left exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("left key is already present")]
    DuplicateLeft,
    #[error("right key is already present")]
    DuplicateRight,
    #[error("arena allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    #[error("arena cannot address more than u32::MAX records")]
    Capacity,
}

/// A broken structural invariant, reported by
/// [`crate::BiTreeMap::check_invariants`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("{side} tree: key at slot {slot} is not greater than its predecessor")]
    Order { side: SideKind, slot: u32 },
    #[error("{side} tree: slot {child} does not point back to its parent {parent}")]
    ParentLink {
        side: SideKind,
        parent: u32,
        child: u32,
    },
    #[error("{side} tree: slot {slot} is its own child")]
    SelfLoop { side: SideKind, slot: u32 },
    #[error("{side} tree: slot {slot} is linked but holds no key")]
    MissingKey { side: SideKind, slot: u32 },
    #[error("{side} tree: reached more nodes than the arena holds")]
    Cycle { side: SideKind },
    #[error("{side} tree holds {counted} records, expected {expected}")]
    CountMismatch {
        side: SideKind,
        counted: usize,
        expected: usize,
    },
    #[error("slot {slot} is reachable from the {side} tree only")]
    Bijection { side: SideKind, slot: u32 },
    #[error("sentinel slot is corrupt")]
    SentinelCorrupt,
    #[error("arena has {slots} slots but holds {len} entries and {free} free slots")]
    SlotAccounting { slots: usize, len: usize, free: usize },
    #[error("free slot {slot} still holds a key or a link")]
    FreeSlotInUse { slot: u32 },
}
