//! Ordered-linkage layer: plain (unbalanced) binary-search-tree routines.
//!
//! Every function is generic over the side marker `S` and works on one half
//! of the arena elements, so the same code walks the left tree and the right
//! tree of a [`crate::BiTreeMap`].
//!
//! Trees are anchored under a sentinel slot: the sentinel's left link is the
//! real root and the root's parent is the sentinel. The sentinel itself has
//! no parent, which is what terminates upward walks.

pub mod print;
pub mod swap;

use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::error::InvariantError;
use crate::types::{Node, Side};

pub use swap::swap;

#[inline]
pub(crate) fn get_p<S: Side, N: Node<S>>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].half().p
}

#[inline]
pub(crate) fn get_l<S: Side, N: Node<S>>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].half().l
}

#[inline]
pub(crate) fn get_r<S: Side, N: Node<S>>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].half().r
}

#[inline]
pub(crate) fn set_p<S: Side, N: Node<S>>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].half_mut().p = v;
}

#[inline]
pub(crate) fn set_l<S: Side, N: Node<S>>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].half_mut().l = v;
}

#[inline]
pub(crate) fn set_r<S: Side, N: Node<S>>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].half_mut().r = v;
}

#[inline]
fn key_at<S: Side, N: Node<S>>(arena: &[N], idx: u32) -> &N::Key {
    arena[idx as usize]
        .half()
        .key
        .as_ref()
        .expect("slot linked into a tree holds a key")
}

/// Whether `node` hangs off its parent's left link.
///
/// The sentinel has no parent and is never a left child.
pub fn is_left_child<S: Side, N: Node<S>>(arena: &[N], node: u32) -> bool {
    match get_p::<S, N>(arena, node) {
        Some(p) => get_l::<S, N>(arena, p) == Some(node),
        None => false,
    }
}

/// Sets the left (`left == true`) or right child link of `parent`.
#[inline]
pub(crate) fn set_child<S: Side, N: Node<S>>(
    arena: &mut [N],
    parent: u32,
    left: bool,
    child: Option<u32>,
) {
    if left {
        set_l::<S, N>(arena, parent, child);
    } else {
        set_r::<S, N>(arena, parent, child);
    }
}

/// Leftmost node of the subtree at `node`.
pub fn min<S: Side, N: Node<S>>(arena: &[N], mut node: u32) -> u32 {
    while let Some(l) = get_l::<S, N>(arena, node) {
        node = l;
    }
    node
}

/// Rightmost node of the subtree at `node`.
pub fn max<S: Side, N: Node<S>>(arena: &[N], mut node: u32) -> u32 {
    while let Some(r) = get_r::<S, N>(arena, node) {
        node = r;
    }
    node
}

/// Leftmost node in the tree, if any.
pub fn first<S: Side, N: Node<S>>(arena: &[N], root: Option<u32>) -> Option<u32> {
    root.map(|r| min::<S, N>(arena, r))
}

/// Rightmost node in the tree, if any.
pub fn last<S: Side, N: Node<S>>(arena: &[N], root: Option<u32>) -> Option<u32> {
    root.map(|r| max::<S, N>(arena, r))
}

/// In-order successor.
///
/// From the last real node this returns the sentinel. From the sentinel
/// itself there is nowhere to go and `None` is returned.
pub fn next<S: Side, N: Node<S>>(arena: &[N], node: u32) -> Option<u32> {
    if let Some(r) = get_r::<S, N>(arena, node) {
        return Some(min::<S, N>(arena, r));
    }
    let mut curr = node;
    loop {
        let p = get_p::<S, N>(arena, curr)?;
        if get_l::<S, N>(arena, p) == Some(curr) {
            return Some(p);
        }
        curr = p;
    }
}

/// In-order predecessor.
///
/// From the sentinel this is the last real node. From the first real node
/// the walk climbs past the sentinel and `None` is returned.
pub fn prev<S: Side, N: Node<S>>(arena: &[N], node: u32) -> Option<u32> {
    if let Some(l) = get_l::<S, N>(arena, node) {
        return Some(max::<S, N>(arena, l));
    }
    let mut curr = node;
    loop {
        let p = get_p::<S, N>(arena, curr)?;
        if get_r::<S, N>(arena, p) == Some(curr) {
            return Some(p);
        }
        curr = p;
    }
}

/// Result of a key search below a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locate {
    /// A node with an equal key already exists.
    Found(u32),
    /// No equal key; a new node belongs at this empty child link.
    Vacant { parent: u32, left: bool },
}

/// Descends from the root under `sentinel` looking for `key`.
///
/// Pure search: the arena is not touched, so a caller can locate the attach
/// point in both trees before committing to either.
pub fn locate<S, N, Q>(arena: &[N], sentinel: u32, key: &Q) -> Locate
where
    S: Side,
    N: Node<S>,
    N::Key: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut parent = sentinel;
    let mut left = true;
    let mut curr = get_l::<S, N>(arena, sentinel);
    while let Some(i) = curr {
        match key.cmp(key_at::<S, N>(arena, i).borrow()) {
            Ordering::Less => {
                parent = i;
                left = true;
                curr = get_l::<S, N>(arena, i);
            }
            Ordering::Equal => return Locate::Found(i),
            Ordering::Greater => {
                parent = i;
                left = false;
                curr = get_r::<S, N>(arena, i);
            }
        }
    }
    Locate::Vacant { parent, left }
}

/// Finds the node holding `key`.
pub fn find<S, N, Q>(arena: &[N], sentinel: u32, key: &Q) -> Option<u32>
where
    S: Side,
    N: Node<S>,
    N::Key: Borrow<Q>,
    Q: Ord + ?Sized,
{
    match locate::<S, N, Q>(arena, sentinel, key) {
        Locate::Found(i) => Some(i),
        Locate::Vacant { .. } => None,
    }
}

/// Hangs the unlinked `node` off an empty child link of `parent`.
pub fn attach<S: Side, N: Node<S>>(arena: &mut [N], node: u32, parent: u32, left: bool) {
    debug_assert!(if left {
        get_l::<S, N>(arena, parent).is_none()
    } else {
        get_r::<S, N>(arena, parent).is_none()
    });
    if left {
        set_l::<S, N>(arena, parent, Some(node));
    } else {
        set_r::<S, N>(arena, parent, Some(node));
    }
    let half = arena[node as usize].half_mut();
    half.p = Some(parent);
    half.l = None;
    half.r = None;
}

/// BST insert of the unlinked `node` below `sentinel`.
///
/// Returns `false`, leaving the tree untouched, if an equal key is present.
pub fn insert<S, N>(arena: &mut [N], sentinel: u32, node: u32) -> bool
where
    S: Side,
    N: Node<S>,
    N::Key: Ord,
{
    let at = locate::<S, N, N::Key>(arena, sentinel, key_at::<S, N>(arena, node));
    match at {
        Locate::Found(_) => false,
        Locate::Vacant { parent, left } => {
            attach::<S, N>(arena, node, parent, left);
            true
        }
    }
}

/// Unlinks `node` from its tree.
///
/// A node with two children first trades places with its in-order
/// successor. Only the links move: `node` keeps its slot and key, and ends
/// up where the successor was, with no left child. Splicing out a node with
/// at most one child then finishes the job.
pub fn erase<S: Side, N: Node<S>>(arena: &mut [N], node: u32) {
    if get_l::<S, N>(arena, node).is_some() {
        if let Some(r) = get_r::<S, N>(arena, node) {
            let successor = min::<S, N>(arena, r);
            swap::<S, N>(arena, node, successor);
        }
    }

    let p = get_p::<S, N>(arena, node).expect("erased node has a parent");
    let left = is_left_child::<S, N>(arena, node);
    let child = get_l::<S, N>(arena, node).or(get_r::<S, N>(arena, node));
    set_child::<S, N>(arena, p, left, child);
    if let Some(c) = child {
        set_p::<S, N>(arena, c, Some(p));
    }
    arena[node as usize].half_mut().unlink();
}

/// Height of the tree rooted at `root`; zero for an empty tree.
pub fn depth<S: Side, N: Node<S>>(arena: &[N], root: Option<u32>) -> usize {
    let mut max_depth = 0;
    let mut stack: Vec<(u32, usize)> = root.map(|r| (r, 1)).into_iter().collect();
    while let Some((node, d)) = stack.pop() {
        max_depth = max_depth.max(d);
        if let Some(l) = get_l::<S, N>(arena, node) {
            stack.push((l, d + 1));
        }
        if let Some(r) = get_r::<S, N>(arena, node) {
            stack.push((r, d + 1));
        }
    }
    max_depth
}

/// Validates the tree under `sentinel` and returns its nodes in key order.
///
/// Checks link symmetry, absence of self links and cycles, key presence, and
/// strictly ascending in-order keys. Iterative, so a degenerate (list-shaped)
/// tree does not exhaust the stack.
pub fn check_tree<S, N>(arena: &[N], sentinel: u32) -> Result<Vec<u32>, InvariantError>
where
    S: Side,
    N: Node<S>,
    N::Key: Ord,
{
    let side = S::KIND;
    let mut stack: Vec<u32> = get_l::<S, N>(arena, sentinel).into_iter().collect();
    if let Some(root) = stack.first() {
        if get_p::<S, N>(arena, *root) != Some(sentinel) {
            return Err(InvariantError::ParentLink {
                side,
                parent: sentinel,
                child: *root,
            });
        }
    }

    let mut seen = 0usize;
    while let Some(node) = stack.pop() {
        seen += 1;
        if seen > arena.len() {
            return Err(InvariantError::Cycle { side });
        }
        if arena[node as usize].half().key.is_none() {
            return Err(InvariantError::MissingKey { side, slot: node });
        }
        for child in [get_l::<S, N>(arena, node), get_r::<S, N>(arena, node)]
            .into_iter()
            .flatten()
        {
            if child == node {
                return Err(InvariantError::SelfLoop { side, slot: node });
            }
            if get_p::<S, N>(arena, child) != Some(node) {
                return Err(InvariantError::ParentLink {
                    side,
                    parent: node,
                    child,
                });
            }
            stack.push(child);
        }
    }

    let mut order = Vec::with_capacity(seen);
    let mut curr = first::<S, N>(arena, get_l::<S, N>(arena, sentinel));
    while let Some(node) = curr {
        if node == sentinel {
            break;
        }
        if let Some(&before) = order.last() {
            if key_at::<S, N>(arena, before) >= key_at::<S, N>(arena, node) {
                return Err(InvariantError::Order { side, slot: node });
            }
        }
        order.push(node);
        curr = next::<S, N>(arena, node);
    }
    if order.len() != seen {
        return Err(InvariantError::CountMismatch {
            side,
            counted: order.len(),
            expected: seen,
        });
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Left, Linkage};

    /// Single-sided arena element for exercising the layer in isolation.
    #[derive(Debug, Clone)]
    struct N(Linkage<u64>);

    impl Node<Left> for N {
        type Key = u64;
        fn half(&self) -> &Linkage<u64> {
            &self.0
        }
        fn half_mut(&mut self) -> &mut Linkage<u64> {
            &mut self.0
        }
    }

    const ANCHOR: u32 = 0;

    /// Slot 0 is the anchor; keys are inserted in the given order.
    fn build(keys: &[u64]) -> Vec<N> {
        let mut arena = vec![N(Linkage::vacant())];
        for &k in keys {
            arena.push(N(Linkage::new(k)));
            let idx = (arena.len() - 1) as u32;
            assert!(insert::<Left, N>(&mut arena, ANCHOR, idx));
        }
        arena
    }

    fn keys_in_order(arena: &[N]) -> Vec<u64> {
        check_tree::<Left, N>(arena, ANCHOR)
            .unwrap()
            .into_iter()
            .map(|i| arena[i as usize].0.key.unwrap())
            .collect()
    }

    fn slot_of(arena: &[N], key: u64) -> u32 {
        find::<Left, N, u64>(arena, ANCHOR, &key).unwrap()
    }

    #[test]
    fn insert_and_traverse_in_order() {
        let arena = build(&[5, 2, 8, 1, 4]);
        assert_eq!(keys_in_order(&arena), vec![1, 2, 4, 5, 8]);
        assert_eq!(get_l::<Left, N>(&arena, ANCHOR), Some(1));
        assert_eq!(get_p::<Left, N>(&arena, 1), Some(ANCHOR));
    }

    #[test]
    fn insert_rejects_equal_key() {
        let mut arena = build(&[3, 1]);
        arena.push(N(Linkage::new(3)));
        assert!(!insert::<Left, N>(&mut arena, ANCHOR, 3));
        assert_eq!(get_p::<Left, N>(&arena, 3), None);
        assert_eq!(keys_in_order(&arena), vec![1, 3]);
    }

    #[test]
    fn locate_reports_attach_point() {
        let arena = build(&[10, 5, 15]);
        assert_eq!(locate::<Left, N, u64>(&arena, ANCHOR, &5), Locate::Found(2));
        assert_eq!(
            locate::<Left, N, u64>(&arena, ANCHOR, &7),
            Locate::Vacant {
                parent: 2,
                left: false
            }
        );
        let empty = build(&[]);
        assert_eq!(
            locate::<Left, N, u64>(&empty, ANCHOR, &7),
            Locate::Vacant {
                parent: ANCHOR,
                left: true
            }
        );
    }

    #[test]
    fn is_left_child_by_position() {
        // 1:20 (root), 2:10 (left), 3:30 (right)
        let arena = build(&[20, 10, 30]);
        assert!(is_left_child::<Left, N>(&arena, 1));
        assert!(is_left_child::<Left, N>(&arena, 2));
        assert!(!is_left_child::<Left, N>(&arena, 3));
        assert!(!is_left_child::<Left, N>(&arena, ANCHOR));
    }

    #[test]
    fn next_and_prev_wrap_through_anchor() {
        let arena = build(&[20, 10, 30]);
        let first = first::<Left, N>(&arena, get_l::<Left, N>(&arena, ANCHOR)).unwrap();
        assert_eq!(arena[first as usize].0.key, Some(10));
        let second = next::<Left, N>(&arena, first).unwrap();
        let third = next::<Left, N>(&arena, second).unwrap();
        assert_eq!(arena[third as usize].0.key, Some(30));
        assert_eq!(next::<Left, N>(&arena, third), Some(ANCHOR));
        assert_eq!(next::<Left, N>(&arena, ANCHOR), None);
        assert_eq!(prev::<Left, N>(&arena, ANCHOR), Some(third));
        assert_eq!(prev::<Left, N>(&arena, second), Some(first));
        assert_eq!(prev::<Left, N>(&arena, first), None);
    }

    #[test]
    fn erase_leaf() {
        let mut arena = build(&[5, 2, 8]);
        let two = slot_of(&arena, 2);
        erase::<Left, N>(&mut arena, two);
        assert_eq!(keys_in_order(&arena), vec![5, 8]);
    }

    #[test]
    fn erase_node_with_only_left_child() {
        let mut arena = build(&[5, 3, 2]);
        let three = slot_of(&arena, 3);
        erase::<Left, N>(&mut arena, three);
        assert_eq!(keys_in_order(&arena), vec![2, 5]);
        assert_eq!(get_p::<Left, N>(&arena, slot_of(&arena, 2)), Some(slot_of(&arena, 5)));
    }

    #[test]
    fn erase_root_with_two_children_and_adjacent_successor() {
        let mut arena = build(&[5, 2, 8, 9]);
        let root = slot_of(&arena, 5);
        erase::<Left, N>(&mut arena, root);
        assert_eq!(keys_in_order(&arena), vec![2, 8, 9]);
        // The successor took over the root position without moving slots.
        assert_eq!(get_l::<Left, N>(&arena, ANCHOR), Some(slot_of(&arena, 8)));
        assert_eq!(get_l::<Left, N>(&arena, slot_of(&arena, 8)), Some(slot_of(&arena, 2)));
        assert_eq!(arena[root as usize].0.key, Some(5));
        assert_eq!(arena[root as usize].0.p, None);
    }

    #[test]
    fn erase_two_children_with_deep_successor() {
        let mut arena = build(&[50, 30, 70, 60, 80, 55, 65, 57]);
        let top = slot_of(&arena, 50);
        erase::<Left, N>(&mut arena, top);
        assert_eq!(keys_in_order(&arena), vec![30, 55, 57, 60, 65, 70, 80]);
        let root = get_l::<Left, N>(&arena, ANCHOR).unwrap();
        assert_eq!(arena[root as usize].0.key, Some(55));
        // 55's former right child was re-hung under 60.
        assert_eq!(get_p::<Left, N>(&arena, slot_of(&arena, 57)), Some(slot_of(&arena, 60)));
    }

    #[test]
    fn erase_everything_in_any_order() {
        let keys = [40, 20, 60, 10, 30, 50, 70, 25, 35, 65];
        let mut arena = build(&keys);
        let mut remaining: Vec<u64> = keys.to_vec();
        for k in [40, 10, 60, 30, 65, 20, 25, 70, 50, 35] {
            let slot = slot_of(&arena, k);
            erase::<Left, N>(&mut arena, slot);
            remaining.retain(|&x| x != k);
            let mut expected = remaining.clone();
            expected.sort_unstable();
            assert_eq!(keys_in_order(&arena), expected);
        }
        assert_eq!(get_l::<Left, N>(&arena, ANCHOR), None);
    }

    #[test]
    fn depth_of_degenerate_tree_is_linear() {
        let arena = build(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(depth::<Left, N>(&arena, get_l::<Left, N>(&arena, ANCHOR)), 6);
        let arena = build(&[4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(depth::<Left, N>(&arena, get_l::<Left, N>(&arena, ANCHOR)), 3);
    }

    #[test]
    fn check_tree_catches_broken_parent_link() {
        let mut arena = build(&[5, 2, 8]);
        arena[2].0.p = Some(3);
        assert_eq!(
            check_tree::<Left, N>(&arena, ANCHOR),
            Err(InvariantError::ParentLink {
                side: crate::types::SideKind::Left,
                parent: 1,
                child: 2
            })
        );
    }

    #[test]
    fn check_tree_catches_misordered_keys() {
        let mut arena = build(&[5, 2, 8]);
        arena[2].0.key = Some(9);
        assert!(matches!(
            check_tree::<Left, N>(&arena, ANCHOR),
            Err(InvariantError::Order { .. })
        ));
    }
}
