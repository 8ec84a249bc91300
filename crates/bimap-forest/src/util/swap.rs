use crate::types::{Node, Side};

use super::{get_l, get_p, get_r, is_left_child, set_child, set_l, set_p, set_r};

/// Exchanges the tree positions of `x` and `y`.
///
/// Keys stay in their slots; only parent/left/right links are rewritten, so
/// the other half of each record is unaffected. Handles `x` and `y` being
/// parent and child of each other, and siblings. Both nodes must be linked
/// below a sentinel, i.e. have a parent.
pub fn swap<S: Side, N: Node<S>>(arena: &mut [N], x: u32, y: u32) {
    if x == y {
        return;
    }
    let relabel = |link: Option<u32>| match link {
        Some(n) if n == x => Some(y),
        Some(n) if n == y => Some(x),
        other => other,
    };

    let (xp, xl, xr) = links::<S, N>(arena, x);
    let (yp, yl, yr) = links::<S, N>(arena, y);
    let x_left = is_left_child::<S, N>(arena, x);
    let y_left = is_left_child::<S, N>(arena, y);

    set_links::<S, N>(arena, x, relabel(yp), relabel(yl), relabel(yr));
    set_links::<S, N>(arena, y, relabel(xp), relabel(xl), relabel(xr));

    // Neighbours outside the pair were captured before any rewrite, so a
    // parent shared by siblings gets both of its links patched.
    for (node, p, l, r, left) in [(y, xp, xl, xr, x_left), (x, yp, yl, yr, y_left)] {
        for child in [l, r].into_iter().flatten().filter(|&c| c != node) {
            set_p::<S, N>(arena, child, Some(node));
        }
        if let Some(p) = p.filter(|&p| p != node) {
            set_child::<S, N>(arena, p, left, Some(node));
        }
    }
}

#[inline]
fn links<S: Side, N: Node<S>>(arena: &[N], node: u32) -> (Option<u32>, Option<u32>, Option<u32>) {
    (
        get_p::<S, N>(arena, node),
        get_l::<S, N>(arena, node),
        get_r::<S, N>(arena, node),
    )
}

#[inline]
fn set_links<S: Side, N: Node<S>>(
    arena: &mut [N],
    node: u32,
    p: Option<u32>,
    l: Option<u32>,
    r: Option<u32>,
) {
    set_p::<S, N>(arena, node, p);
    set_l::<S, N>(arena, node, l);
    set_r::<S, N>(arena, node, r);
}
