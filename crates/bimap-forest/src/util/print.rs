use std::fmt::Display;

use crate::types::{Node, Side};

use super::{get_l, get_r};

/// Renders the tree under `sentinel` one node per line, children indented
/// below their parent and tagged `←` (left) or `→` (right).
///
/// ```text
/// left
/// └─ 5
///   ← 2
///   → 8
/// ```
pub fn print_tree<S, N>(arena: &[N], sentinel: u32, tab: &str) -> String
where
    S: Side,
    N: Node<S>,
    N::Key: Display,
{
    let mut out = S::KIND.to_string();
    let Some(root) = get_l::<S, N>(arena, sentinel) else {
        out.push_str(" ∅");
        return out;
    };

    // Explicit stack: an unbalanced tree can be as deep as it is long.
    let mut stack = vec![(root, tab.to_string(), "└─")];
    while let Some((node, tab, side)) = stack.pop() {
        out.push('\n');
        out.push_str(&tab);
        out.push_str(side);
        out.push(' ');
        match arena[node as usize].half().key() {
            Some(key) => out.push_str(&key.to_string()),
            None => out.push('?'),
        }
        let child_tab = format!("{tab}  ");
        if let Some(r) = get_r::<S, N>(arena, node) {
            stack.push((r, child_tab.clone(), "→"));
        }
        if let Some(l) = get_l::<S, N>(arena, node) {
            stack.push((l, child_tab, "←"));
        }
    }
    out
}
