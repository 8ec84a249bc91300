use std::collections::BTreeMap;

use bimap_forest::BiTreeMap;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, u8),
    EraseLeft(u8),
    EraseRight(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (any::<u8>(), any::<u8>()).prop_map(|(l, r)| Op::Insert(l % 32, r % 32)),
        1 => any::<u8>().prop_map(|k| Op::EraseLeft(k % 32)),
        1 => any::<u8>().prop_map(|k| Op::EraseRight(k % 32)),
    ]
}

/// Applies `ops` to the bimap and to a pair of reference maps, skipping
/// inserts that would duplicate a key.
fn replay(ops: &[Op]) -> (BiTreeMap<u8, u8>, BTreeMap<u8, u8>, BTreeMap<u8, u8>) {
    let mut map = BiTreeMap::new();
    let mut l2r = BTreeMap::new();
    let mut r2l = BTreeMap::new();
    for op in ops {
        match *op {
            Op::Insert(l, r) => {
                let fresh = !l2r.contains_key(&l) && !r2l.contains_key(&r);
                assert_eq!(map.try_insert(l, r).is_ok(), fresh);
                if fresh {
                    l2r.insert(l, r);
                    r2l.insert(r, l);
                }
            }
            Op::EraseLeft(l) => {
                let it = map.find_left(&l);
                assert_eq!(it.is_end(), !l2r.contains_key(&l));
                if let Some(r) = l2r.remove(&l) {
                    r2l.remove(&r);
                    let next = map.erase_left(it);
                    assert_eq!(map.left(next), l2r.range(l..).next().map(|(k, _)| k));
                }
            }
            Op::EraseRight(r) => {
                let it = map.find_right(&r);
                assert_eq!(it.is_end(), !r2l.contains_key(&r));
                if let Some(l) = r2l.remove(&r) {
                    l2r.remove(&l);
                    let next = map.erase_right(it);
                    assert_eq!(map.right(next), r2l.range(r..).next().map(|(k, _)| k));
                }
            }
        }
    }
    (map, l2r, r2l)
}

proptest! {
    #[test]
    fn matches_reference_maps(ops in proptest::collection::vec(op(), 0..200)) {
        let (map, l2r, r2l) = replay(&ops);
        prop_assert!(map.check_invariants().is_ok());
        prop_assert_eq!(map.len(), l2r.len());
        prop_assert_eq!(map.len(), r2l.len());

        let left: Vec<(u8, u8)> = map.iter_left().map(|(l, r)| (*l, *r)).collect();
        let expected_left: Vec<(u8, u8)> = l2r.iter().map(|(l, r)| (*l, *r)).collect();
        prop_assert_eq!(left, expected_left);

        let right: Vec<(u8, u8)> = map.iter_right().map(|(r, l)| (*r, *l)).collect();
        let expected_right: Vec<(u8, u8)> = r2l.iter().map(|(r, l)| (*r, *l)).collect();
        prop_assert_eq!(right, expected_right);
    }

    #[test]
    fn flip_round_trips(ops in proptest::collection::vec(op(), 0..120)) {
        let (map, l2r, _) = replay(&ops);
        let mut it = map.begin_left();
        while it != map.end_left() {
            let l = *map.left(it).unwrap();
            let flipped = it.flip();
            prop_assert_eq!(map.right(flipped), l2r.get(&l));
            prop_assert_eq!(flipped.flip(), it);
            prop_assert_eq!(map.find_right(map.right(flipped).unwrap()), flipped);
            it = map.next(it);
        }
    }

    #[test]
    fn find_agrees_with_membership(ops in proptest::collection::vec(op(), 0..120), probe in 0u8..32) {
        let (map, l2r, r2l) = replay(&ops);
        prop_assert_eq!(map.find_left(&probe) != map.end_left(), l2r.contains_key(&probe));
        prop_assert_eq!(map.find_right(&probe) != map.end_right(), r2l.contains_key(&probe));
        prop_assert_eq!(map.get_by_left(&probe), l2r.get(&probe));
        prop_assert_eq!(map.get_by_right(&probe), r2l.get(&probe));
    }
}
