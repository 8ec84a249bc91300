//! Differential driver: a [`BiTreeMap`] against two `BTreeMap` references.
//!
//! Each step picks a side and a key. If the key is present it is erased
//! through that side; otherwise it is inserted, paired with a random key that
//! is absent on the other side. After every step the bimap must agree with
//! both references on membership, size, and ordered content (each side
//! walked with cursors, the paired key read through `flip`).

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound::{Excluded, Unbounded};

use bimap_forest::{BiTreeMap, InvariantError, Node, Record, Side, SideKind};
use log::{debug, error, trace};
use thiserror::Error;

use crate::fuzzer::Fuzzer;

/// Largest key space a run will use. Every step scans the whole space, so
/// larger requests are clamped to this.
pub const MAX_KEY_SPACE: i64 = 4096;

/// Parameters of a stress run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzConfig {
    pub steps: usize,
    /// Keys on each side are drawn from `0..key_space`, clamped to
    /// `1..=MAX_KEY_SPACE`.
    pub key_space: i64,
    /// `None` draws a fresh seed; the seed used is reported either way.
    pub seed: Option<u64>,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            steps: 10_000,
            key_space: 16,
            seed: None,
        }
    }
}

/// What a single step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert { left: i64, right: i64 },
    Erase { side: SideKind, key: i64 },
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub seed: u64,
    pub steps: usize,
    pub inserts: usize,
    pub erases: usize,
    pub max_len: usize,
    pub max_depth: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "seed {}: {} steps ({} inserts, {} erases), peak {} entries, peak depth {}",
            self.seed, self.steps, self.inserts, self.erases, self.max_len, self.max_depth
        )
    }
}

/// The first disagreement between the bimap and the references.
#[derive(Debug, Error)]
pub enum Mismatch {
    #[error("step {step}: {side} key {key} present in bimap: {in_bimap}, in reference: {in_reference}")]
    Membership {
        step: usize,
        side: SideKind,
        key: i64,
        in_bimap: bool,
        in_reference: bool,
    },
    #[error("step {step}: bimap holds {actual} entries, references hold {left} and {right}")]
    Size {
        step: usize,
        actual: usize,
        left: usize,
        right: usize,
    },
    #[error("step {step}: {side} traversal at position {position}: expected {expected:?}, found {found:?}")]
    Traversal {
        step: usize,
        side: SideKind,
        position: usize,
        expected: Option<(i64, i64)>,
        found: Option<(i64, i64)>,
    },
    #[error("step {step}: {side} cursor at position {position} does not flip to a live entry")]
    Flip {
        step: usize,
        side: SideKind,
        position: usize,
    },
    #[error("step {step}: erasing {side} key {key} continued at {found:?}, expected {expected:?}")]
    Successor {
        step: usize,
        side: SideKind,
        key: i64,
        expected: Option<i64>,
        found: Option<i64>,
    },
    #[error("step {step}: insert of ({left}, {right}) returned cursors to another entry")]
    InsertCursor { step: usize, left: i64, right: i64 },
    #[error("step {step}: insert rejected")]
    Rejected {
        step: usize,
        #[source]
        source: bimap_forest::Error,
    },
    #[error("step {step}: broken invariant")]
    Invariant {
        step: usize,
        #[source]
        source: InvariantError,
    },
}

pub struct Differential {
    map: BiTreeMap<i64, i64>,
    left_to_right: BTreeMap<i64, i64>,
    right_to_left: BTreeMap<i64, i64>,
    fuzzer: Fuzzer,
    key_space: i64,
    step: usize,
    inserts: usize,
    erases: usize,
    max_len: usize,
    max_depth: usize,
}

impl Differential {
    pub fn new(config: &FuzzConfig) -> Self {
        Self {
            map: BiTreeMap::new(),
            left_to_right: BTreeMap::new(),
            right_to_left: BTreeMap::new(),
            fuzzer: Fuzzer::new(config.seed),
            key_space: config.key_space.clamp(1, MAX_KEY_SPACE),
            step: 0,
            inserts: 0,
            erases: 0,
            max_len: 0,
            max_depth: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.fuzzer.seed
    }

    pub fn map(&self) -> &BiTreeMap<i64, i64> {
        &self.map
    }

    pub fn report(&self) -> Report {
        Report {
            seed: self.fuzzer.seed,
            steps: self.step,
            inserts: self.inserts,
            erases: self.erases,
            max_len: self.max_len,
            max_depth: self.max_depth,
        }
    }

    /// Performs one random insert or erase on the bimap and the references.
    pub fn step(&mut self) -> Result<Action, Mismatch> {
        self.step += 1;
        let side = self.fuzzer.side();
        let key = self.fuzzer.random_int(0, self.key_space - 1);

        let (in_bimap, in_reference) = match side {
            SideKind::Left => (
                self.map.contains_left(&key),
                self.left_to_right.contains_key(&key),
            ),
            SideKind::Right => (
                self.map.contains_right(&key),
                self.right_to_left.contains_key(&key),
            ),
        };
        if in_bimap != in_reference {
            return Err(Mismatch::Membership {
                step: self.step,
                side,
                key,
                in_bimap,
                in_reference,
            });
        }

        let action = if in_reference {
            self.erase(side, key)?
        } else {
            self.insert(side, key)?
        };

        self.max_len = self.max_len.max(self.map.len());
        self.max_depth = self
            .max_depth
            .max(self.map.depth_left())
            .max(self.map.depth_right());
        Ok(action)
    }

    fn erase(&mut self, side: SideKind, key: i64) -> Result<Action, Mismatch> {
        let (expected, found) = match side {
            SideKind::Left => {
                let expected = next_key(&self.left_to_right, key);
                let next = self.map.erase_left(self.map.find_left(&key));
                if let Some(right) = self.left_to_right.remove(&key) {
                    self.right_to_left.remove(&right);
                }
                (expected, self.map.left(next).copied())
            }
            SideKind::Right => {
                let expected = next_key(&self.right_to_left, key);
                let next = self.map.erase_right(self.map.find_right(&key));
                if let Some(left) = self.right_to_left.remove(&key) {
                    self.left_to_right.remove(&left);
                }
                (expected, self.map.right(next).copied())
            }
        };
        if expected != found {
            return Err(Mismatch::Successor {
                step: self.step,
                side,
                key,
                expected,
                found,
            });
        }
        self.erases += 1;
        Ok(Action::Erase { side, key })
    }

    fn insert(&mut self, side: SideKind, key: i64) -> Result<Action, Mismatch> {
        let other_side = match side {
            SideKind::Left => &self.right_to_left,
            SideKind::Right => &self.left_to_right,
        };
        let candidates: Vec<i64> = (0..self.key_space)
            .filter(|k| !other_side.contains_key(k))
            .collect();
        // Sizes match, so a key absent on one side leaves room on the other.
        let Some(&other) = self.fuzzer.pick(&candidates) else {
            return Err(Mismatch::Size {
                step: self.step,
                actual: self.map.len(),
                left: self.left_to_right.len(),
                right: self.right_to_left.len(),
            });
        };
        let (left, right) = match side {
            SideKind::Left => (key, other),
            SideKind::Right => (other, key),
        };

        let (lc, rc) = self
            .map
            .try_insert(left, right)
            .map_err(|source| Mismatch::Rejected {
                step: self.step,
                source,
            })?;
        if lc.flip() != rc || self.map.left(lc) != Some(&left) || self.map.right(rc) != Some(&right)
        {
            return Err(Mismatch::InsertCursor {
                step: self.step,
                left,
                right,
            });
        }
        self.left_to_right.insert(left, right);
        self.right_to_left.insert(right, left);
        self.inserts += 1;
        Ok(Action::Insert { left, right })
    }

    /// Compares the whole bimap against the references.
    pub fn verify(&self) -> Result<(), Mismatch> {
        let actual = self.map.len();
        if actual != self.left_to_right.len() || actual != self.right_to_left.len() {
            return Err(Mismatch::Size {
                step: self.step,
                actual,
                left: self.left_to_right.len(),
                right: self.right_to_left.len(),
            });
        }

        for key in 0..self.key_space {
            let checks = [
                (
                    SideKind::Left,
                    self.map.find_left(&key) != self.map.end_left(),
                    self.left_to_right.contains_key(&key),
                ),
                (
                    SideKind::Right,
                    self.map.find_right(&key) != self.map.end_right(),
                    self.right_to_left.contains_key(&key),
                ),
            ];
            for (side, in_bimap, in_reference) in checks {
                if in_bimap != in_reference {
                    return Err(Mismatch::Membership {
                        step: self.step,
                        side,
                        key,
                        in_bimap,
                        in_reference,
                    });
                }
            }
        }

        self.verify_side::<bimap_forest::Left>(&self.left_to_right)?;
        self.verify_side::<bimap_forest::Right>(&self.right_to_left)?;

        self.map
            .check_invariants()
            .map_err(|source| Mismatch::Invariant {
                step: self.step,
                source,
            })
    }

    /// Walks side `S` with a cursor, pairing each key with the one reached
    /// through `flip`, and compares against `reference` in order.
    fn verify_side<S: Side>(&self, reference: &BTreeMap<i64, i64>) -> Result<(), Mismatch>
    where
        Record<i64, i64>: Node<S, Key = i64> + Node<S::Flip, Key = i64>,
    {
        let mut cursor = self.map.begin::<S>();
        let mut expected = reference.iter().map(|(k, v)| (*k, *v));
        let mut position = 0;
        loop {
            let want = expected.next();
            let found = if cursor.is_end() {
                None
            } else {
                match (
                    self.map.key(cursor).copied(),
                    self.map.key(cursor.flip()).copied(),
                ) {
                    (Some(key), Some(paired)) => Some((key, paired)),
                    _ => {
                        return Err(Mismatch::Flip {
                            step: self.step,
                            side: S::KIND,
                            position,
                        })
                    }
                }
            };
            if want != found {
                return Err(Mismatch::Traversal {
                    step: self.step,
                    side: S::KIND,
                    position,
                    expected: want,
                    found,
                });
            }
            if want.is_none() {
                return Ok(());
            }
            cursor = self.map.next(cursor);
            position += 1;
        }
    }
}

fn next_key(reference: &BTreeMap<i64, i64>, key: i64) -> Option<i64> {
    reference
        .range((Excluded(key), Unbounded))
        .next()
        .map(|(k, _)| *k)
}

/// Runs `config.steps` steps, verifying after each one.
pub fn run(config: &FuzzConfig) -> Result<Report, Mismatch> {
    let mut diff = Differential::new(config);
    debug!(
        "bimap differential run: seed {}, {} steps, {} keys per side",
        diff.seed(),
        config.steps,
        diff.key_space
    );
    for _ in 0..config.steps {
        let result = diff.step().and_then(|action| {
            trace!("step {}: {action:?}", diff.step);
            diff.verify()
        });
        if let Err(err) = result {
            error!("seed {}: {err}", diff.seed());
            return Err(err);
        }
    }
    let report = diff.report();
    debug!("{report}");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_run_stays_in_sync() {
        let config = FuzzConfig {
            steps: 500,
            key_space: 8,
            seed: Some(3),
        };
        let report = run(&config).unwrap();
        assert_eq!(report.steps, 500);
        assert_eq!(report.inserts + report.erases, 500);
        assert!(report.max_len <= 8);
    }

    #[test]
    fn same_seed_same_actions() {
        let config = FuzzConfig {
            steps: 0,
            key_space: 16,
            seed: Some(11),
        };
        let mut a = Differential::new(&config);
        let mut b = Differential::new(&config);
        for _ in 0..200 {
            assert_eq!(a.step().unwrap(), b.step().unwrap());
        }
        assert_eq!(a.report(), b.report());
        assert_eq!(a.map(), b.map());
    }

    #[test]
    fn oversized_key_space_is_clamped() {
        let config = FuzzConfig {
            steps: 20,
            key_space: i64::MAX,
            seed: Some(8),
        };
        assert_eq!(Differential::new(&config).key_space, MAX_KEY_SPACE);
        assert_eq!(run(&config).unwrap().steps, 20);

        let negative = FuzzConfig {
            key_space: -5,
            ..config
        };
        assert_eq!(Differential::new(&negative).key_space, 1);
    }

    #[test]
    fn single_key_space_alternates() {
        let config = FuzzConfig {
            steps: 0,
            key_space: 1,
            seed: Some(5),
        };
        let mut diff = Differential::new(&config);
        assert_eq!(diff.step().unwrap(), Action::Insert { left: 0, right: 0 });
        assert!(matches!(diff.step().unwrap(), Action::Erase { key: 0, .. }));
        diff.verify().unwrap();
        assert!(diff.map().is_empty());
    }
}
