//! bimap-fuzzer - differential stress testing for `bimap-forest`
//!
//! Drives a [`bimap_forest::BiTreeMap`] with seeded random inserts and
//! erases, mirroring every step into two ordered reference maps
//! (left → right and right → left) and checking after each step that the
//! bimap agrees with both.

pub mod differential;
pub mod fuzzer;

pub use differential::{run, Action, Differential, FuzzConfig, Mismatch, Report, MAX_KEY_SPACE};
pub use fuzzer::Fuzzer;
