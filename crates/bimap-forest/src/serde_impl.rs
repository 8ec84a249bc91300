//! `serde` support: a map serializes as a sequence of `(left, right)` pairs
//! in ascending left order.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::BiTreeMap;

impl<L: Serialize, R: Serialize> Serialize for BiTreeMap<L, R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter_left())
    }
}

struct PairsVisitor<L, R>(PhantomData<(L, R)>);

impl<'de, L, R> Visitor<'de> for PairsVisitor<L, R>
where
    L: Deserialize<'de> + Ord,
    R: Deserialize<'de> + Ord,
{
    type Value = BiTreeMap<L, R>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a sequence of (left, right) pairs")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        // Size hints come from untrusted input.
        let mut map = BiTreeMap::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some((left, right)) = seq.next_element::<(L, R)>()? {
            map.try_insert(left, right).map_err(de::Error::custom)?;
        }
        Ok(map)
    }
}

/// Rejects input that repeats a key on either side.
impl<'de, L, R> Deserialize<'de> for BiTreeMap<L, R>
where
    L: Deserialize<'de> + Ord,
    R: Deserialize<'de> + Ord,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(PairsVisitor(PhantomData))
    }
}
