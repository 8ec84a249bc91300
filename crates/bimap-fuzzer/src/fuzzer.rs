use bimap_forest::SideKind;
use rand::{rngs::OsRng, Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Seeded source of random keys and choices for a stress run.
///
/// Uses the xoshiro256** PRNG, so a run is reproducible from its seed.
///
/// # Examples
///
/// ```
/// use bimap_fuzzer::Fuzzer;
///
/// let mut a = Fuzzer::new(Some(7));
/// let mut b = Fuzzer::new(Some(7));
/// assert_eq!(a.random_int(0, 100), b.random_int(0, 100));
///
/// let n = a.random_int(1, 10);
/// assert!((1..=10).contains(&n));
/// ```
pub struct Fuzzer {
    /// The seed the PRNG was initialised with.
    pub seed: u64,
    rng: Xoshiro256StarStar,
}

impl Fuzzer {
    /// Creates a fuzzer from `seed`, or from a fresh `OsRng` seed.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| OsRng.next_u64());
        Self {
            seed,
            rng: Xoshiro256StarStar::seed_from_u64(seed),
        }
    }

    /// Random integer in `[min, max]`.
    pub fn random_int(&mut self, min: i64, max: i64) -> i64 {
        self.rng.gen_range(min..=max)
    }

    pub fn random_bool(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability)
    }

    /// Either side with equal probability.
    pub fn side(&mut self) -> SideKind {
        if self.random_bool(0.5) {
            SideKind::Left
        } else {
            SideKind::Right
        }
    }

    /// A random element, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, elements: &'a [T]) -> Option<&'a T> {
        if elements.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..elements.len());
        elements.get(idx)
    }
}
