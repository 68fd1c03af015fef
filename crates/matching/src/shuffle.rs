//! Seeded Fisher-Yates shuffle.
//!
//! Seeds stored with earlier draws must keep replaying to the same
//! permutations, so the arithmetic below is pinned down exactly:
//!
//! - the seed hash is `h = 31 * h + unit` over the UTF-16 code units of the
//!   seed, in signed 32-bit wraparound arithmetic;
//! - the LCG step `r = (r * 1103515245 + 12345) & 0x7fffffff` evaluates the
//!   multiply-add in IEEE-754 doubles (the product exceeds 2^53 and is
//!   rounded), then reduces modulo 2^32 before masking. Plain `i32`/`u32`
//!   wrapping multiplication gives different numbers;
//! - the swap index is `floor(r / 0x7fffffff * (i + 1))`.

const LCG_MULTIPLIER: f64 = 1_103_515_245.0;
const LCG_INCREMENT: f64 = 12_345.0;
const LCG_MASK: u32 = 0x7fff_ffff;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// 32-bit string hash of a seed (31-multiplier, signed wraparound).
pub fn seed_hash(seed: &str) -> i32 {
    seed.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Linear congruential generator driving the shuffle.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: i64,
}

impl Lcg {
    pub fn new(seed: i32) -> Self {
        Self {
            state: i64::from(seed),
        }
    }

    pub fn from_seed(seed: &str) -> Self {
        Self::new(seed_hash(seed))
    }

    /// Next value in `0..=0x7fffffff`.
    pub fn next_value(&mut self) -> u32 {
        let product = self.state as f64 * LCG_MULTIPLIER + LCG_INCREMENT;
        // Integral (every double above 2^53 is), so the remainder is exact.
        let wrapped = product.rem_euclid(TWO_POW_32) as u32;
        let value = wrapped & LCG_MASK;
        self.state = i64::from(value);
        value
    }

    /// Index in `0..bound`. `bound` must be non-zero.
    pub fn next_index(&mut self, bound: usize) -> usize {
        let value = self.next_value();
        let scaled = (f64::from(value) / f64::from(LCG_MASK) * bound as f64).floor() as usize;
        // value == 0x7fffffff would land one past the end
        scaled.min(bound - 1)
    }
}

/// Reproducible permutation of `items` for `seed`.
pub fn seeded_shuffle<T: Clone>(items: &[T], seed: &str) -> Vec<T> {
    let mut result = items.to_vec();
    let mut rng = Lcg::from_seed(seed);
    for i in (1..result.len()).rev() {
        let j = rng.next_index(i + 1);
        result.swap(i, j);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_known_values() {
        assert_eq!(seed_hash(""), 0);
        assert_eq!(seed_hash("a"), 97);
        assert_eq!(seed_hash("abc"), 96354);
        assert_eq!(seed_hash("hello world"), 1794106052);
    }

    #[test]
    fn hash_wraps_and_uses_utf16_units() {
        assert_eq!(seed_hash("Zürich-2026"), -1684436559);
    }

    #[test]
    fn lcg_sequence() {
        let mut rng = Lcg::new(0);
        assert_eq!(rng.next_value(), 12345);
        // 12345 * 1103515245 is still exact in a double
        assert_eq!(rng.next_value(), 1406932606);
    }

    #[test]
    fn lcg_negative_seed() {
        let mut rng = Lcg::new(-1);
        assert_eq!(rng.next_value(), 1043980748);
    }

    #[test]
    fn lcg_rounded_product() {
        // product > 2^53: double rounding is part of the sequence
        let mut rng = Lcg::new(1794106052);
        assert_eq!(rng.next_value(), 1188263168);
    }

    #[test]
    fn shuffle_known_permutations() {
        let six: Vec<u32> = (0..6).collect();
        let ten: Vec<u32> = (0..10).collect();
        assert_eq!(seeded_shuffle(&six, "abc"), vec![3, 4, 0, 2, 1, 5]);
        assert_eq!(seeded_shuffle(&six, ""), vec![5, 2, 4, 1, 3, 0]);
        assert_eq!(
            seeded_shuffle(&ten, "Zürich-2026"),
            vec![6, 1, 2, 0, 5, 3, 8, 7, 4, 9]
        );
    }

    #[test]
    fn shuffle_is_deterministic_permutation() {
        let items: Vec<String> = (0..40).map(|i| format!("p{i}")).collect();
        let a = seeded_shuffle(&items, "seed");
        let b = seeded_shuffle(&items, "seed");
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort();
        let mut expected = items.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn shuffle_small_inputs() {
        let empty: Vec<u8> = Vec::new();
        assert!(seeded_shuffle(&empty, "x").is_empty());
        assert_eq!(seeded_shuffle(&[7u8], "x"), vec![7]);
    }

    #[test]
    fn index_stays_in_bounds() {
        let mut rng = Lcg::from_seed("bounds");
        for bound in 1..200 {
            assert!(rng.next_index(bound) < bound);
        }
    }
}
