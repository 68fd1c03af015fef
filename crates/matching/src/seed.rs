//! Seed strings for reproducible draws.
//!
//! A seed is opaque: it only drives the shuffle order and is stored next to a
//! draw so the draw can be replayed. It is not a secret.

use rand::Rng;

const SEED_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SEED_LEN: usize = 26;

/// Fresh base-36 seed from the thread-local RNG.
pub fn new_seed() -> String {
    let mut rng = rand::thread_rng();
    (0..SEED_LEN)
        .map(|_| SEED_ALPHABET[rng.gen_range(0..SEED_ALPHABET.len())] as char)
        .collect()
}

/// Seed for the `attempt`-th minimizer attempt. Attempt 0 uses the seed as-is.
pub fn attempt_seed(seed: &str, attempt: usize) -> String {
    if attempt == 0 {
        seed.to_string()
    } else {
        format!("{seed}_attempt{attempt}")
    }
}

/// Seed for the receiver order.
///
/// Shuffling givers and receivers of equal length with the same seed yields
/// the same permutation, which lines both orders up and makes the solvers
/// pair people off two by two.
pub fn receiver_seed(seed: &str) -> String {
    format!("{seed}:receivers")
}

/// Seed used by a partial rematch.
pub fn rematch_seed(seed: &str) -> String {
    format!("{seed}_rematch")
}
