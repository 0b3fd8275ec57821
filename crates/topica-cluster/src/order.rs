//! Reproducible input ordering from an integer seed.
//!
//! The fixed-seed ordering is the one produced by a 32-bit Mersenne Twister
//! keyed with the seed's 32-bit words (least significant first), driving a
//! backwards Fisher-Yates pass whose swap index is drawn by rejection sampling
//! over `bit_length(i + 1)` random bits. Request files prepared against other
//! tools that use this scheme (CPython's `random.Random(seed).shuffle`, for
//! one) are processed in the same order.

use rand_mt::Mt;

/// Shuffle `items` in place, deterministically for a given `seed`.
pub fn seeded_shuffle<T>(items: &mut [T], seed: u64) {
    let mut rng = Mt::new_with_key(seed_key(seed));
    for i in (1..items.len()).rev() {
        let j = below(&mut rng, i as u64 + 1);
        items.swap(i, j as usize);
    }
}

/// Split the seed into 32-bit words, least significant first. Zero is `[0]`.
fn seed_key(seed: u64) -> Vec<u32> {
    let low = seed as u32;
    let high = (seed >> 32) as u32;
    if high == 0 {
        vec![low]
    } else {
        vec![low, high]
    }
}

/// Uniform integer in `[0, n)` by rejection over `bit_length(n)` bits.
fn below(rng: &mut Mt, n: u64) -> u64 {
    let k = u64::BITS - n.leading_zeros();
    loop {
        let r = random_bits(rng, k);
        if r < n {
            return r;
        }
    }
}

/// The top `k` bits of one draw for `k <= 32`; two draws, low word first,
/// for wider requests.
fn random_bits(rng: &mut Mt, k: u32) -> u64 {
    if k <= 32 {
        return u64::from(rng.next_u32() >> (32 - k));
    }
    let low = u64::from(rng.next_u32());
    let high = u64::from(rng.next_u32() >> (64 - k));
    (high << 32) | low
}
