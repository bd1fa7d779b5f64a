//! Deterministic, seed-driven shuffle.
//!
//! Self-contained xorshift64 variant so the permutation is reproducible across
//! runs and platforms. All arithmetic wraps modulo 2^64.

/// Odd multiplier applied after the three xor-shift steps.
const MULTIPLIER: u64 = 2685821657736338717;

/// Per-entity seed: the global seed plus the entity id, wrapping.
pub fn entity_seed(global_seed: u64, entity_id: u32) -> u64 {
    global_seed.wrapping_add(u64::from(entity_id))
}

fn next_state(mut x: u64) -> u64 {
    x ^= x >> 12;
    x ^= x << 25;
    x ^= x >> 27;
    x.wrapping_mul(MULTIPLIER)
}

/// Fisher–Yates shuffle from the last index down to 1. Seed 0 is a no-op.
pub fn seeded_shuffle<T>(items: &mut [T], seed: u64) {
    if seed == 0 {
        return;
    }

    let mut x = seed;
    for i in (1..items.len()).rev() {
        x = next_state(x);
        let j = (x % (i as u64 + 1)) as usize;
        items.swap(i, j);
    }
}
