//! Deterministic submission shuffling (§4.3).
//!
//! The reference protocol drives a Fisher-Yates shuffle from a
//! linear-congruential generator seeded by a 32-bit hash of a string; per
//! Design Notes §9 this implementation instead hashes the seed string to a
//! 64-bit value and drives a named PRNG (`StdRng`) with it, so the seed can
//! be recorded verbatim on the room and replayed identically for late
//! joiners and reconnectors.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Build the shuffle seed string for a room/round (§4.3 "seed composed of
/// room code, round number, and current wall-clock").
pub fn build_seed(room_code: &str, round: u32, wall_clock_millis: i64) -> String {
    format!("{room_code}-{round}-{wall_clock_millis}")
}

fn hash_seed(seed: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    hasher.finish()
}

/// Deterministically shuffle `items` given `seed`. Length-2 inputs use a
/// dedicated coin flip rather than relying on Fisher-Yates's edge behavior,
/// guaranteeing a 50/50 split between the two possible orders.
pub fn deterministic_shuffle<T: Clone>(items: &[T], seed: &str) -> Vec<T> {
    let mut rng = StdRng::seed_from_u64(hash_seed(seed));

    if items.len() == 2 {
        let mut ordered = items.to_vec();
        if rng.random_bool(0.5) {
            ordered.swap(0, 1);
        }
        return ordered;
    }

    let mut indices: Vec<usize> = (0..items.len()).collect();
    indices.shuffle(&mut rng);
    indices.into_iter().map(|i| items[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffle_is_deterministic_for_a_given_seed() {
        let items = vec!["a", "b", "c", "d", "e"];
        let seed = "ROOM-1-12345";
        assert_eq!(
            deterministic_shuffle(&items, seed),
            deterministic_shuffle(&items, seed)
        );
    }

    #[test]
    fn different_seeds_usually_differ() {
        let items = vec!["a", "b", "c", "d", "e", "f"];
        let a = deterministic_shuffle(&items, "seed-a");
        let b = deterministic_shuffle(&items, "seed-b");
        assert_ne!(a, b);
    }

    #[test]
    fn length_two_fairness_within_tolerance() {
        let items = vec!["x", "y"];
        let mut swapped = 0;
        let trials = 2000;
        for i in 0..trials {
            let seed = format!("fairness-{i}");
            let result = deterministic_shuffle(&items, &seed);
            if result == vec!["y", "x"] {
                swapped += 1;
            }
        }
        let ratio = f64::from(swapped) / f64::from(trials);
        assert!((0.3..=0.7).contains(&ratio), "ratio was {ratio}");
    }

    #[test]
    fn length_three_fairness_within_tolerance() {
        use std::collections::HashMap;
        let items = vec![1, 2, 3];
        let mut counts: HashMap<Vec<i32>, u32> = HashMap::new();
        let trials = 6000;
        for i in 0..trials {
            let seed = format!("fairness3-{i}");
            let result = deterministic_shuffle(&items, &seed);
            *counts.entry(result).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 6);
        for count in counts.values() {
            let ratio = f64::from(*count) / f64::from(trials);
            assert!((0.5 / 3.0..=1.5 / 3.0).contains(&ratio), "ratio was {ratio}");
        }
    }
}
